#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::cargo)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]

use clap::Parser;

use xlogging::attach::{resolve_folder, rotate_current_log_file};
use xlogging::cli::{write_level, Cli, Commands};
use xlogging::naming::{self, LogFileName};
use xlogging::{report, LogLevel, Logger, LoggerConfig};

fn resolve_log_level(cli_level: Option<&str>) -> LogLevel {
    // Precedence: CLI flag > env var > default (Info)
    if let Some(level_str) = cli_level {
        if let Ok(level) = level_str.parse::<LogLevel>() {
            return level;
        }
    }

    if let Ok(env_level) = std::env::var("XLOGGING_LOG_LEVEL") {
        if let Ok(level) = env_level.parse::<LogLevel>() {
            return level;
        }
    }

    LogLevel::default()
}

fn main() {
    let cli = Cli::parse();

    let config = LoggerConfig {
        level: resolve_log_level(cli.log_level.as_deref()),
        ..cli.logger_config()
    };

    match cli.command {
        Commands::Attach => cmd_attach(config),
        Commands::Rotate => cmd_rotate(&config),
        Commands::Write { level, message } => cmd_write(config, &level, &message),
        Commands::Sysinfo => cmd_sysinfo(config),
        Commands::Version => cmd_version(),
    }
}

fn cmd_attach(config: LoggerConfig) {
    let logger = Logger::initialize(config);

    let Some(path) = logger.log_file_path() else {
        // initialize already printed the reason
        std::process::exit(1);
    };

    println!("Attached {}", path.display());
    if let Some(rotated_to) = logger.rotated_to() {
        println!("Previous file moved to {}", rotated_to.display());
    }
}

fn cmd_rotate(config: &LoggerConfig) {
    let folder = match resolve_folder(&config.folder_path) {
        Ok(folder) => folder,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let date = naming::today(config.use_utc);
    let name = LogFileName::new(&config.base_file_name, date, &config.extension);

    match rotate_current_log_file(&folder, &name) {
        Ok(Some(rotated_to)) => println!("Rotated to {}", rotated_to.display()),
        Ok(None) => println!("Nothing to rotate: {} does not exist", name.canonical()),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}

fn cmd_write(config: LoggerConfig, level: &str, message: &str) {
    let Ok(level) = write_level(level) else {
        eprintln!("Unknown level '{level}', expected info, warn or error");
        std::process::exit(2);
    };

    let logger = Logger::initialize(config);
    match level {
        LogLevel::Error => logger.error(message),
        LogLevel::Warn => logger.warn(message),
        LogLevel::Info | LogLevel::Off => logger.info(message),
    }

    if let Err(e) = logger.shutdown() {
        eprintln!("Failed to flush log file: {e}");
    }
}

fn cmd_sysinfo(config: LoggerConfig) {
    let logger = Logger::initialize(config);
    report::print_system_info(&logger);
}

fn cmd_version() {
    println!("xlogging {}", env!("CARGO_PKG_VERSION"));
}
