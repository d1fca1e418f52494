use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::LoggerConfig;
use crate::error::ParseLogLevelError;
use crate::logger::LogLevel;

/// Leveled logger with dated, rotated log files
#[derive(Debug, Parser)]
#[command(name = "xlogging", version, about)]
pub struct Cli {
    /// Folder holding the log files
    #[arg(long, global = true, default_value = "logs")]
    pub folder: PathBuf,

    /// Base name of log files
    #[arg(long, global = true, default_value = "Log")]
    pub base_name: String,

    /// Log file extension, including the dot
    #[arg(long, global = true, default_value = ".log")]
    pub extension: String,

    /// Start a new log file on every run
    #[arg(long, global = true)]
    pub rotate_on_every_run: bool,

    /// Rotate when the latest file exceeds this many MiB (0 disables)
    #[arg(long, global = true, default_value_t = 10)]
    pub max_size_mb: u64,

    /// Rotate when the latest file is older than this (0 disables)
    #[arg(long, global = true, default_value_t = 3600)]
    pub max_age_seconds: u64,

    /// Name files and stamp lines with local time instead of UTC
    #[arg(long, global = true)]
    pub local_time: bool,

    /// off, error, warn or info
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Attach the log file and print its path
    Attach,
    /// Move today's log file aside under the next free numbered name
    Rotate,
    /// Write one message at the given level
    Write {
        /// info, warn or error
        level: String,
        message: String,
    },
    /// Log OS and process details
    Sysinfo,
    /// Print the version and exit
    Version,
}

impl Cli {
    /// Logger configuration from the flags. The level is resolved separately.
    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            rotate_on_every_run: self.rotate_on_every_run,
            max_size_mb: self.max_size_mb,
            max_age_seconds: self.max_age_seconds,
            use_utc: !self.local_time,
            base_file_name: self.base_name.clone(),
            folder_path: self.folder.clone(),
            extension: self.extension.clone(),
            ..LoggerConfig::default()
        }
    }
}

/// Level named by the `write` subcommand. `off` is not a level a message can
/// be written at.
pub fn write_level(level: &str) -> Result<LogLevel, ParseLogLevelError> {
    match level.parse::<LogLevel>()? {
        LogLevel::Off => Err(ParseLogLevelError),
        level => Ok(level),
    }
}
