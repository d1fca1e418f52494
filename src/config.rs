use std::path::PathBuf;

use serde::Deserialize;

use crate::logger::{FileNameStyle, LogLevel, Style};
use crate::policy::RotationPolicy;

const fn default_max_size_mb() -> u64 {
    10
}

const fn default_max_age_seconds() -> u64 {
    3600
}

const fn default_true() -> bool {
    true
}

fn default_base_file_name() -> String {
    "Log".to_string()
}

fn default_folder_path() -> PathBuf {
    PathBuf::from("logs")
}

fn default_extension() -> String {
    ".log".to_string()
}

/// Per-level formatting of log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Styles {
    pub info: Style,
    pub warn: Style,
    pub error: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            info: Style {
                file_name: FileNameStyle::None,
                print_stack: false,
                log_to_terminal: true,
            },
            warn: Style {
                file_name: FileNameStyle::Long,
                print_stack: false,
                log_to_terminal: true,
            },
            error: Style {
                file_name: FileNameStyle::Short,
                print_stack: true,
                log_to_terminal: true,
            },
        }
    }
}

/// Everything a [`crate::Logger`] needs at startup.
///
/// The logger never reads this from disk itself. It derives `Deserialize` so
/// a host can embed it in its own configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggerConfig {
    #[serde(default)]
    pub rotate_on_every_run: bool,
    #[serde(default = "default_max_size_mb")]
    pub max_size_mb: u64,
    #[serde(default = "default_max_age_seconds")]
    pub max_age_seconds: u64,
    #[serde(default = "default_true")]
    pub use_utc: bool,
    #[serde(default = "default_base_file_name")]
    pub base_file_name: String,
    /// Relative paths resolve against the working directory; a leading `~`
    /// resolves against the home directory.
    #[serde(default = "default_folder_path")]
    pub folder_path: PathBuf,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "LogLevel::default")]
    pub level: LogLevel,
    #[serde(default = "default_true")]
    pub show_time: bool,
    #[serde(default)]
    pub show_init_logs: bool,
    /// Mirror [`crate::Logger::raw`] output to stdout while a file is attached.
    #[serde(default = "default_true")]
    pub raw_to_terminal: bool,
    #[serde(default)]
    pub styles: Styles,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            rotate_on_every_run: false,
            max_size_mb: default_max_size_mb(),
            max_age_seconds: default_max_age_seconds(),
            use_utc: true,
            base_file_name: default_base_file_name(),
            folder_path: default_folder_path(),
            extension: default_extension(),
            level: LogLevel::default(),
            show_time: true,
            show_init_logs: false,
            raw_to_terminal: true,
            styles: Styles::default(),
        }
    }
}

impl LoggerConfig {
    pub const fn policy(&self) -> RotationPolicy {
        RotationPolicy {
            rotate_on_every_run: self.rotate_on_every_run,
            max_size_mb: self.max_size_mb,
            max_age_seconds: self.max_age_seconds,
        }
    }

    pub const fn style_for(&self, level: LogLevel) -> Style {
        match level {
            LogLevel::Warn => self.styles.warn,
            LogLevel::Error => self.styles.error,
            LogLevel::Info | LogLevel::Off => self.styles.info,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert!(!config.rotate_on_every_run);
        assert_eq!(config.max_size_mb, 10);
        assert_eq!(config.max_age_seconds, 3600);
        assert!(config.use_utc);
        assert_eq!(config.base_file_name, "Log");
        assert_eq!(config.folder_path, PathBuf::from("logs"));
        assert_eq!(config.extension, ".log");
        assert_eq!(config.level, LogLevel::Info);
        assert!(!config.show_init_logs);
    }

    #[test]
    fn test_default_styles() {
        let styles = Styles::default();
        assert_eq!(styles.info.file_name, FileNameStyle::None);
        assert!(!styles.info.print_stack);
        assert_eq!(styles.warn.file_name, FileNameStyle::Long);
        assert_eq!(styles.error.file_name, FileNameStyle::Short);
        assert!(styles.error.print_stack);
        assert!(styles.error.log_to_terminal);
    }

    #[test]
    fn test_policy_projection() {
        let config = LoggerConfig {
            rotate_on_every_run: true,
            max_size_mb: 3,
            max_age_seconds: 60,
            ..LoggerConfig::default()
        };
        let policy = config.policy();
        assert!(policy.rotate_on_every_run);
        assert_eq!(policy.max_size_mb, 3);
        assert_eq!(policy.max_age_seconds, 60);
    }

    #[test]
    fn test_style_for_level() {
        let config = LoggerConfig::default();
        assert_eq!(config.style_for(LogLevel::Warn), config.styles.warn);
        assert_eq!(config.style_for(LogLevel::Error), config.styles.error);
        assert_eq!(config.style_for(LogLevel::Info), config.styles.info);
    }

    #[test]
    fn test_embedded_in_host_toml_uses_defaults() {
        #[derive(Deserialize)]
        struct HostConfig {
            logging: LoggerConfig,
        }

        let parsed = toml::from_str::<HostConfig>("[logging]\n");
        assert!(parsed.is_ok());
        if let Ok(host) = parsed {
            assert_eq!(host.logging, LoggerConfig::default());
        }
    }

    #[test]
    fn test_embedded_in_host_toml_with_overrides() {
        #[derive(Deserialize)]
        struct HostConfig {
            logging: LoggerConfig,
        }

        let doc = r#"
[logging]
rotate_on_every_run = true
max_size_mb = 1
use_utc = false
base_file_name = "Server"
folder_path = "var/log"
level = "warn"

[logging.styles.info]
file_name = "short"
log_to_terminal = false
"#;
        let parsed = toml::from_str::<HostConfig>(doc);
        assert!(parsed.is_ok());
        if let Ok(host) = parsed {
            let config = host.logging;
            assert!(config.rotate_on_every_run);
            assert_eq!(config.max_size_mb, 1);
            assert!(!config.use_utc);
            assert_eq!(config.base_file_name, "Server");
            assert_eq!(config.folder_path, PathBuf::from("var/log"));
            assert_eq!(config.level, LogLevel::Warn);
            assert_eq!(config.extension, ".log");
            assert_eq!(config.styles.info.file_name, FileNameStyle::Short);
            assert!(!config.styles.info.log_to_terminal);
            assert_eq!(config.styles.error, Styles::default().error);
        }
    }
}
