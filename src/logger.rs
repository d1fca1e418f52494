//! Leveled logging front end.
//!
//! A [`Logger`] is created once with [`Logger::initialize`], which attaches
//! the log file (see [`crate::attach`]). Every line goes to the attached file;
//! when no file could be attached, lines go to stderr instead and the process
//! carries on.
//!
//! # Line format
//!
//! ```text
//! 2024/03/07 09:15:02 WARN:: /src/net.rs(88)>> connection reset
//! ```
//!
//! The timestamp is present when `show_time` is set and uses UTC or local time
//! per `use_utc`. The call-site part depends on the level's [`Style`]. While a
//! file is attached, styles with `log_to_terminal` also print the line
//! (without timestamp) to stdout.

use std::backtrace::Backtrace;
use std::fmt::Write as _;
use std::io::{self, Write as _};
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use serde::Deserialize;

use crate::attach::attach_log_file;
use crate::config::LoggerConfig;
use crate::error::{AttachError, ParseLogLevelError};
use crate::naming;
use crate::sink::LogSink;

const PREFIX_INFO: &str = "LOG::";
const PREFIX_WARN: &str = "WARN::";
const PREFIX_ERROR: &str = "ERROR!";

const MAX_STREAM: u8 = 63;

/// Log verbosity levels, ordered from least to most verbose.
///
/// A message is written when its level is less than or equal to the
/// configured level. `Off` silences every leveled call; [`Logger::raw`] is
/// not affected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off = 0,
    Error = 1,
    Warn = 2,
    #[default]
    Info = 3,
}

impl LogLevel {
    const fn prefix(self) -> &'static str {
        match self {
            Self::Info | Self::Off => PREFIX_INFO,
            Self::Warn => PREFIX_WARN,
            Self::Error => PREFIX_ERROR,
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Off => write!(f, "OFF"),
            Self::Error => write!(f, "ERROR"),
            Self::Warn => write!(f, "WARN"),
            Self::Info => write!(f, "INFO"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "error" => Ok(Self::Error),
            "warn" => Ok(Self::Warn),
            "info" => Ok(Self::Info),
            _ => Err(ParseLogLevelError),
        }
    }
}

/// How much of the call site to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileNameStyle {
    #[default]
    None,
    /// File name only, e.g. `net.rs(88)`.
    Short,
    /// Path as recorded by the compiler, e.g. `src/net.rs(88)`.
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Style {
    pub file_name: FileNameStyle,
    /// Append a backtrace, framed by blank lines.
    pub print_stack: bool,
    /// Mirror to stdout while a file is attached.
    pub log_to_terminal: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            file_name: FileNameStyle::None,
            print_stack: false,
            log_to_terminal: true,
        }
    }
}

/// Process logger bound to one log file (or to stderr).
///
/// Safe to share between threads behind an `Arc`. The file is flushed and
/// closed when the logger is dropped or [`Logger::shutdown`] is called.
#[derive(Debug)]
pub struct Logger {
    config: LoggerConfig,
    sink: LogSink,
    path: Option<PathBuf>,
    rotated_to: Option<PathBuf>,
    attach_error: Option<AttachError>,
    streams: AtomicU64,
}

impl Logger {
    /// Attach today's log file and build the logger.
    ///
    /// Never fails: if the file cannot be attached the reason is printed to
    /// stderr, kept in [`Logger::attach_error`], and the logger writes to
    /// stderr for the rest of its life.
    pub fn initialize(config: LoggerConfig) -> Self {
        let date = naming::today(config.use_utc);
        Self::initialize_for_date(config, date)
    }

    /// Like [`Logger::initialize`] with an explicit date for file naming.
    pub fn initialize_for_date(config: LoggerConfig, date: NaiveDate) -> Self {
        let (sink, path, rotated_to, attach_error) = match attach_log_file(&config, date) {
            Ok(active) => (
                LogSink::file(active.file),
                Some(active.path),
                active.rotated_to,
                None,
            ),
            Err(err) => {
                eprintln!("[LoggerInit] Error: Failed to setup logFile. {err}");
                (LogSink::stderr(), None, None, Some(err))
            }
        };

        let logger = Self {
            config,
            sink,
            path,
            rotated_to,
            attach_error,
            streams: AtomicU64::new(0),
        };
        logger.announce();
        logger
    }

    fn announce(&self) {
        if self.attach_error.is_some() {
            self.raw("LOGGER SETUP: Log File Failed to attach!");
        } else if self.config.show_init_logs {
            self.raw("LOGGER SETUP");
        }

        if !self.config.show_init_logs {
            return;
        }
        if self.config.use_utc {
            self.raw("Logger is using UTC time");
            self.raw(&format!("LocalTime {}", chrono::Local::now()));
        } else {
            self.raw("Logger is using Local time");
            self.raw(&format!("UTC Time {}", chrono::Utc::now()));
        }
    }

    /// Whether lines are going to a file.
    pub const fn attached(&self) -> bool {
        self.path.is_some()
    }

    pub fn log_file_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Where the previous file with today's name was moved during attach.
    pub fn rotated_to(&self) -> Option<&Path> {
        self.rotated_to.as_deref()
    }

    pub const fn attach_error(&self) -> Option<&AttachError> {
        self.attach_error.as_ref()
    }

    pub const fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::Off && level <= self.config.level
    }

    #[track_caller]
    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message, Location::caller());
    }

    #[track_caller]
    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message, Location::caller());
    }

    #[track_caller]
    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, Location::caller());
    }

    /// Info-level message on a numbered sub-channel that is off until
    /// enabled with [`Logger::enable_stream`].
    #[track_caller]
    pub fn info_stream(&self, stream: u8, message: &str) {
        if self.stream_enabled(stream) {
            self.log(
                LogLevel::Info,
                &format!("{stream} | {message}"),
                Location::caller(),
            );
        }
    }

    /// Message with no level prefix or call site. Always written.
    pub fn raw(&self, message: &str) {
        let _ = self
            .sink
            .write_line(&format!("{}{message}", self.timestamp()));

        if self.attached() && self.config.raw_to_terminal {
            println!("{message}");
        }
    }

    /// Streams above 63 are clamped to 63.
    pub fn enable_stream(&self, enable: bool, stream: u8) {
        let bit = 1u64 << stream.min(MAX_STREAM);
        if enable {
            self.streams.fetch_or(bit, Ordering::Relaxed);
        } else {
            self.streams.fetch_and(!bit, Ordering::Relaxed);
        }
    }

    pub fn enable_streams(&self, enable: bool, streams: &[u8]) {
        for &stream in streams {
            self.enable_stream(enable, stream);
        }
    }

    pub fn enable_all_streams(&self, enable: bool) {
        self.streams
            .store(if enable { u64::MAX } else { 0 }, Ordering::Relaxed);
    }

    /// Streams above 63 are never enabled.
    pub fn stream_enabled(&self, stream: u8) -> bool {
        if stream > MAX_STREAM {
            return false;
        }
        self.streams.load(Ordering::Relaxed) & (1u64 << stream) != 0
    }

    /// Flush and sync the log file. Dropping the logger does the same but
    /// cannot report errors.
    pub fn shutdown(self) -> io::Result<()> {
        self.sink.flush()
    }

    fn log(&self, level: LogLevel, message: &str, location: &Location<'_>) {
        if !self.enabled(level) {
            return;
        }

        let style = self.config.style_for(level);
        let body = format_body(level, style.file_name, message, location);
        let stack = style
            .print_stack
            .then(|| Backtrace::force_capture().to_string());

        let entry = match &stack {
            Some(stack) => format!("\n{}{body}\n{}\n", self.timestamp(), stack.trim_end()),
            None => format!("{}{body}", self.timestamp()),
        };
        let _ = self.sink.write_line(&entry);

        if self.attached() && style.log_to_terminal {
            let mirror = match &stack {
                Some(stack) => format!("{body}\n{}\n", stack.trim_end()),
                None => format!("{body}\n"),
            };
            let _ = io::stdout().lock().write_all(mirror.as_bytes());
        }
    }

    fn timestamp(&self) -> String {
        if !self.config.show_time {
            return String::new();
        }
        let format = "%Y/%m/%d %H:%M:%S ";
        if self.config.use_utc {
            chrono::Utc::now().format(format).to_string()
        } else {
            chrono::Local::now().format(format).to_string()
        }
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        let _ = self.sink.flush();
    }
}

/// Prefix, optional call site, and message, without timestamp.
fn format_body(
    level: LogLevel,
    file_name: FileNameStyle,
    message: &str,
    location: &Location<'_>,
) -> String {
    let mut body = String::from(level.prefix());
    let file = match file_name {
        FileNameStyle::None => None,
        FileNameStyle::Short => Some(
            Path::new(location.file())
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or_else(|| location.file()),
        ),
        FileNameStyle::Long => Some(location.file()),
    };
    if let Some(file) = file {
        let _ = write!(body, " {file}({})>>", location.line());
    }
    body.push(' ');
    body.push_str(message);
    body
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::fs;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn quiet_config(dir: &Path) -> LoggerConfig {
        let silent = Style {
            log_to_terminal: false,
            ..Style::default()
        };
        let mut config = LoggerConfig {
            folder_path: dir.join("logs"),
            raw_to_terminal: false,
            ..LoggerConfig::default()
        };
        config.styles.info = silent;
        config.styles.warn = Style {
            file_name: FileNameStyle::Long,
            ..silent
        };
        config.styles.error = Style {
            file_name: FileNameStyle::Short,
            ..silent
        };
        config
    }

    fn read_log(logger: &Logger) -> String {
        fs::read_to_string(logger.log_file_path().unwrap()).unwrap()
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Off < LogLevel::Error);
        assert!(LogLevel::Error < LogLevel::Warn);
        assert!(LogLevel::Warn < LogLevel::Info);
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from_str("error"), Ok(LogLevel::Error));
        assert_eq!(LogLevel::from_str("ERROR"), Ok(LogLevel::Error));
        assert_eq!(LogLevel::from_str("Warn"), Ok(LogLevel::Warn));
        assert_eq!(LogLevel::from_str("info"), Ok(LogLevel::Info));
        assert_eq!(LogLevel::from_str("off"), Ok(LogLevel::Off));
        assert_eq!(LogLevel::from_str("none"), Ok(LogLevel::Off));

        assert!(LogLevel::from_str("invalid").is_err());
        assert!(LogLevel::from_str("").is_err());
        assert!(LogLevel::from_str("debug").is_err());
    }

    #[test]
    fn test_log_level_display() {
        assert_eq!(format!("{}", LogLevel::Off), "OFF");
        assert_eq!(format!("{}", LogLevel::Error), "ERROR");
        assert_eq!(format!("{}", LogLevel::Warn), "WARN");
        assert_eq!(format!("{}", LogLevel::Info), "INFO");
    }

    #[test]
    fn test_format_body_prefixes() {
        let here = Location::caller();
        assert_eq!(
            format_body(LogLevel::Info, FileNameStyle::None, "hello", here),
            "LOG:: hello"
        );
        assert_eq!(
            format_body(LogLevel::Warn, FileNameStyle::None, "careful", here),
            "WARN:: careful"
        );
        assert_eq!(
            format_body(LogLevel::Error, FileNameStyle::None, "boom", here),
            "ERROR! boom"
        );
    }

    #[test]
    fn test_format_body_short_file_name() {
        let here = Location::caller();
        let body = format_body(LogLevel::Error, FileNameStyle::Short, "boom", here);
        assert_eq!(body, format!("ERROR! logger.rs({})>> boom", here.line()));
    }

    #[test]
    fn test_format_body_long_file_name() {
        let here = Location::caller();
        let body = format_body(LogLevel::Warn, FileNameStyle::Long, "careful", here);
        assert_eq!(
            body,
            format!("WARN:: {}({})>> careful", here.file(), here.line())
        );
        assert!(body.contains("src"));
    }

    #[test]
    fn test_initialize_attaches_and_writes_lines() {
        let dir = TempDir::new().unwrap();
        let logger = Logger::initialize(quiet_config(dir.path()));
        assert!(logger.attached());
        assert!(logger.attach_error().is_none());

        logger.info("test message");

        let content = read_log(&logger);
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("LOG:: test message"));

        let timestamp = &lines[0][..19];
        assert!(chrono::NaiveDateTime::parse_from_str(timestamp, "%Y/%m/%d %H:%M:%S").is_ok());
    }

    #[test]
    fn test_level_filter() {
        let dir = TempDir::new().unwrap();
        let config = LoggerConfig {
            level: LogLevel::Warn,
            ..quiet_config(dir.path())
        };
        let logger = Logger::initialize(config);

        logger.info("hidden");
        logger.warn("shown");

        let content = read_log(&logger);
        assert!(!content.contains("hidden"));
        assert!(content.contains("WARN::"));
        assert!(content.contains("shown"));
    }

    #[test]
    fn test_level_off_silences_leveled_calls_only() {
        let dir = TempDir::new().unwrap();
        let config = LoggerConfig {
            level: LogLevel::Off,
            show_time: false,
            ..quiet_config(dir.path())
        };
        let logger = Logger::initialize(config);

        logger.error("hidden");
        logger.raw("always");

        assert_eq!(read_log(&logger), "always\n");
    }

    #[test]
    fn test_call_site_is_the_caller() {
        let dir = TempDir::new().unwrap();
        let config = LoggerConfig {
            show_time: false,
            ..quiet_config(dir.path())
        };
        let logger = Logger::initialize(config);

        let line = line!() + 1;
        logger.warn("careful");

        let content = read_log(&logger);
        assert!(content.starts_with("WARN:: "));
        assert!(content.contains(&format!("logger.rs({line})>> careful")));
    }

    #[test]
    fn test_error_with_stack_is_framed_by_blank_lines() {
        let dir = TempDir::new().unwrap();
        let mut config = LoggerConfig {
            show_time: false,
            ..quiet_config(dir.path())
        };
        config.styles.error.print_stack = true;
        let logger = Logger::initialize(config);

        logger.error("boom");
        logger.info("after");

        let content = read_log(&logger);
        assert!(content.starts_with("\nERROR! logger.rs("));
        assert!(content.ends_with("\n\nLOG:: after\n"));
        assert!(content.lines().count() > 4);
    }

    #[test]
    fn test_info_stream_requires_enabled_stream() {
        let dir = TempDir::new().unwrap();
        let config = LoggerConfig {
            show_time: false,
            ..quiet_config(dir.path())
        };
        let logger = Logger::initialize(config);

        logger.info_stream(3, "dropped");
        logger.enable_stream(true, 3);
        logger.info_stream(3, "kept");

        assert_eq!(read_log(&logger), "LOG:: 3 | kept\n");
    }

    #[test]
    fn test_info_stream_out_of_range_is_never_written() {
        let dir = TempDir::new().unwrap();
        let config = LoggerConfig {
            show_time: false,
            ..quiet_config(dir.path())
        };
        let logger = Logger::initialize(config);

        logger.enable_stream(true, 63);
        logger.info_stream(200, "dropped");
        logger.info_stream(63, "kept");
        logger.enable_all_streams(true);
        logger.info_stream(64, "dropped");

        assert_eq!(read_log(&logger), "LOG:: 63 | kept\n");
    }

    #[test]
    fn test_stream_mask() {
        let dir = TempDir::new().unwrap();
        let logger = Logger::initialize(quiet_config(dir.path()));

        assert!(!logger.stream_enabled(0));
        logger.enable_streams(true, &[0, 5, 200]);
        assert!(logger.stream_enabled(0));
        assert!(logger.stream_enabled(5));
        assert!(logger.stream_enabled(63));
        assert!(!logger.stream_enabled(200));
        assert!(!logger.stream_enabled(6));

        logger.enable_stream(false, 5);
        assert!(!logger.stream_enabled(5));

        logger.enable_all_streams(true);
        assert!(logger.stream_enabled(42));
        logger.enable_all_streams(false);
        assert!(!logger.stream_enabled(0));
    }

    #[test]
    fn test_show_init_logs_writes_banner() {
        let dir = TempDir::new().unwrap();
        let config = LoggerConfig {
            show_init_logs: true,
            show_time: false,
            ..quiet_config(dir.path())
        };
        let logger = Logger::initialize(config);

        let content = read_log(&logger);
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "LOGGER SETUP");
        assert_eq!(lines[1], "Logger is using UTC time");
        assert!(lines[2].starts_with("LocalTime "));
    }

    #[test]
    fn test_failed_attach_falls_back_to_console() {
        let dir = TempDir::new().unwrap();
        let config = LoggerConfig {
            folder_path: dir.path().join("missing").join("logs"),
            ..quiet_config(dir.path())
        };
        let logger = Logger::initialize(config);

        assert!(!logger.attached());
        assert!(logger.log_file_path().is_none());
        assert!(matches!(
            logger.attach_error(),
            Some(AttachError::FolderCreateFailed(..))
        ));

        logger.error("still works");
    }

    #[test]
    fn test_shutdown_flushes() {
        let dir = TempDir::new().unwrap();
        let config = LoggerConfig {
            show_time: false,
            ..quiet_config(dir.path())
        };
        let logger = Logger::initialize(config);
        let path = logger.log_file_path().unwrap().to_path_buf();

        logger.info("last words");
        assert!(logger.shutdown().is_ok());

        assert_eq!(fs::read_to_string(path).unwrap(), "LOG:: last words\n");
    }
}
