//! Leveled logger backed by a dated log file.
//!
//! [`Logger::initialize`] picks the file once at startup: it reuses the most
//! recent file in the log folder, or rotates today's file out of the way and
//! starts a fresh one, depending on the [`RotationPolicy`]. If the file cannot
//! be attached the logger keeps working on the console.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

pub mod attach;
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod naming;
pub mod policy;
pub mod report;
pub mod sink;

pub use attach::{attach_log_file, rotate_current_log_file, ActiveLogFile};
pub use config::{LoggerConfig, Styles};
pub use error::{AttachError, ParseLogLevelError};
pub use logger::{FileNameStyle, LogLevel, Logger, Style};
pub use naming::LogFileName;
pub use policy::RotationPolicy;
