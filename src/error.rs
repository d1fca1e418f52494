//! Error types used throughout the crate.
//!
//! Attachment failures are never fatal to the host: [`crate::Logger`] reports
//! them on the console and keeps running without a file. They are still typed
//! so callers that drive [`crate::attach`] directly can react precisely.

use std::io;
use std::path::PathBuf;

/// Errors that can occur while attaching the log file.
#[derive(Debug)]
pub enum AttachError {
    /// The log folder could not be turned into an absolute path.
    PathResolutionFailed(PathBuf, io::Error),
    /// The log folder exists (or may exist) but could not be inspected.
    FolderInspectFailed(PathBuf, io::Error),
    /// The log folder was missing and could not be created.
    FolderCreateFailed(PathBuf, io::Error),
    /// The log folder listing could not be read.
    FolderReadFailed(PathBuf, io::Error),
    /// Renaming the canonical file to its numbered name failed.
    RotationRenameFailed {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    /// Every numbered name up to the suffix limit is already taken.
    RotationSuffixesExhausted(PathBuf, u32),
    /// Rotation reported success but the canonical file is still present.
    RotationInvariantViolated(PathBuf),
    /// The active log file could not be opened or created.
    FileOpenFailed(PathBuf, io::Error),
}

impl std::fmt::Display for AttachError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PathResolutionFailed(path, err) => {
                write!(f, "Failed to resolve log folder {}: {err}", path.display())
            }
            Self::FolderInspectFailed(path, err) => {
                write!(f, "Failed to inspect log folder {}: {err}", path.display())
            }
            Self::FolderCreateFailed(path, err) => {
                write!(f, "Failed to create log folder {}: {err}", path.display())
            }
            Self::FolderReadFailed(path, err) => {
                write!(f, "Failed to read log folder {}: {err}", path.display())
            }
            Self::RotationRenameFailed { from, to, source } => write!(
                f,
                "Failed to rotate {} to {}: {source}",
                from.display(),
                to.display()
            ),
            Self::RotationSuffixesExhausted(path, attempts) => write!(
                f,
                "No free rotation name for {} after {attempts} attempts",
                path.display()
            ),
            Self::RotationInvariantViolated(path) => write!(
                f,
                "Log file {} still exists after rotation; refusing to overwrite it",
                path.display()
            ),
            Self::FileOpenFailed(path, err) => {
                write!(f, "Failed to open log file {}: {err}", path.display())
            }
        }
    }
}

impl std::error::Error for AttachError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::PathResolutionFailed(_, err)
            | Self::FolderInspectFailed(_, err)
            | Self::FolderCreateFailed(_, err)
            | Self::FolderReadFailed(_, err)
            | Self::FileOpenFailed(_, err) => Some(err),
            Self::RotationRenameFailed { source, .. } => Some(source),
            Self::RotationSuffixesExhausted(..) | Self::RotationInvariantViolated(_) => None,
        }
    }
}

/// Returned when a string does not name a [`crate::LogLevel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseLogLevelError;

impl std::fmt::Display for ParseLogLevelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid log level")
    }
}

impl std::error::Error for ParseLogLevelError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::path::PathBuf;

    #[test]
    fn test_folder_create_failed() {
        let path = PathBuf::from("/fake/logs");
        let io_err = io::Error::new(io::ErrorKind::NotFound, "parent missing");
        let err = AttachError::FolderCreateFailed(path, io_err);
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to create log folder /fake/logs:"));
        assert!(msg.contains("parent missing"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_rotation_rename_failed() {
        let err = AttachError::RotationRenameFailed {
            from: PathBuf::from("/logs/Log_1_2_2024.log"),
            to: PathBuf::from("/logs/Log_1_2_2024_1.log"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        assert_eq!(
            err.to_string(),
            "Failed to rotate /logs/Log_1_2_2024.log to /logs/Log_1_2_2024_1.log: denied"
        );
        assert!(err.source().is_some());
    }

    #[test]
    fn test_rotation_suffixes_exhausted() {
        let err = AttachError::RotationSuffixesExhausted(PathBuf::from("/logs/Log_1_2_2024.log"), 10);
        assert_eq!(
            err.to_string(),
            "No free rotation name for /logs/Log_1_2_2024.log after 10 attempts"
        );
        assert!(err.source().is_none());
    }

    #[test]
    fn test_rotation_invariant_violated() {
        let err = AttachError::RotationInvariantViolated(PathBuf::from("/logs/Log_1_2_2024.log"));
        assert!(err.to_string().contains("still exists after rotation"));
    }

    #[test]
    fn test_file_open_failed() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "read-only");
        let err = AttachError::FileOpenFailed(PathBuf::from("/logs/a.log"), io_err);
        assert_eq!(err.to_string(), "Failed to open log file /logs/a.log: read-only");
    }

    #[test]
    fn test_parse_log_level_error() {
        assert_eq!(ParseLogLevelError.to_string(), "invalid log level");
    }
}
