//! Serialized line writer shared by every logging thread.

use std::fs::File;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

enum Target {
    File(File),
    Stderr,
}

/// Destination for finished log lines.
///
/// Each call to [`LogSink::write_line`] holds the lock for a single
/// `write_all`, so concurrent writers never interleave partial lines.
pub struct LogSink {
    target: Mutex<Target>,
}

impl LogSink {
    pub const fn file(file: File) -> Self {
        Self {
            target: Mutex::new(Target::File(file)),
        }
    }

    /// Console-only fallback used when no file is attached.
    pub const fn stderr() -> Self {
        Self {
            target: Mutex::new(Target::Stderr),
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(*self.lock(), Target::File(_))
    }

    /// Write `line` followed by a newline as one unit.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut entry = String::with_capacity(line.len() + 1);
        entry.push_str(line);
        entry.push('\n');

        match &mut *self.lock() {
            Target::File(file) => file.write_all(entry.as_bytes()),
            Target::Stderr => io::stderr().lock().write_all(entry.as_bytes()),
        }
    }

    /// Flush buffered data and, for files, sync it to disk.
    pub fn flush(&self) -> io::Result<()> {
        match &mut *self.lock() {
            Target::File(file) => {
                file.flush()?;
                file.sync_all()
            }
            Target::Stderr => io::stderr().flush(),
        }
    }

    // A writer that panicked mid-line leaves nothing half-built in the
    // target, so a poisoned lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, Target> {
        self.target
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl std::fmt::Debug for LogSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.is_file() { "file" } else { "stderr" };
        f.debug_struct("LogSink").field("target", &kind).finish()
    }
}
