//! Log file attachment.
//!
//! Runs once at startup and settles which file backs the log stream:
//!
//! 1. Resolve the log folder and create it if missing (one level only).
//! 2. Ask [`crate::policy`] whether to create, reuse, or rotate.
//! 3. When rotating, rename today's file to the first free `_N` name.
//! 4. Open (or create) the chosen file for appending.
//!
//! A rename never targets an existing file and a rotated file keeps its
//! contents verbatim. There is no rotation while the process runs; a long
//! running process keeps writing to the file chosen here.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::NaiveDate;

use crate::config::LoggerConfig;
use crate::error::AttachError;
use crate::naming::LogFileName;
use crate::policy::{self, Decision, FileCandidate};

/// Upper bound on `_N` names tried for one day before giving up.
pub const MAX_ROTATION_SUFFIXES: u32 = 10_000;

/// The file the logger writes to after a successful attach.
#[derive(Debug)]
pub struct ActiveLogFile {
    pub path: PathBuf,
    /// Where the previous file with the canonical name went, if one was moved.
    pub rotated_to: Option<PathBuf>,
    pub file: File,
}

/// Attach the log file for `date` according to `config`.
pub fn attach_log_file(config: &LoggerConfig, date: NaiveDate) -> Result<ActiveLogFile, AttachError> {
    let folder = resolve_folder(&config.folder_path)?;
    ensure_folder(&folder)?;

    let name = LogFileName::new(&config.base_file_name, date, &config.extension);
    let canonical = folder.join(name.canonical());

    let latest = policy::latest_file(scan_folder(&folder)?);
    let decision = policy::decide(&config.policy(), latest.as_ref(), SystemTime::now());

    let (path, rotated_to) = match decision {
        Decision::Create => (canonical, None),
        Decision::Reuse(existing) => (existing, None),
        Decision::Rotate => {
            let rotated_to = rotate_current_log_file(&folder, &name)?;
            verify_rotated(&canonical)?;
            (canonical, rotated_to)
        }
    };

    let file = open_append(&path)?;
    Ok(ActiveLogFile {
        path,
        rotated_to,
        file,
    })
}

/// Move today's canonical file out of the way.
///
/// Returns the numbered path the file was renamed to, or `None` when there
/// was no canonical file (nothing on disk changes in that case). Probing is
/// linear from `_1`, so the cost grows with the number of rotations already
/// made today.
pub fn rotate_current_log_file(
    folder: &Path,
    name: &LogFileName,
) -> Result<Option<PathBuf>, AttachError> {
    rotate_with_limit(folder, name, MAX_ROTATION_SUFFIXES)
}

fn rotate_with_limit(
    folder: &Path,
    name: &LogFileName,
    max_suffixes: u32,
) -> Result<Option<PathBuf>, AttachError> {
    let current = folder.join(name.canonical());
    if !exists(&current) {
        return Ok(None);
    }

    let target = (1..=max_suffixes)
        .map(|counter| folder.join(name.numbered(counter)))
        .find(|candidate| !exists(candidate))
        .ok_or_else(|| AttachError::RotationSuffixesExhausted(current.clone(), max_suffixes))?;

    fs::rename(&current, &target).map_err(|source| AttachError::RotationRenameFailed {
        from: current,
        to: target.clone(),
        source,
    })?;

    Ok(Some(target))
}

/// Fail if `canonical` survived a rotation that reported success.
fn verify_rotated(canonical: &Path) -> Result<(), AttachError> {
    if exists(canonical) {
        return Err(AttachError::RotationInvariantViolated(canonical.to_path_buf()));
    }
    Ok(())
}

/// Make `folder` absolute, expanding a leading `~` to the home directory.
pub fn resolve_folder(folder: &Path) -> Result<PathBuf, AttachError> {
    if let Ok(rest) = folder.strip_prefix("~") {
        let home = dirs::home_dir().ok_or_else(|| {
            AttachError::PathResolutionFailed(
                folder.to_path_buf(),
                io::Error::new(io::ErrorKind::NotFound, "home directory not found"),
            )
        })?;
        return Ok(home.join(rest));
    }

    std::path::absolute(folder)
        .map_err(|err| AttachError::PathResolutionFailed(folder.to_path_buf(), err))
}

/// Create `folder` if it does not exist. Missing parents are an error.
fn ensure_folder(folder: &Path) -> Result<(), AttachError> {
    match fs::metadata(folder) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(AttachError::FolderInspectFailed(
            folder.to_path_buf(),
            io::Error::other("path exists but is not a directory"),
        )),
        Err(err) if err.kind() == io::ErrorKind::NotFound => fs::create_dir(folder)
            .map_err(|err| AttachError::FolderCreateFailed(folder.to_path_buf(), err)),
        Err(err) => Err(AttachError::FolderInspectFailed(folder.to_path_buf(), err)),
    }
}

fn scan_folder(folder: &Path) -> Result<Vec<FileCandidate>, AttachError> {
    let read_failed = |err| AttachError::FolderReadFailed(folder.to_path_buf(), err);

    let mut candidates = Vec::new();
    for entry in fs::read_dir(folder).map_err(read_failed)? {
        let entry = entry.map_err(read_failed)?;
        // Entries removed between listing and stat are skipped.
        let Ok(meta) = entry.metadata() else {
            continue;
        };
        candidates.push(FileCandidate {
            path: entry.path(),
            is_dir: meta.is_dir(),
            size: meta.len(),
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        });
    }
    Ok(candidates)
}

fn open_append(path: &Path) -> Result<File, AttachError> {
    OpenOptions::new()
        .read(true)
        .append(true)
        .create(true)
        .open(path)
        .map_err(|err| AttachError::FileOpenFailed(path.to_path_buf(), err))
}

fn exists(path: &Path) -> bool {
    fs::symlink_metadata(path).is_ok()
}
