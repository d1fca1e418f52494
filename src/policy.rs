//! Rotation decisions.
//!
//! Everything here is pure: callers gather file metadata and this module
//! answers whether the file that would be used needs to be rotated first.

use std::path::PathBuf;
use std::time::SystemTime;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// When to start a fresh log file. Fixed for the lifetime of a logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RotationPolicy {
    /// Start a new file every time the process starts.
    pub rotate_on_every_run: bool,
    /// Rotate once the latest file is larger than this many MiB. 0 disables.
    pub max_size_mb: u64,
    /// Rotate once the latest file is older than this. 0 disables.
    pub max_age_seconds: u64,
}

/// Metadata of one entry in the log folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub path: PathBuf,
    pub is_dir: bool,
    pub size: u64,
    pub modified: SystemTime,
}

/// What the attachment step should do with the log folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Nothing to reuse: create today's file.
    Create,
    /// Keep appending to an existing file.
    Reuse(PathBuf),
    /// Move today's file out of the way and start a fresh one.
    Rotate,
}

/// Size is compared in whole MiB, so a 1.5 MiB file does not exceed a 1 MiB
/// limit. Unknown size never triggers rotation.
pub fn needs_rotation_by_size(size_bytes: Option<u64>, policy: &RotationPolicy) -> bool {
    if policy.max_size_mb == 0 {
        return false;
    }
    size_bytes.is_some_and(|size| size / BYTES_PER_MB > policy.max_size_mb)
}

/// Age-based rotation is not yet implemented: this always answers `false`
/// regardless of `max_age_seconds`. The signature is the hook a future
/// policy plugs into.
pub const fn needs_rotation_by_age(
    _modified: SystemTime,
    _now: SystemTime,
    _policy: &RotationPolicy,
) -> bool {
    false
}

pub const fn needs_rotation_on_run(policy: &RotationPolicy) -> bool {
    policy.rotate_on_every_run
}

/// Pick the most recently modified regular file.
///
/// A strictly newer modification time wins. Equal times are broken by the
/// lexically smallest file name, so the result does not depend on the order
/// in which the directory was listed.
pub fn latest_file<I>(candidates: I) -> Option<FileCandidate>
where
    I: IntoIterator<Item = FileCandidate>,
{
    candidates
        .into_iter()
        .filter(|c| !c.is_dir)
        .reduce(|best, next| {
            let newer = next.modified > best.modified
                || (next.modified == best.modified && next.path.file_name() < best.path.file_name());
            if newer {
                next
            } else {
                best
            }
        })
}

/// Decide between creating, reusing, and rotating.
///
/// `latest` is the result of [`latest_file`] over the log folder.
pub fn decide(policy: &RotationPolicy, latest: Option<&FileCandidate>, now: SystemTime) -> Decision {
    if needs_rotation_on_run(policy) {
        return Decision::Rotate;
    }

    let Some(latest) = latest else {
        return Decision::Create;
    };

    if needs_rotation_by_size(Some(latest.size), policy)
        || needs_rotation_by_age(latest.modified, now, policy)
    {
        Decision::Rotate
    } else {
        Decision::Reuse(latest.path.clone())
    }
}
