//! Batch file operations for filebeam: delete, move, copy and rename.
//!
//! Batch operations are best-effort: every target is attempted, each failure is recorded in the
//! returned [OpReport], and nothing is rolled back. Rename always acts on a single path and never
//! overwrites an existing one.
//!
//! These functions block; the app runs them on the file operation worker thread.

use crate::core::error::FsError;
use crate::utils::{copy_recursive, get_unused_path};

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Delete,
    Move,
    Copy,
    Rename,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OpKind::Delete => "Delete",
            OpKind::Move => "Move",
            OpKind::Copy => "Copy",
            OpKind::Rename => "Rename",
        };
        f.write_str(s)
    }
}

/// Per-target outcome of a batch operation.
#[derive(Debug, Clone, PartialEq)]
pub struct OpReport {
    kind: OpKind,
    /// Resulting path of each successful target (the removed path for deletes).
    succeeded: Vec<PathBuf>,
    failed: Vec<(PathBuf, FsError)>,
}

impl OpReport {
    pub fn new(kind: OpKind) -> Self {
        Self {
            kind,
            succeeded: Vec::new(),
            failed: Vec::new(),
        }
    }

    fn record(&mut self, source: &Path, result: Result<PathBuf, FsError>) {
        match result {
            Ok(path) => self.succeeded.push(path),
            Err(e) => {
                tracing::warn!(op = %self.kind, path = %source.display(), error = %e, "target failed");
                self.failed.push((source.to_path_buf(), e));
            }
        }
    }

    #[inline]
    pub fn kind(&self) -> OpKind {
        self.kind
    }

    #[inline]
    pub fn succeeded(&self) -> &[PathBuf] {
        &self.succeeded
    }

    #[inline]
    pub fn failed(&self) -> &[(PathBuf, FsError)] {
        &self.failed
    }

    /// Collapses the report into a single result.
    ///
    /// All targets succeeded: `Ok(count)`. A single target that failed: its own error. Any other
    /// mix: [FsError::PartialFailure] with both counts.
    pub fn outcome(&self) -> Result<usize, FsError> {
        match (self.succeeded.len(), self.failed.as_slice()) {
            (n, []) => Ok(n),
            (0, [(_, only)]) => Err(only.clone()),
            (succeeded, failed) => Err(FsError::PartialFailure {
                op: self.kind,
                succeeded,
                failed: failed.len(),
            }),
        }
    }

    /// One line summary for the status bar.
    pub fn summary(&self) -> String {
        match self.outcome() {
            Ok(n) => {
                let verb = match self.kind {
                    OpKind::Delete => "Deleted",
                    OpKind::Move => "Moved",
                    OpKind::Copy => "Copied",
                    OpKind::Rename => "Renamed",
                };
                let noun = if n == 1 { "item" } else { "items" };
                format!("{verb} {n} {noun}")
            }
            Err(err @ FsError::PartialFailure { .. }) => match self.failed.first() {
                Some((_, first)) => format!("{err} ({first})"),
                None => err.to_string(),
            },
            Err(err) => format!("{} failed: {err}", self.kind),
        }
    }
}

/// Removes each target: directories recursively, everything else as a single file.
///
/// Symlinks are removed themselves, never their targets. With `use_trash` the targets are moved
/// to the system trash instead.
pub fn delete(targets: &[PathBuf], use_trash: bool) -> OpReport {
    let mut report = OpReport::new(OpKind::Delete);
    for target in targets {
        let result = delete_one(target, use_trash).map(|_| target.clone());
        report.record(target, result);
    }
    report
}

fn delete_one(target: &Path, use_trash: bool) -> Result<(), FsError> {
    let md = fs::symlink_metadata(target).map_err(|e| FsError::from_io(target, e))?;

    if use_trash {
        return trash::delete(target).map_err(|e| FsError::Io {
            path: target.to_path_buf(),
            reason: e.to_string(),
        });
    }

    let res = if md.is_dir() {
        fs::remove_dir_all(target)
    } else {
        fs::remove_file(target)
    };
    res.map_err(|e| FsError::from_io(target, e))
}

/// Where `source` lands when moved or copied to `destination`.
///
/// The item keeps its own name; `destination` must be an existing directory.
fn landing_path(source: &Path, destination: &Path) -> Result<PathBuf, FsError> {
    if !destination.is_dir() {
        return Err(FsError::NotFound(destination.to_path_buf()));
    }
    let name = source
        .file_name()
        .ok_or_else(|| FsError::InvalidName(source.display().to_string()))?;
    Ok(destination.join(name))
}

/// Moves each target into `destination`.
pub fn move_targets(targets: &[PathBuf], destination: &Path) -> OpReport {
    let mut report = OpReport::new(OpKind::Move);
    for source in targets {
        let result = move_one(source, destination);
        report.record(source, result);
    }
    report
}

fn move_one(source: &Path, destination: &Path) -> Result<PathBuf, FsError> {
    let md = fs::symlink_metadata(source).map_err(|e| FsError::from_io(source, e))?;
    let target = landing_path(source, destination)?;

    if target.symlink_metadata().is_ok() {
        return Err(FsError::TargetExists(target));
    }
    if md.is_dir() && target.starts_with(source) {
        return Err(FsError::IntoItself(source.to_path_buf()));
    }

    match fs::rename(source, &target) {
        Ok(()) => Ok(target),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            tracing::debug!(source = %source.display(), "cross-device move, copying");
            copy_recursive(source, &target).map_err(|e| FsError::from_io(&target, e))?;
            let removed = if md.is_dir() {
                fs::remove_dir_all(source)
            } else {
                fs::remove_file(source)
            };
            removed.map_err(|e| FsError::from_io(source, e))?;
            Ok(target)
        }
        Err(e) => Err(FsError::from_io(source, e)),
    }
}

/// Copies each target into `destination`; directories are copied recursively.
///
/// Copying an item into the directory it already lives in produces a `name_1` style duplicate.
pub fn copy_targets(targets: &[PathBuf], destination: &Path) -> OpReport {
    let mut report = OpReport::new(OpKind::Copy);
    for source in targets {
        let result = copy_one(source, destination);
        report.record(source, result);
    }
    report
}

fn copy_one(source: &Path, destination: &Path) -> Result<PathBuf, FsError> {
    let md = fs::symlink_metadata(source).map_err(|e| FsError::from_io(source, e))?;
    let mut target = landing_path(source, destination)?;

    if target == source {
        target = get_unused_path(&target);
    } else if target.symlink_metadata().is_ok() {
        return Err(FsError::TargetExists(target));
    }
    if md.is_dir() && target.starts_with(source) {
        return Err(FsError::IntoItself(source.to_path_buf()));
    }

    copy_recursive(source, &target).map_err(|e| FsError::from_io(&target, e))?;
    Ok(target)
}

/// Renames `target` to `new_name` inside the same directory.
///
/// Fails with [FsError::TargetExists] if the new name is taken and with
/// [FsError::InvalidName] for empty names or names containing a path separator.
pub fn rename(target: &Path, new_name: &str) -> Result<PathBuf, FsError> {
    let trimmed = new_name.trim();
    if trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.contains(std::path::MAIN_SEPARATOR)
        || trimmed.contains('/')
    {
        return Err(FsError::InvalidName(new_name.to_string()));
    }

    fs::symlink_metadata(target).map_err(|e| FsError::from_io(target, e))?;

    let renamed = target.with_file_name(trimmed);
    if renamed == target {
        return Ok(renamed);
    }
    if renamed.symlink_metadata().is_ok() {
        return Err(FsError::TargetExists(renamed));
    }

    fs::rename(target, &renamed).map_err(|e| FsError::from_io(target, e))?;
    Ok(renamed)
}

/// Runs [rename] and wraps the result in a report so the worker can treat all operations alike.
pub fn rename_report(target: &Path, new_name: &str) -> OpReport {
    let mut report = OpReport::new(OpKind::Rename);
    report.record(target, rename(target, new_name));
    report
}
