//! Error taxonomy for the filebeam core.
//!
//! Every filesystem call in [crate::core] converts its `io::Error` into an [FsError] at the call
//! site. The controller and the UI only ever see these variants, never a raw I/O error.

use crate::core::ops::OpKind;

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors surfaced by listing, size computation and file operations.
///
/// None of these are fatal to the running session: they are rendered as a denial state
/// (`AccessDenied` for the current directory), dropped (`BrokenLink` inside a listing),
/// or shown as a transient message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FsError {
    #[error("Permission denied: {}", .0.display())]
    AccessDenied(PathBuf),

    #[error("Broken symlink: {}", .0.display())]
    BrokenLink(PathBuf),

    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("'{}' already exists", display_name(.0))]
    TargetExists(PathBuf),

    #[error("Invalid name: '{0}'")]
    InvalidName(String),

    #[error("Cannot place '{}' inside itself", display_name(.0))]
    IntoItself(PathBuf),

    #[error("{op}: {succeeded} succeeded, {failed} failed")]
    PartialFailure {
        op: OpKind,
        succeeded: usize,
        failed: usize,
    },

    #[error("{}: {reason}", .path.display())]
    Io { path: PathBuf, reason: String },
}

impl FsError {
    /// Classifies an I/O error raised while touching `path`.
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        let path = path.to_path_buf();
        match err.kind() {
            io::ErrorKind::PermissionDenied => FsError::AccessDenied(path),
            io::ErrorKind::NotFound => FsError::NotFound(path),
            io::ErrorKind::AlreadyExists => FsError::TargetExists(path),
            _ => FsError::Io {
                path,
                reason: err.to_string(),
            },
        }
    }

    /// Error raised when a directory cannot be enumerated.
    ///
    /// Anything other than a missing directory is reported as [FsError::AccessDenied], so the UI
    /// can tell an unreadable directory apart from an empty one.
    pub fn listing(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            _ => FsError::AccessDenied(path.to_path_buf()),
        }
    }

    /// The path this error refers to, if it carries one.
    pub fn path(&self) -> Option<&Path> {
        match self {
            FsError::AccessDenied(p)
            | FsError::BrokenLink(p)
            | FsError::NotFound(p)
            | FsError::TargetExists(p)
            | FsError::IntoItself(p)
            | FsError::Io { path: p, .. } => Some(p),
            FsError::InvalidName(_) | FsError::PartialFailure { .. } => None,
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
