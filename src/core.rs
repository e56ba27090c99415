//! Core runtime logic for filebeam.
//!
//! This module contains the non-UI "engine" pieces used by the application:
//! - [error]: the [FsError] taxonomy every filesystem failure is converted into.
//! - [resolver]: symlink resolution, device identity and the process-wide capacity cache.
//! - [fm]: the [Entry] value and directory listing (see [list_dir]).
//! - [size]: file sizes, recursive directory sizes and the [SizeJobs] registry.
//! - [ops]: best-effort batch delete, move, copy and rename.
//! - [worker]: size and file operation threads and their message protocol.
//! - [formatter]: display helpers for sizes, times and usage.
//! - [terminal]: terminal setup/teardown and the crossterm/ratatui event loop.

pub mod error;
pub mod fm;
pub mod formatter;
pub mod ops;
pub mod resolver;
pub mod size;
pub mod terminal;
pub mod worker;

pub use error::FsError;
pub use fm::{Entry, EntryKind, PARENT_ENTRY_NAME, list_dir};
pub use formatter::{
    CALCULATING, format_entry_size, format_file_size, format_file_time, format_item_count,
    format_usage, sanitize_to_exact_width, usage_percent,
};
pub use ops::{OpKind, OpReport};
pub use resolver::{DeviceId, ResolvedPath, capacity_of, device_of, resolve};
pub use size::{SizeJobs, size_of_directory, size_of_file};
