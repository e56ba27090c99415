//! The general configuration settings for filebeam.
//!
//! [General] is deserialized from the `[general]` table, [InternalGeneral] is the checked form
//! used at runtime.

use serde::Deserialize;

pub const MIN_SIZE_WORKERS: usize = 1;
pub const DEFAULT_SIZE_WORKERS: usize = 2;
pub const MAX_SIZE_WORKERS: usize = 16;

#[derive(Deserialize, Debug)]
#[serde(default)]
pub struct General {
    show_hidden: bool,
    move_to_trash: bool,
    size_workers: usize,
}

impl Default for General {
    fn default() -> Self {
        General {
            show_hidden: false,
            move_to_trash: false,
            size_workers: DEFAULT_SIZE_WORKERS,
        }
    }
}

#[derive(Debug)]
pub struct InternalGeneral {
    show_hidden: bool,
    move_to_trash: bool,
    size_workers: usize,
}

impl From<General> for InternalGeneral {
    fn from(g: General) -> Self {
        Self {
            show_hidden: g.show_hidden,
            move_to_trash: g.move_to_trash,
            size_workers: clamp_size_workers(g.size_workers),
        }
    }
}

impl InternalGeneral {
    #[inline]
    pub fn show_hidden(&self) -> bool {
        self.show_hidden
    }

    #[inline]
    pub fn move_to_trash(&self) -> bool {
        self.move_to_trash
    }

    #[inline]
    pub fn size_workers(&self) -> usize {
        self.size_workers
    }
}

/// Clamps the size worker count into [MIN_SIZE_WORKERS]..=[MAX_SIZE_WORKERS].
fn clamp_size_workers(value: usize) -> usize {
    let clamped = value.clamp(MIN_SIZE_WORKERS, MAX_SIZE_WORKERS);
    if clamped != value {
        eprintln!(
            "[Warning] size_workers={} out of range ({}..={}), clamped to {}",
            value, MIN_SIZE_WORKERS, MAX_SIZE_WORKERS, clamped
        );
    }
    clamped
}
