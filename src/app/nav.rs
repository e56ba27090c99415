//! Navigation state and file list logic for filebeam.
//!
//! Holds the current directory, its entries, the focused row and the denial state shown when the
//! directory cannot be read. Entries are replaced wholesale on every listing; directory sizes are
//! patched in one at a time as their size jobs complete.

use crate::core::{Entry, EntryKind, FsError, list_dir};

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

pub struct NavState {
    current_dir: PathBuf,
    entries: Vec<Entry>,
    focus: usize,
    listing_error: Option<FsError>,
}

impl NavState {
    pub fn new(path: PathBuf) -> Self {
        Self {
            current_dir: path,
            entries: Vec::new(),
            focus: 0,
            listing_error: None,
        }
    }

    // Getters / Accessors

    #[inline]
    pub fn current_dir(&self) -> &Path {
        &self.current_dir
    }

    #[inline]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    #[inline]
    pub fn focus_idx(&self) -> usize {
        self.focus
    }

    /// Set when the current directory could not be enumerated.
    #[inline]
    pub fn is_denied(&self) -> bool {
        matches!(self.listing_error, Some(FsError::AccessDenied(_)))
    }

    pub fn focused_entry(&self) -> Option<&Entry> {
        self.entries.get(self.focus)
    }

    /// Path of the focused entry if it can be acted on; the `..` entry never is.
    pub fn focused_target(&self) -> Option<&Path> {
        self.focused_entry()
            .filter(|e| !e.is_parent())
            .map(Entry::path)
    }

    /// Paths of the real directories in the listing.
    pub fn directory_paths(&self) -> impl Iterator<Item = &Path> {
        self.entries
            .iter()
            .filter(|e| e.kind() == EntryKind::Directory)
            .map(Entry::path)
    }

    // Navigation functions

    /// Moves the focus up by one entry. Returns false at the top.
    pub fn move_up(&mut self) -> bool {
        if self.focus == 0 {
            return false;
        }
        self.focus -= 1;
        true
    }

    /// Moves the focus down by one entry. Returns false at the bottom.
    pub fn move_down(&mut self) -> bool {
        if self.focus + 1 >= self.entries.len() {
            return false;
        }
        self.focus += 1;
        true
    }

    /// Lists `path` and makes it the current directory.
    ///
    /// The entry named `focus` is focused if present. Otherwise the focus resets to the top, or
    /// stays on the same row (clamped) when `path` is the directory already shown.
    ///
    /// An unreadable directory still becomes current, with no entries and the error kept for
    /// display. Any other failure leaves the state untouched.
    pub fn load(
        &mut self,
        path: PathBuf,
        show_hidden: bool,
        focus: Option<&OsStr>,
    ) -> Result<(), FsError> {
        match list_dir(&path, show_hidden) {
            Ok(entries) => {
                let same_dir = path == self.current_dir && self.listing_error.is_none();
                let fallback = if same_dir { self.focus } else { 0 };

                self.focus = focus
                    .and_then(|name| entries.iter().position(|e| e.name() == name))
                    .unwrap_or(fallback)
                    .min(entries.len().saturating_sub(1));
                self.current_dir = path;
                self.entries = entries;
                self.listing_error = None;
                Ok(())
            }
            Err(err @ FsError::AccessDenied(_)) => {
                tracing::debug!(path = %path.display(), "directory not readable");
                self.current_dir = path;
                self.entries.clear();
                self.focus = 0;
                self.listing_error = Some(err.clone());
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Applies a completed directory size to the entry at `path`.
    ///
    /// Only a directory whose size is still unknown is patched, so a size is never applied twice
    /// to the same listing. Returns true if an entry changed.
    pub fn patch_size(&mut self, path: &Path, size: u64) -> bool {
        let Some(slot) = self.entries.iter_mut().find(|e| {
            e.kind() == EntryKind::Directory && !e.size_known() && e.path() == path
        }) else {
            return false;
        };
        *slot = slot.with_size(size);
        true
    }
}
