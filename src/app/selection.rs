//! Multi-item selection for batch operations.
//!
//! The selection is a set of absolute paths kept across navigation: paths in other directories
//! stay selected while they are not visible. Batch operations consume it through
//! [SelectionSet::active_targets] and clear it once dispatched.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SelectionSet {
    paths: BTreeSet<PathBuf>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips membership of `path`. Returns true if it is selected afterwards.
    pub fn toggle(&mut self, path: &Path) -> bool {
        if self.paths.remove(path) {
            false
        } else {
            self.paths.insert(path.to_path_buf());
            true
        }
    }

    #[inline]
    pub fn contains(&self, path: &Path) -> bool {
        self.paths.contains(path)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }

    /// What a batch operation acts on: the whole selection if it is non-empty, otherwise the
    /// focused path alone. Empty only when nothing is selected and nothing is focused.
    pub fn active_targets(&self, focused: Option<&Path>) -> Vec<PathBuf> {
        if self.paths.is_empty() {
            focused.map(Path::to_path_buf).into_iter().collect()
        } else {
            self.paths.iter().cloned().collect()
        }
    }
}
