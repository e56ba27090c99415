//! Directory listing for filebeam.
//!
//! Provides the [Entry] value which every pane row is built from, and [list_dir] which
//! enumerates one directory into a sorted sequence of entries.
//!
//! Entries are immutable and created fresh on every listing. A directory size that arrives later
//! from a size job produces a new entry through [Entry::with_size] rather than mutating one in place.

use crate::core::error::FsError;
use crate::core::resolver::{DeviceId, device_of, resolve};
use crate::core::size::size_of_file;

use std::cmp::Ordering;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Display name of the synthetic parent entry.
pub const PARENT_ENTRY_NAME: &str = "..";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// The synthetic `..` row pointing at the parent of the listed directory.
    Parent,
}

/// One filesystem object as displayed in the current listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    path: PathBuf,
    real_path: PathBuf,
    name: OsString,
    lowercase_name: String,
    kind: EntryKind,
    size: u64,
    size_known: bool,
    device: DeviceId,
    modified: Option<SystemTime>,
    is_symlink: bool,
}

impl Entry {
    /// Builds the entry for `path`, resolving symlinks and reading the file size.
    ///
    /// Fails with [FsError::BrokenLink] for dangling symlinks; listings drop those.
    pub fn from_path(path: PathBuf) -> Result<Self, FsError> {
        let resolved = resolve(&path)?;
        let name = path
            .file_name()
            .map(OsStr::to_os_string)
            .unwrap_or_else(|| path.as_os_str().to_os_string());

        let (kind, size, size_known) = if resolved.is_directory {
            (EntryKind::Directory, 0, false)
        } else {
            (EntryKind::File, size_of_file(&resolved.real_path), true)
        };

        Ok(Self {
            lowercase_name: name.to_string_lossy().to_lowercase(),
            device: device_of(&resolved.real_path),
            path,
            real_path: resolved.real_path,
            name,
            kind,
            size,
            size_known,
            modified: resolved.modified,
            is_symlink: resolved.is_symlink,
        })
    }

    /// The `..` pseudo entry pointing at `parent`.
    pub fn parent(parent: &Path) -> Self {
        Self {
            path: parent.to_path_buf(),
            real_path: parent.to_path_buf(),
            name: OsString::from(PARENT_ENTRY_NAME),
            lowercase_name: PARENT_ENTRY_NAME.to_string(),
            kind: EntryKind::Parent,
            size: 0,
            size_known: true,
            device: device_of(parent),
            modified: fs::metadata(parent).and_then(|m| m.modified()).ok(),
            is_symlink: false,
        }
    }

    /// Returns a copy of this directory entry with its size resolved.
    pub fn with_size(&self, size: u64) -> Self {
        Self {
            size,
            size_known: true,
            ..self.clone()
        }
    }

    // Accessors

    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[inline]
    pub fn real_path(&self) -> &Path {
        &self.real_path
    }

    #[inline]
    pub fn name(&self) -> &OsStr {
        &self.name
    }

    #[inline]
    pub fn name_str(&self) -> std::borrow::Cow<'_, str> {
        self.name.to_string_lossy()
    }

    #[inline]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.size
    }

    #[inline]
    pub fn size_known(&self) -> bool {
        self.size_known
    }

    #[inline]
    pub fn device(&self) -> &DeviceId {
        &self.device
    }

    #[inline]
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    #[inline]
    pub fn is_symlink(&self) -> bool {
        self.is_symlink
    }

    /// True for directories and the parent pseudo entry: anything enter-directory accepts.
    #[inline]
    pub fn is_dir(&self) -> bool {
        matches!(self.kind, EntryKind::Directory | EntryKind::Parent)
    }

    #[inline]
    pub fn is_parent(&self) -> bool {
        self.kind == EntryKind::Parent
    }
}

fn is_hidden(name: &OsStr) -> bool {
    name.as_encoded_bytes().first() == Some(&b'.')
}

/// Case-insensitive name order, with the raw name as a tie breaker so the order is total.
fn compare_names(a: &Entry, b: &Entry) -> Ordering {
    a.lowercase_name
        .cmp(&b.lowercase_name)
        .then_with(|| a.name.cmp(&b.name))
}

/// Lists the immediate children of `path`.
///
/// - Names starting with `.` are skipped unless `show_hidden`.
/// - Broken symlinks are skipped silently.
/// - Real entries are sorted case-insensitively; a `..` entry is prepended unless `path` is the
///   filesystem root.
///
/// Fails with [FsError::AccessDenied] when the directory itself cannot be read.
pub fn list_dir(path: &Path, show_hidden: bool) -> Result<Vec<Entry>, FsError> {
    let read = fs::read_dir(path).map_err(|e| FsError::listing(path, e))?;
    let mut entries = Vec::with_capacity(64);

    for dirent in read {
        let Ok(dirent) = dirent else {
            continue;
        };

        if !show_hidden && is_hidden(&dirent.file_name()) {
            continue;
        }

        match Entry::from_path(dirent.path()) {
            Ok(entry) => entries.push(entry),
            Err(FsError::BrokenLink(p)) => {
                tracing::trace!(path = %p.display(), "skipping broken symlink");
            }
            Err(e) => {
                tracing::debug!(error = %e, "skipping unreadable entry");
            }
        }
    }

    entries.sort_by(compare_names);

    if let Some(parent) = path.parent() {
        entries.insert(0, Entry::parent(parent));
    }

    tracing::debug!(path = %path.display(), count = entries.len(), "listed directory");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rng;
    use rand::seq::SliceRandom;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn names(entries: &[Entry]) -> Vec<String> {
        entries.iter().map(|e| e.name_str().into_owned()).collect()
    }

    #[test]
    fn parent_entry_first_then_case_insensitive() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let mut files = vec!["banana", "Apple", "cherry", "apple2", "Zed", "mango"];
        files.shuffle(&mut rng());
        for name in &files {
            File::create(dir.path().join(name))?;
        }
        fs::create_dir(dir.path().join("Beta"))?;

        let entries = list_dir(dir.path(), false)?;
        assert_eq!(
            names(&entries),
            vec!["..", "Apple", "apple2", "banana", "Beta", "cherry", "mango", "Zed"]
        );
        assert_eq!(entries[0].kind(), EntryKind::Parent);
        assert_eq!(Some(entries[0].path()), dir.path().parent());
        Ok(())
    }

    #[test]
    fn hidden_files_follow_flag() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        File::create(dir.path().join(".x"))?;
        File::create(dir.path().join("y"))?;

        let hidden_off = list_dir(dir.path(), false)?;
        assert!(!hidden_off.iter().any(|e| e.name() == ".x"));

        let hidden_on = list_dir(dir.path(), true)?;
        assert!(hidden_on.iter().any(|e| e.name() == ".x"));
        Ok(())
    }

    #[test]
    fn root_has_no_parent_entry() -> Result<(), Box<dyn std::error::Error>> {
        let root = Path::new(std::path::MAIN_SEPARATOR_STR);
        if let Ok(entries) = list_dir(root, false) {
            assert!(!entries.iter().any(Entry::is_parent));
        }
        Ok(())
    }

    #[test]
    fn files_have_known_size_dirs_do_not() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let mut f = File::create(dir.path().join("data.bin"))?;
        f.write_all(&[0u8; 100])?;
        fs::create_dir(dir.path().join("sub"))?;

        let entries = list_dir(dir.path(), false)?;
        let file = entries
            .iter()
            .find(|e| e.name() == "data.bin")
            .ok_or("file missing")?;
        assert_eq!(file.kind(), EntryKind::File);
        assert!(file.size_known());
        assert_eq!(file.size(), 100);

        let sub = entries
            .iter()
            .find(|e| e.name() == "sub")
            .ok_or("dir missing")?;
        assert_eq!(sub.kind(), EntryKind::Directory);
        assert!(!sub.size_known());

        let sized = sub.with_size(42);
        assert!(sized.size_known());
        assert_eq!(sized.size(), 42);
        assert_eq!(sized.path(), sub.path());
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn broken_symlinks_are_invisible() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        File::create(dir.path().join("real.txt"))?;
        std::os::unix::fs::symlink(dir.path().join("gone"), dir.path().join("dangling"))?;
        std::os::unix::fs::symlink("real.txt", dir.path().join("alias"))?;

        let entries = list_dir(dir.path(), false)?;
        assert_eq!(names(&entries), vec!["..", "alias", "real.txt"]);
        let alias = &entries[1];
        assert!(alias.is_symlink());
        assert_eq!(alias.real_path(), dir.path().join("real.txt"));
        Ok(())
    }

    #[test]
    fn missing_directory_fails() {
        let p = Path::new("/path/does/not/exist");
        assert_eq!(list_dir(p, false), Err(FsError::NotFound(p.to_path_buf())));
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_is_access_denied() -> Result<(), Box<dyn std::error::Error>> {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir()?;
        let locked = dir.path().join("locked");
        fs::create_dir(&locked)?;
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000))?;

        // root ignores permission bits, nothing to assert there
        let readable_anyway = fs::read_dir(&locked).is_ok();
        let result = list_dir(&locked, false);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755))?;

        if !readable_anyway {
            assert_eq!(result, Err(FsError::AccessDenied(locked)));
        }
        Ok(())
    }

    #[test]
    fn listing_a_file_is_access_denied() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let file = dir.path().join("notes.txt");
        File::create(&file)?;
        assert_eq!(list_dir(&file, false), Err(FsError::AccessDenied(file)));
        Ok(())
    }
}
