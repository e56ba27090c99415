//! Path resolution, device identity and device capacity for filebeam.
//!
//! - [resolve] follows one level of symlink and reports whether the target is a directory.
//! - [device_of] finds the mount point a path lives on.
//! - [capacity_of] looks up the total byte capacity of a device.
//!
//! Both the mount point lookup and the capacity lookup are backed by process-wide caches that
//! are populated lazily and never invalidated. They are safe to read and populate from any thread.

use crate::core::error::FsError;

use once_cell::sync::Lazy;
use sysinfo::Disks;

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::SystemTime;

/// Identity of the filesystem an entry resides on: the path of its mount point.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeviceId(PathBuf);

impl DeviceId {
    pub fn new(mount_point: impl Into<PathBuf>) -> Self {
        DeviceId(mount_point.into())
    }

    #[inline]
    pub fn mount_point(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Outcome of [resolve].
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPath {
    pub real_path: PathBuf,
    pub is_directory: bool,
    pub is_symlink: bool,
    pub modified: Option<SystemTime>,
}

/// Resolves `path`, following one level of symlink.
///
/// A symlink whose target does not exist fails with [FsError::BrokenLink]. Relative link targets
/// are joined onto the link's own directory.
pub fn resolve(path: &Path) -> Result<ResolvedPath, FsError> {
    let link_md = fs::symlink_metadata(path).map_err(|e| FsError::from_io(path, e))?;

    if !link_md.file_type().is_symlink() {
        return Ok(ResolvedPath {
            real_path: path.to_path_buf(),
            is_directory: link_md.is_dir(),
            is_symlink: false,
            modified: link_md.modified().ok(),
        });
    }

    let target = fs::read_link(path).map_err(|e| FsError::from_io(path, e))?;
    let real_path = if target.is_absolute() {
        target
    } else {
        path.parent()
            .unwrap_or_else(|| Path::new(""))
            .join(target)
    };

    let target_md = fs::metadata(path).map_err(|_| FsError::BrokenLink(path.to_path_buf()))?;

    Ok(ResolvedPath {
        real_path,
        is_directory: target_md.is_dir(),
        is_symlink: true,
        modified: target_md.modified().ok(),
    })
}

/// Mount points already discovered, keyed by the raw device number.
#[cfg(unix)]
static MOUNT_POINTS: Lazy<RwLock<HashMap<u64, DeviceId>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Returns the device (mount point) `path` resides on.
///
/// Walks up the parent directories until the device number changes; the last directory on the
/// same device is the mount boundary. Falls back to the filesystem root when `path` cannot be
/// inspected.
pub fn device_of(path: &Path) -> DeviceId {
    let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;

        let Ok(md) = fs::metadata(&path) else {
            return root_of(&path);
        };
        let dev = md.dev();

        if let Some(hit) = MOUNT_POINTS.read().ok().and_then(|m| m.get(&dev).cloned()) {
            return hit;
        }

        let mut boundary = path.clone();
        for ancestor in path.ancestors().skip(1) {
            match fs::metadata(ancestor) {
                Ok(parent_md) if parent_md.dev() == dev => boundary = ancestor.to_path_buf(),
                _ => break,
            }
        }

        let device = DeviceId(boundary);
        if let Ok(mut mounts) = MOUNT_POINTS.write() {
            return mounts.entry(dev).or_insert(device).clone();
        }
        device
    }

    #[cfg(not(unix))]
    {
        root_of(&path)
    }
}

fn root_of(path: &Path) -> DeviceId {
    DeviceId(
        path.ancestors()
            .last()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(std::path::MAIN_SEPARATOR_STR)),
    )
}

/// Append-only map from device to total capacity in bytes.
///
/// Each device is queried at most once per cache; concurrent populations of the same key keep
/// whichever value landed first.
pub(crate) struct CapacityCache {
    map: RwLock<HashMap<DeviceId, u64>>,
}

impl CapacityCache {
    pub(crate) fn new() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
        }
    }

    pub(crate) fn get_or_query<F>(&self, device: &DeviceId, query: F) -> u64
    where
        F: FnOnce(&DeviceId) -> u64,
    {
        if let Some(cap) = self.map.read().ok().and_then(|m| m.get(device).copied()) {
            return cap;
        }

        let mut map = match self.map.write() {
            Ok(map) => map,
            Err(poisoned) => poisoned.into_inner(),
        };
        *map.entry(device.clone()).or_insert_with(|| query(device))
    }
}

static DEVICE_CAPACITY: Lazy<CapacityCache> = Lazy::new(CapacityCache::new);

/// Total capacity of `device` in bytes, or 0 if no disk matches it.
pub fn capacity_of(device: &DeviceId) -> u64 {
    DEVICE_CAPACITY.get_or_query(device, query_capacity)
}

/// Picks the disk whose mount point is the longest prefix of the device path.
fn query_capacity(device: &DeviceId) -> u64 {
    let disks = Disks::new_with_refreshed_list();
    let capacity = disks
        .list()
        .iter()
        .filter(|disk| device.mount_point().starts_with(disk.mount_point()))
        .max_by_key(|disk| disk.mount_point().as_os_str().len())
        .map(|disk| disk.total_space())
        .unwrap_or(0);

    tracing::debug!(device = %device, capacity, "queried device capacity");
    capacity
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs::File;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use tempfile::tempdir;

    #[test]
    fn resolve_plain_file_and_dir() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let file = dir.path().join("plain.txt");
        File::create(&file)?;

        let res = resolve(&file)?;
        assert_eq!(res.real_path, file);
        assert!(!res.is_directory);
        assert!(!res.is_symlink);

        let res = resolve(dir.path())?;
        assert!(res.is_directory);
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn resolve_follows_symlink_and_flags_broken_ones() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let target = dir.path().join("target_dir");
        fs::create_dir(&target)?;

        let link = dir.path().join("link");
        std::os::unix::fs::symlink("target_dir", &link)?;
        let res = resolve(&link)?;
        assert!(res.is_directory);
        assert!(res.is_symlink);
        assert_eq!(res.real_path, dir.path().join("target_dir"));

        let broken = dir.path().join("broken");
        std::os::unix::fs::symlink(dir.path().join("nowhere"), &broken)?;
        assert_eq!(resolve(&broken), Err(FsError::BrokenLink(broken.clone())));
        Ok(())
    }

    #[test]
    fn resolve_missing_path_is_not_found() {
        let p = Path::new("/path/does/not/exist/at/all");
        assert_eq!(resolve(p), Err(FsError::NotFound(p.to_path_buf())));
    }

    #[test]
    fn device_of_is_deterministic_and_contains_path() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let sub = dir.path().join("a").join("b");
        fs::create_dir_all(&sub)?;

        let d1 = device_of(&sub);
        let d2 = device_of(&sub);
        assert_eq!(d1, d2);

        let canonical = fs::canonicalize(&sub)?;
        assert!(canonical.starts_with(d1.mount_point()));
        Ok(())
    }

    #[test]
    fn device_of_missing_path_falls_back_to_root() {
        let dev = device_of(Path::new("/no/such/place"));
        assert_eq!(dev.mount_point(), Path::new("/"));
    }

    #[test]
    fn capacity_cache_queries_once_per_device() {
        let cache = CapacityCache::new();
        let calls = AtomicUsize::new(0);
        let dev = DeviceId::new("/mnt/data");

        for _ in 0..5 {
            let cap = cache.get_or_query(&dev, |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                4096
            });
            assert_eq!(cap, 4096);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let other = DeviceId::new("/mnt/other");
        cache.get_or_query(&other, |_| {
            calls.fetch_add(1, Ordering::SeqCst);
            1
        });
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn capacity_cache_converges_under_concurrent_population() {
        let cache = Arc::new(CapacityCache::new());
        let dev = DeviceId::new("/mnt/shared");

        let handles: Vec<_> = (0..8u64)
            .map(|i| {
                let cache = Arc::clone(&cache);
                let dev = dev.clone();
                thread::spawn(move || cache.get_or_query(&dev, |_| 1000 + i))
            })
            .collect();

        let results: Vec<u64> = handles.into_iter().filter_map(|h| h.join().ok()).collect();
        assert_eq!(results.len(), 8);
        assert!(results.windows(2).all(|w| w[0] == w[1]));
    }
}
