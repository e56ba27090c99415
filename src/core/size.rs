//! Size computation for filebeam.
//!
//! File sizes are a single `stat` and never fail ([size_of_file] returns 0 on error).
//! Directory sizes are a recursive walk ([size_of_directory]) which runs on the size worker pool.
//!
//! [SizeJobs] lives on the control thread and tracks which directory size jobs are still wanted.
//! A job result is applied only while its `(path, job id)` pair is still registered, so results
//! for a listing that has since been replaced are dropped.

use crate::core::worker::Workers;

use walkdir::WalkDir;

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Size of a file in bytes; 0 if it cannot be read.
pub fn size_of_file(path: &Path) -> u64 {
    fs::metadata(path).map(|md| md.len()).unwrap_or(0)
}

/// Recursively sums the sizes of regular files below `path`.
///
/// Symlinks inside the walk are neither followed nor counted. Entries that fail to stat are
/// skipped. Returns `None` when `cancel` was raised before the walk finished.
pub fn size_of_directory(path: &Path, cancel: &AtomicBool) -> Option<u64> {
    let mut total = 0u64;

    let walker = WalkDir::new(path)
        .follow_links(false)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok);

    for entry in walker {
        if cancel.load(Ordering::Relaxed) {
            return None;
        }
        if !entry.file_type().is_file() {
            continue;
        }
        if let Ok(md) = entry.metadata() {
            total = total.saturating_add(md.len());
        }
    }

    if cancel.load(Ordering::Relaxed) {
        None
    } else {
        Some(total)
    }
}

#[derive(Debug)]
struct SizeJob {
    id: u64,
    cancel: Arc<AtomicBool>,
}

/// Registry of outstanding directory size jobs, keyed by directory path.
///
/// Owned and mutated only by the control thread.
#[derive(Debug, Default)]
pub struct SizeJobs {
    jobs: HashMap<PathBuf, SizeJob>,
    next_id: u64,
}

impl SizeJobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of jobs still outstanding.
    #[inline]
    pub fn outstanding(&self) -> usize {
        self.jobs.len()
    }

    #[inline]
    pub fn is_pending(&self, path: &Path) -> bool {
        self.jobs.contains_key(path)
    }

    /// Id of the job currently registered for `path`.
    #[inline]
    pub fn job_id(&self, path: &Path) -> Option<u64> {
        self.jobs.get(path).map(|job| job.id)
    }

    /// Registers a job for `path` and returns its id and cancel token.
    ///
    /// Returns `None` if a job for `path` is already outstanding; the existing job is joined.
    pub fn register(&mut self, path: &Path) -> Option<(u64, Arc<AtomicBool>)> {
        if self.jobs.contains_key(path) {
            return None;
        }
        self.next_id = self.next_id.wrapping_add(1);
        let cancel = Arc::new(AtomicBool::new(false));
        self.jobs.insert(
            path.to_path_buf(),
            SizeJob {
                id: self.next_id,
                cancel: Arc::clone(&cancel),
            },
        );
        Some((self.next_id, cancel))
    }

    /// Registers and submits a size job for `path` unless one is already running.
    ///
    /// Returns true if new work was queued.
    pub fn start(&mut self, path: &Path, workers: &Workers) -> bool {
        let Some((job_id, cancel)) = self.register(path) else {
            tracing::trace!(path = %path.display(), "joining outstanding size job");
            return false;
        };

        tracing::debug!(path = %path.display(), job_id, "starting size job");
        if !workers.submit_size(path.to_path_buf(), job_id, cancel) {
            self.jobs.remove(path);
            return false;
        }
        true
    }

    /// Cancels every job whose path is not in `keep`.
    pub fn retain_paths(&mut self, keep: &HashSet<&Path>) {
        self.jobs.retain(|path, job| {
            let wanted = keep.contains(path.as_path());
            if !wanted {
                job.cancel.store(true, Ordering::Relaxed);
                tracing::debug!(path = %path.display(), job_id = job.id, "size job superseded");
            }
            wanted
        });
    }

    /// Cancels every outstanding job.
    pub fn cancel_all(&mut self) {
        for job in self.jobs.values() {
            job.cancel.store(true, Ordering::Relaxed);
        }
        self.jobs.clear();
    }

    /// Consumes a job completion.
    ///
    /// Returns true if `(path, job_id)` is the registered job, which is then removed. A false
    /// return means the job was superseded and its result must be discarded.
    pub fn complete(&mut self, path: &Path, job_id: u64) -> bool {
        match self.jobs.get(path) {
            Some(job) if job.id == job_id => {
                self.jobs.remove(path);
                true
            }
            _ => false,
        }
    }
}
