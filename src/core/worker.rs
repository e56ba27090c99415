//! Worker threads for the filebeam core.
//!
//! Recursive directory sizes and file operations run here, off the control thread.
//! Requests [WorkerTask] come in from the AppState via channels, and results [WorkerResponse] go
//! back through a single response channel which the control thread drains in `AppState::tick`.
//! Workers never touch navigation state directly.
//!
//! # Caution:
//! This module is the protocol boundary between the control thread and the workers. Adding or
//! changing variants requires matching changes in the response handling of the app state.

use crate::core::ops::{self, OpReport};
use crate::core::size::size_of_directory;

use crossbeam_channel::{Receiver, Sender, unbounded};

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

/// Owns the channels of the size worker pool and the file operation worker.
///
/// The size pool threads share one task queue, so any idle thread picks up the next directory.
/// File operations go to a single thread and are therefore executed one at a time, in order.
pub struct Workers {
    size_tx: Sender<WorkerTask>,
    fileop_tx: Sender<WorkerTask>,
    response_rx: Receiver<WorkerResponse>,
}

impl Workers {
    /// Spawns `size_threads` size workers and one file operation worker.
    pub fn spawn(size_threads: usize) -> Self {
        let (size_tx, size_rx) = unbounded::<WorkerTask>();
        let (fileop_tx, fileop_rx) = unbounded::<WorkerTask>();
        let (res_tx, response_rx) = unbounded::<WorkerResponse>();

        for _ in 0..size_threads.max(1) {
            start_size_worker(size_rx.clone(), res_tx.clone());
        }
        start_fileop_worker(fileop_rx, res_tx);

        Self {
            size_tx,
            fileop_tx,
            response_rx,
        }
    }

    /// Accessor for the worker response receiver.
    pub fn response_rx(&self) -> &Receiver<WorkerResponse> {
        &self.response_rx
    }

    /// Queues a directory size job.
    pub fn submit_size(&self, path: PathBuf, job_id: u64, cancel: Arc<AtomicBool>) -> bool {
        self.submit(
            &self.size_tx,
            WorkerTask::ComputeSize {
                path,
                job_id,
                cancel,
            },
        )
    }

    /// Queues a file operation.
    pub fn submit_op(&self, op: FileOperation) -> bool {
        self.submit(&self.fileop_tx, WorkerTask::FileOp(op))
    }

    /// Returns false once the receiving worker is gone.
    fn submit(&self, tx: &Sender<WorkerTask>, task: WorkerTask) -> bool {
        tx.send(task).is_ok()
    }
}

/// Tasks sent to the workers.
pub enum WorkerTask {
    ComputeSize {
        path: PathBuf,
        job_id: u64,
        cancel: Arc<AtomicBool>,
    },
    FileOp(FileOperation),
}

/// File system operations the file operation worker can perform.
#[derive(Debug, Clone, PartialEq)]
pub enum FileOperation {
    Delete {
        targets: Vec<PathBuf>,
        use_trash: bool,
    },
    Move {
        targets: Vec<PathBuf>,
        destination: PathBuf,
    },
    Copy {
        targets: Vec<PathBuf>,
        destination: PathBuf,
    },
    Rename {
        target: PathBuf,
        new_name: String,
    },
}

impl FileOperation {
    fn run(self) -> OpReport {
        match self {
            FileOperation::Delete { targets, use_trash } => ops::delete(&targets, use_trash),
            FileOperation::Move {
                targets,
                destination,
            } => ops::move_targets(&targets, &destination),
            FileOperation::Copy {
                targets,
                destination,
            } => ops::copy_targets(&targets, &destination),
            FileOperation::Rename { target, new_name } => ops::rename_report(&target, &new_name),
        }
    }
}

/// Responses sent from the workers back to the control thread.
#[derive(Debug)]
pub enum WorkerResponse {
    SizeComputed {
        path: PathBuf,
        job_id: u64,
        size: u64,
    },
    OperationComplete(OpReport),
}

/// Starts a size worker thread.
///
/// Cancelled walks send nothing back.
fn start_size_worker(
    task_rx: Receiver<WorkerTask>,
    res_tx: Sender<WorkerResponse>,
) {
    thread::spawn(move || {
        while let Ok(task) = task_rx.recv() {
            let WorkerTask::ComputeSize {
                path,
                job_id,
                cancel,
            } = task
            else {
                continue;
            };

            let result = if cancel.load(Ordering::Relaxed) {
                None
            } else {
                size_of_directory(&path, &cancel)
            };
            match result {
                Some(size) => {
                    let _ = res_tx.send(WorkerResponse::SizeComputed { path, job_id, size });
                }
                None => {
                    tracing::trace!(path = %path.display(), job_id, "size job cancelled");
                }
            }
        }
    });
}

/// Starts the file operation worker thread.
fn start_fileop_worker(
    task_rx: Receiver<WorkerTask>,
    res_tx: Sender<WorkerResponse>,
) {
    thread::spawn(move || {
        while let Ok(task) = task_rx.recv() {
            let WorkerTask::FileOp(op) = task else {
                continue;
            };
            let report = op.run();
            tracing::info!(op = %report.kind(), summary = %report.summary(), "operation finished");
            let _ = res_tx.send(WorkerResponse::OperationComplete(report));
        }
    });
}

/// Worker threads integration tests.
#[cfg(test)]
mod tests {
    use super::*;

    use crate::core::FsError;

    use std::fs::{self, File};
    use std::io::Write;
    use std::time::Duration;
    use tempfile::tempdir;

    #[test]
    fn size_worker_reports_total() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let sub = dir.path().join("b");
        fs::create_dir(&sub)?;
        File::create(sub.join("g1"))?.write_all(&[0u8; 10])?;

        let workers = Workers::spawn(2);
        assert!(workers.submit_size(sub.clone(), 7, Arc::new(AtomicBool::new(false))));

        match workers.response_rx().recv_timeout(Duration::from_secs(5))? {
            WorkerResponse::SizeComputed { path, job_id, size } => {
                assert_eq!(path, sub);
                assert_eq!(job_id, 7);
                assert_eq!(size, 10);
            }
            other => return Err(format!("Unexpected response: {:?}", other).into()),
        }
        Ok(())
    }

    #[test]
    fn cancelled_size_job_sends_nothing() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let workers = Workers::spawn(1);
        assert!(workers.submit_size(
            dir.path().to_path_buf(),
            1,
            Arc::new(AtomicBool::new(true))
        ));

        let res = workers
            .response_rx()
            .recv_timeout(Duration::from_millis(300));
        assert!(res.is_err(), "cancelled job produced a response");
        Ok(())
    }

    #[test]
    fn many_size_jobs_all_answer() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let count = 20;
        for i in 0..count {
            let d = dir.path().join(format!("d{i}"));
            fs::create_dir(&d)?;
            File::create(d.join("f"))?.write_all(&vec![1u8; i])?;
        }

        let workers = Workers::spawn(4);
        for i in 0..count {
            let path = dir.path().join(format!("d{i}"));
            assert!(workers.submit_size(path, i as u64, Arc::new(AtomicBool::new(false))));
        }

        let mut seen = 0;
        for _ in 0..count {
            match workers.response_rx().recv_timeout(Duration::from_secs(5))? {
                WorkerResponse::SizeComputed { job_id, size, .. } => {
                    assert_eq!(size, job_id);
                    seen += 1;
                }
                other => return Err(format!("Unexpected response: {:?}", other).into()),
            }
        }
        assert_eq!(seen, count);
        Ok(())
    }

    #[test]
    fn fileop_worker_runs_operations_in_order() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempdir()?;
        let file = dir.path().join("x.txt");
        File::create(&file)?;

        let workers = Workers::spawn(1);
        assert!(workers.submit_op(FileOperation::Rename {
            target: file.clone(),
            new_name: "y.txt".into(),
        }));
        assert!(workers.submit_op(FileOperation::Delete {
            targets: vec![dir.path().join("y.txt"), file.clone()],
            use_trash: false,
        }));

        let first = workers.response_rx().recv_timeout(Duration::from_secs(5))?;
        let WorkerResponse::OperationComplete(report) = first else {
            return Err("expected rename completion".into());
        };
        assert_eq!(report.outcome(), Ok(1));

        let second = workers.response_rx().recv_timeout(Duration::from_secs(5))?;
        let WorkerResponse::OperationComplete(report) = second else {
            return Err("expected delete completion".into());
        };
        assert_eq!(report.succeeded(), &[dir.path().join("y.txt")]);
        assert_eq!(report.failed()[0].1, FsError::NotFound(file));
        assert!(!dir.path().join("y.txt").exists());
        Ok(())
    }
}
