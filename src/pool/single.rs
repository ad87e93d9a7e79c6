use std::sync::Arc;
use std::thread::JoinHandle;

use crossbeam::channel::{self, Sender};
use log::{debug, error};

use super::Job;
use crate::thread_factory::ThreadNamer;
use crate::Result;

/// An executor with exactly one persistent worker.
///
/// Jobs are buffered in an unbounded FIFO queue, so submission never
/// blocks, and they execute strictly in submission order. A job that
/// panics is logged and skipped; the worker carries on with the next job,
/// so ordering of the survivors is preserved.
pub struct SingleThreadExecutor {
    tx: Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl SingleThreadExecutor {
    pub(crate) fn new(namer: Arc<ThreadNamer>) -> Result<Self> {
        let (tx, rx) = channel::unbounded::<Job>();

        let worker = namer.builder().spawn(move || {
            for job in rx {
                debug!("Single-thread executor running next job");
                if std::panic::catch_unwind(std::panic::AssertUnwindSafe(job)).is_err() {
                    error!("Job panicked, continuing with next job");
                }
            }
        })?;

        Ok(SingleThreadExecutor {
            tx: Some(tx),
            worker: Some(worker),
        })
    }

    /// Spawns a job onto the end of the queue.
    ///
    /// Never blocks; the job runs once every previously submitted job has
    /// finished.
    pub fn spawn<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.tx
            .as_ref()
            .expect("executor queue already closed")
            .send(Box::new(job))
            .expect("single-thread executor has no active worker");
    }

    /// Closes the queue and blocks until every buffered job has run.
    pub fn join(mut self) {
        drop(self.tx.take());
        if let Some(worker) = self.worker.take() {
            // A panicking job is already caught inside the worker loop, so
            // the worker itself only fails on an unrelated fatal error.
            let _ = worker.join();
        }
    }
}

impl Drop for SingleThreadExecutor {
    fn drop(&mut self) {
        // Dropping the sender closes the queue; the worker drains what is
        // left and exits on its own.
        drop(self.tx.take());
    }
}
