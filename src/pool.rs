//! Fixed-size worker pool with awaitable task handles.
//!
//! Workers pull tasks in submission order but may finish out of order. The
//! pool knows nothing about what a task touches; callers keep tasks from
//! sharing destination memory by giving each task sole ownership of its
//! input and collecting its output through the handle.

use crate::error::{EzcError, EzcResult};
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;

pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

pub struct TaskPool {
    pool: ThreadPool,
    threads: usize,
}

impl TaskPool {
    pub fn new(threads: usize) -> EzcResult<Self> {
        let threads = threads.max(1);
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("ezc-worker-{}", i))
            .build()?;
        Ok(Self { pool, threads })
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Queue `task` and return a handle to its result.
    ///
    /// A panic inside the task is caught and surfaces as
    /// [`EzcError::TaskFailed`] from [`TaskHandle::wait`]; other tasks keep
    /// running.
    pub fn submit<T, F>(&self, task: F) -> TaskHandle<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = mpsc::sync_channel(1);
        self.pool.spawn_fifo(move || {
            let outcome = panic::catch_unwind(AssertUnwindSafe(task));
            // The submitter may have dropped the handle; nothing to report then.
            let _ = tx.send(outcome);
        });
        TaskHandle { rx }
    }

    /// Wait for every handle, in submission order.
    ///
    /// All handles are drained even after a failure so no task of the batch
    /// is still running when this returns. The first failure is reported.
    pub fn join_all<T>(handles: Vec<TaskHandle<T>>) -> EzcResult<Vec<T>> {
        let mut results = Vec::with_capacity(handles.len());
        let mut first_error = None;

        for handle in handles {
            match handle.wait() {
                Ok(value) => results.push(value),
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(results),
        }
    }
}

impl std::fmt::Debug for TaskPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskPool")
            .field("threads", &self.threads)
            .finish()
    }
}

#[must_use = "a task's result or failure is only observable through its handle"]
pub struct TaskHandle<T> {
    rx: mpsc::Receiver<std::thread::Result<T>>,
}

impl<T> TaskHandle<T> {
    /// Block until the task has run.
    pub fn wait(self) -> EzcResult<T> {
        match self.rx.recv() {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(payload)) => Err(EzcError::TaskFailed(panic_message(payload.as_ref()))),
            Err(_) => Err(EzcError::TaskFailed(
                "worker dropped the task before it completed".into(),
            )),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".to_string()
    }
}
