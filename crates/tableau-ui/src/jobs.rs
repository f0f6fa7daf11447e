//! Background work with results delivered on the frame thread.
//!
//! A job's closure runs on its own OS thread. Its outcome is parked in a
//! shared slot; the update phase notices finished threads and runs the
//! completion callback with full access to the engine.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::thread::JoinHandle;

use parking_lot::Mutex;
use thiserror::Error;

use crate::Engine;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("job failed: {0:#}")]
    Failed(anyhow::Error),
    #[error("job panicked: {0}")]
    Panicked(String),
    #[error("job thread could not be spawned: {0}")]
    Spawn(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct JobId(u64);

type Finish = Box<dyn FnOnce(&mut Engine)>;

struct Job {
    id: JobId,
    name: String,
    /// `None` once there is nothing left to wait for.
    handle: Option<JoinHandle<()>>,
    finish: Finish,
}

impl Job {
    fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }
}

#[derive(Default)]
pub(crate) struct Jobs {
    next: u64,
    running: Vec<Job>,
}

impl Drop for Jobs {
    fn drop(&mut self) {
        for job in self.running.iter().filter(|j| !j.is_finished()) {
            log::warn!("job `{}` still running at shutdown; detaching", job.name);
        }
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "non-string panic payload".to_string())
}

impl Engine {
    /// Runs `work` on a background thread and hands its outcome to `on_done`
    /// on the frame thread, during the first update after it finishes.
    pub fn start_job<T, W, D>(&mut self, name: &str, work: W, on_done: D) -> JobId
    where
        T: Send + 'static,
        W: FnOnce() -> anyhow::Result<T> + Send + 'static,
        D: FnOnce(&mut Engine, Result<T, JobError>) + 'static,
    {
        let id = JobId(self.jobs.next);
        self.jobs.next += 1;

        let slot: Arc<Mutex<Option<Result<T, JobError>>>> = Arc::new(Mutex::new(None));
        let worker_slot = Arc::clone(&slot);
        let spawned = std::thread::Builder::new()
            .name(format!("job-{name}"))
            .spawn(move || {
                let outcome = match catch_unwind(AssertUnwindSafe(work)) {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(e)) => Err(JobError::Failed(e)),
                    Err(payload) => Err(JobError::Panicked(panic_message(payload))),
                };
                *worker_slot.lock() = Some(outcome);
            });

        let handle = match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                *slot.lock() = Some(Err(JobError::Spawn(e.to_string())));
                None
            }
        };

        let job_name = name.to_string();
        let finish: Finish = Box::new(move |ui: &mut Engine| {
            let outcome = slot
                .lock()
                .take()
                .unwrap_or_else(|| Err(JobError::Panicked("job produced no result".into())));
            if let Err(e) = &outcome {
                log::warn!("job `{job_name}`: {e}");
            }
            on_done(ui, outcome);
        });

        log::debug!("job `{name}` started");
        self.jobs.running.push(Job {
            id,
            name: name.to_string(),
            handle,
            finish,
        });
        id
    }

    /// Fire-and-forget variant of [`Engine::start_job`]; failures are logged.
    pub fn spawn_job<W>(&mut self, name: &str, work: W) -> JobId
    where
        W: FnOnce() -> anyhow::Result<()> + Send + 'static,
    {
        self.start_job(name, work, |_, _| {})
    }

    pub fn pending_jobs(&self) -> usize {
        self.jobs.running.len()
    }

    pub fn is_job_pending(&self, id: JobId) -> bool {
        self.jobs.running.iter().any(|j| j.id == id)
    }

    /// Delivers the outcomes of every job that finished since the last poll.
    pub(crate) fn poll_jobs(&mut self) {
        if self.jobs.running.is_empty() {
            return;
        }
        let (done, running): (Vec<Job>, Vec<Job>) = std::mem::take(&mut self.jobs.running)
            .into_iter()
            .partition(Job::is_finished);
        self.jobs.running = running;

        for job in done {
            if let Some(handle) = job.handle {
                // The worker catches its own panics.
                let _ = handle.join();
            }
            log::debug!("job `{}` finished", job.name);
            (job.finish)(self);
        }
    }
}
