use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::args::PositiveUsize;

/// One request cycle to run. Carries no data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobToken;

pub type JobSender = mpsc::Sender<JobToken>;

/// Receiving half shared by every worker. The async mutex hands each token to
/// exactly one worker.
#[derive(Debug, Clone)]
pub struct JobReceiver {
    inner: Arc<Mutex<mpsc::Receiver<JobToken>>>,
}

impl JobReceiver {
    /// Waits for the next token; `None` once the queue is closed and empty.
    /// Cancel safe.
    pub async fn recv(&self) -> Option<JobToken> {
        self.inner.lock().await.recv().await
    }
}

/// Creates the job queue. Capacity equals the worker count.
#[must_use]
pub fn job_queue(capacity: PositiveUsize) -> (JobSender, JobReceiver) {
    let (tx, rx) = mpsc::channel::<JobToken>(capacity.get());
    (
        tx,
        JobReceiver {
            inner: Arc::new(Mutex::new(rx)),
        },
    )
}
