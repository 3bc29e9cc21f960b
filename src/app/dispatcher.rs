use tokio::sync::broadcast::error::TryRecvError;
use tokio::sync::mpsc::error::TrySendError;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::shutdown::ShutdownSender;

use super::queue::{JobSender, JobToken};

/// Spawns the dispatcher, which keeps the job queue full until shutdown or
/// until every receiver is gone. Returns the number of tokens enqueued.
///
/// Each round tries a non-blocking enqueue first. When the queue is full it
/// waits for either a free slot or shutdown, so a full queue never delays
/// shutdown. Dropping `jobs_tx` on return closes the queue.
#[must_use]
pub fn setup_dispatcher(shutdown_tx: &ShutdownSender, jobs_tx: JobSender) -> JoinHandle<u64> {
    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::spawn(async move {
        let mut dispatched: u64 = 0;
        loop {
            match shutdown_rx.try_recv() {
                Err(TryRecvError::Empty) => {}
                Ok(()) | Err(TryRecvError::Closed | TryRecvError::Lagged(_)) => break,
            }

            match jobs_tx.try_send(JobToken) {
                Ok(()) => {
                    dispatched = dispatched.saturating_add(1);
                    tokio::task::yield_now().await;
                    continue;
                }
                Err(TrySendError::Closed(_)) => break,
                Err(TrySendError::Full(_)) => {}
            }

            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                permit = jobs_tx.reserve() => match permit {
                    Ok(permit) => {
                        permit.send(JobToken);
                        dispatched = dispatched.saturating_add(1);
                    }
                    Err(_) => break,
                },
            }
        }
        debug!("Dispatcher stopped after enqueuing {} jobs.", dispatched);
        dispatched
    })
}
