use std::sync::Arc;
use std::time::Instant;

use reqwest::Client;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use crate::error::HttpError;
use crate::http::{EndpointTarget, send_add_widget};
use crate::metrics::LatencySample;
use crate::payload::PayloadGenerator;
use crate::shutdown::ShutdownReceiver;
use crate::sinks::MetricsSink;

use super::queue::JobReceiver;

/// One member of the pool. Runs request cycles strictly one at a time.
pub struct Worker {
    id: usize,
    client: Client,
    target: Arc<EndpointTarget>,
    sink: Arc<dyn MetricsSink>,
    metrics_tx: mpsc::Sender<LatencySample>,
    payload: PayloadGenerator,
}

impl Worker {
    #[must_use]
    pub fn new(
        id: usize,
        client: Client,
        target: Arc<EndpointTarget>,
        sink: Arc<dyn MetricsSink>,
        metrics_tx: mpsc::Sender<LatencySample>,
        payload: PayloadGenerator,
    ) -> Self {
        Self {
            id,
            client,
            target,
            sink,
            metrics_tx,
            payload,
        }
    }

    /// Pulls jobs until shutdown or until the queue is closed, and returns how
    /// many cycles ran. Shutdown is only observed between cycles.
    pub async fn run(mut self, mut shutdown_rx: ShutdownReceiver, jobs: JobReceiver) -> u64 {
        let mut completed: u64 = 0;
        loop {
            let job = tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                job = jobs.recv() => job,
            };
            if job.is_none() {
                break;
            }

            match self.run_cycle().await {
                Ok(sample) => {
                    if self.metrics_tx.send(sample).await.is_err() {
                        debug!("Worker {}: metrics channel closed.", self.id);
                    }
                }
                Err(err) => error!("Worker {}: request failed: {}", self.id, err),
            }
            completed = completed.saturating_add(1);
        }
        debug!("Worker {} exiting after {} cycles.", self.id, completed);
        completed
    }

    /// Runs one request cycle: generate, post, time, report to the sink.
    ///
    /// A sink failure is logged and the sample is still returned.
    ///
    /// # Errors
    ///
    /// Returns an error when the request cannot be encoded or sent, in which
    /// case nothing is reported.
    pub async fn run_cycle(&mut self) -> Result<LatencySample, HttpError> {
        let started = Instant::now();
        let request = self.payload.generate();
        let status = send_add_widget(&self.client, &self.target, &request).await?;
        let sample = LatencySample::new(started.elapsed());
        debug!(
            "Worker {}: add_widget {} returned {} in {:.3}s",
            self.id, request.widget_sn, status, sample.duration_secs
        );

        if let Err(err) = self.sink.report(sample.duration_secs).await {
            warn!("Worker {}: failed to report latency: {}", self.id, err);
        }
        Ok(sample)
    }
}
