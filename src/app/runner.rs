use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::mpsc;
use tracing::info;

use crate::config::LoaderConfig;
use crate::error::{AppError, AppResult};
use crate::http::build_target_client;
use crate::metrics::{LatencySample, RunningStats, setup_metrics_aggregator};
use crate::payload::PayloadGenerator;
use crate::shutdown::{ShutdownReceiver, ShutdownSender};
use crate::sinks::{MetricsSink, build_sink};

use super::dispatcher::setup_dispatcher;
use super::queue::job_queue;
use super::worker::Worker;

/// Outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunReport {
    /// Tokens the dispatcher enqueued.
    pub dispatched: u64,
    /// Cycles the workers finished, failed ones included.
    pub completed: u64,
    pub stats: RunningStats,
}

/// Lifecycle controller.
pub struct LoadRunner {
    config: LoaderConfig,
    client: Client,
    sink: Arc<dyn MetricsSink>,
}

impl LoadRunner {
    /// Builds the runner with the sink selected by `config.sink`.
    ///
    /// # Errors
    ///
    /// Returns an error when the sink or the target HTTP client cannot be
    /// built.
    pub fn new(config: LoaderConfig) -> AppResult<Self> {
        let sink = build_sink(&config.sink).map_err(AppError::sink)?;
        Self::with_sink(config, sink)
    }

    /// Builds the runner around an already constructed sink.
    ///
    /// # Errors
    ///
    /// Returns an error when the target HTTP client cannot be built.
    pub fn with_sink(config: LoaderConfig, sink: Arc<dyn MetricsSink>) -> AppResult<Self> {
        let client = build_target_client(config.request_timeout).map_err(AppError::http)?;
        Ok(Self {
            config,
            client,
            sink,
        })
    }

    /// Runs until `shutdown_tx` fires (or the configured duration elapses),
    /// then stops in order: dispatcher, job queue, workers, metrics channel,
    /// aggregator.
    ///
    /// # Errors
    ///
    /// Returns an error when one of the spawned tasks panics.
    pub async fn run(self, shutdown_tx: &ShutdownSender) -> AppResult<RunReport> {
        let mut shutdown_rx = shutdown_tx.subscribe();
        let worker_count = self.config.workers;
        let (jobs_tx, jobs_rx) = job_queue(worker_count);
        let (metrics_tx, metrics_rx) = mpsc::channel::<LatencySample>(worker_count.get());
        let target = Arc::new(self.config.target.clone());

        let mut worker_handles = Vec::with_capacity(worker_count.get());
        for id in 0..worker_count.get() {
            let worker = Worker::new(
                id,
                self.client.clone(),
                Arc::clone(&target),
                Arc::clone(&self.sink),
                metrics_tx.clone(),
                PayloadGenerator::for_worker(self.config.payload, self.config.seed, id),
            );
            let worker_shutdown_rx = shutdown_tx.subscribe();
            worker_handles.push(tokio::spawn(worker.run(worker_shutdown_rx, jobs_rx.clone())));
        }
        drop(jobs_rx);

        let aggregator_handle =
            setup_metrics_aggregator(self.config.summary_interval, shutdown_tx, metrics_rx);
        let dispatcher_handle = setup_dispatcher(shutdown_tx, jobs_tx);

        info!(
            "Started {} workers against {} (sink: {} at {})",
            worker_count.get(),
            target.add_widget_url(),
            self.config.sink.kind,
            self.config.sink.address
        );

        wait_for_shutdown(&mut shutdown_rx, shutdown_tx, self.config.duration).await;

        let dispatched = dispatcher_handle.await?;
        let mut completed: u64 = 0;
        for handle in worker_handles {
            completed = completed.saturating_add(handle.await?);
        }
        drop(metrics_tx);
        let stats = aggregator_handle.await?;

        Ok(RunReport {
            dispatched,
            completed,
            stats,
        })
    }
}

async fn wait_for_shutdown(
    shutdown_rx: &mut ShutdownReceiver,
    shutdown_tx: &ShutdownSender,
    duration: Option<Duration>,
) {
    match duration {
        Some(duration) => {
            tokio::select! {
                _ = shutdown_rx.recv() => {}
                () = tokio::time::sleep(duration) => {
                    info!("Run duration of {:?} elapsed, shutting down...", duration);
                    drop(shutdown_tx.send(()));
                }
            }
        }
        None => drop(shutdown_rx.recv().await),
    }
}
