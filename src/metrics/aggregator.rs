use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::shutdown::ShutdownSender;

use super::{LatencySample, RunningStats};

pub const DEFAULT_SUMMARY_INTERVAL: Duration = Duration::from_secs(1);

/// Spawns the aggregator. It logs a cumulative summary every
/// `summary_interval` once at least one sample arrived, and returns its stats
/// after the metrics channel is closed and drained.
///
/// Shutdown stops the periodic summaries but not the draining: samples from
/// cycles still in flight are counted until the last sender is dropped.
#[must_use]
pub fn setup_metrics_aggregator(
    summary_interval: Duration,
    shutdown_tx: &ShutdownSender,
    mut metrics_rx: mpsc::Receiver<LatencySample>,
) -> JoinHandle<RunningStats> {
    let mut shutdown_rx = shutdown_tx.subscribe();

    tokio::spawn(async move {
        let mut stats = RunningStats::default();
        let mut summary_ticker = tokio::time::interval(summary_interval);
        summary_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately.
        summary_ticker.tick().await;

        let mut channel_open = true;
        while channel_open {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    debug!("Aggregator draining remaining samples.");
                    break;
                }
                maybe_sample = metrics_rx.recv() => match maybe_sample {
                    Some(sample) => stats.record(sample.duration_secs),
                    None => channel_open = false,
                },
                _ = summary_ticker.tick() => log_summary(&stats),
            }
        }

        while let Some(sample) = metrics_rx.recv().await {
            stats.record(sample.duration_secs);
        }

        log_summary(&stats);
        stats
    })
}

fn log_summary(stats: &RunningStats) {
    if let Some(average) = stats.average_secs() {
        info!(
            "Metrics: Total requests: {}, Average duration: {:.3}s",
            stats.total_requests(),
            average
        );
    }
}
