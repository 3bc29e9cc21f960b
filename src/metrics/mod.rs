//! In-process latency aggregation.
mod aggregator;
mod types;


pub use aggregator::{DEFAULT_SUMMARY_INTERVAL, setup_metrics_aggregator};
pub use types::{LatencySample, RunningStats};
