//! Latency delivery to external time-series stores.
//!
//! A [`MetricsSink`] receives one latency sample per completed request cycle.
//! Two wire formats are supported and picked once at startup from
//! [`SinkTarget::kind`]:
//!
//! - [`LineProtocolSink`]: one ILP line over a fresh TCP connection (QuestDB).
//! - [`PrometheusPushSink`]: text-exposition push over HTTP (VictoriaMetrics).
//!
//! Sinks never retry and never batch; callers log failures and move on.
pub mod config;
mod format;
mod line_protocol;
mod prometheus;


use std::sync::Arc;

use async_trait::async_trait;

use crate::args::SinkKind;
use crate::error::SinkError;

pub use config::{
    DEFAULT_LINE_ADDRESS, DEFAULT_PROMETHEUS_URL, DEFAULT_SINK_TIMEOUT, SinkTarget,
    default_sink_address,
};
pub use format::{format_line_protocol, format_prometheus};
pub use line_protocol::LineProtocolSink;
pub use prometheus::PrometheusPushSink;

/// Measurement name shared by both wire formats.
pub const MEASUREMENT: &str = "request_times";
/// Field/label name carrying the latency value.
pub const DURATION_FIELD: &str = "duration";

#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Deliver one latency sample, in seconds.
    ///
    /// # Errors
    ///
    /// Returns an error when the sample could not be delivered within the
    /// sink deadline or the store rejected it.
    async fn report(&self, duration_seconds: f64) -> Result<(), SinkError>;
}

/// Builds the sink selected by `target`.
///
/// # Errors
///
/// Returns an error when the Prometheus URL is invalid or its HTTP client
/// cannot be built.
pub fn build_sink(target: &SinkTarget) -> Result<Arc<dyn MetricsSink>, SinkError> {
    let sink: Arc<dyn MetricsSink> = match target.kind {
        SinkKind::Line => Arc::new(LineProtocolSink::new(&target.address, target.timeout)),
        SinkKind::Prometheus => Arc::new(PrometheusPushSink::new(&target.address, target.timeout)?),
    };
    Ok(sink)
}
