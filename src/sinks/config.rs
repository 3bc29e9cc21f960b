use std::time::Duration;

use crate::args::SinkKind;

/// VictoriaMetrics default for local testing.
pub const DEFAULT_PROMETHEUS_URL: &str = "http://localhost:8428";
/// QuestDB ILP/TCP default for local testing.
pub const DEFAULT_LINE_ADDRESS: &str = "localhost:9009";
pub const DEFAULT_SINK_TIMEOUT: Duration = Duration::from_secs(5);

/// Where latency samples go. Bound once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkTarget {
    pub kind: SinkKind,
    pub address: String,
    pub timeout: Duration,
}

impl SinkTarget {
    #[must_use]
    pub fn with_defaults(kind: SinkKind) -> Self {
        Self {
            kind,
            address: default_sink_address(kind).to_owned(),
            timeout: DEFAULT_SINK_TIMEOUT,
        }
    }
}

#[must_use]
pub const fn default_sink_address(kind: SinkKind) -> &'static str {
    match kind {
        SinkKind::Prometheus => DEFAULT_PROMETHEUS_URL,
        SinkKind::Line => DEFAULT_LINE_ADDRESS,
    }
}
