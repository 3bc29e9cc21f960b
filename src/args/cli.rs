use clap::Parser;
use std::time::Duration;

use super::parsers::{parse_duration_arg, parse_positive_usize};
use super::types::{PositiveUsize, SinkKind};

/// Command-line overrides. Every field is optional so the config resolver can
/// tell an explicit flag apart from a value that should fall through to the
/// config file, the environment, or the built-in default.
#[derive(Debug, Parser, Clone, Default)]
#[clap(
    version,
    about = "Synthetic load generator for the add-widget RPC endpoint with latency reporting to VictoriaMetrics or QuestDB."
)]
pub struct LoaderArgs {
    /// Number of concurrent workers (also the job queue capacity)
    #[arg(long, short = 'w', value_parser = parse_positive_usize)]
    pub workers: Option<PositiveUsize>,

    /// Base URL of the target service (the add-widget RPC is appended)
    #[arg(long = "target-url", short = 'u')]
    pub target_url: Option<String>,

    /// Metrics sink wire format
    #[arg(long = "sink", ignore_case = true)]
    pub sink: Option<SinkKind>,

    /// Metrics sink address (host:port for line, base URL for prometheus)
    #[arg(long = "sink-address")]
    pub sink_address: Option<String>,

    /// Deadline for one metrics sink call (supports ms/s/m/h)
    #[arg(long = "sink-timeout", value_parser = parse_duration_arg)]
    pub sink_timeout: Option<Duration>,

    /// Deadline for one target request (supports ms/s/m/h)
    #[arg(long = "request-timeout", value_parser = parse_duration_arg)]
    pub request_timeout: Option<Duration>,

    /// Interval between aggregate summary log lines (supports ms/s/m/h)
    #[arg(long = "summary-interval", value_parser = parse_duration_arg)]
    pub summary_interval: Option<Duration>,

    /// Stop on its own after this long instead of waiting for a signal
    #[arg(long = "duration", short = 'd', value_parser = parse_duration_arg)]
    pub duration: Option<Duration>,

    /// Length of the generated widget serial number and name
    #[arg(long = "id-length", value_parser = parse_positive_usize)]
    pub id_length: Option<PositiveUsize>,

    /// Upper bound (inclusive) on the number of generated slots
    #[arg(long = "max-slots")]
    pub max_slots: Option<usize>,

    /// Seed for deterministic payload generation
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Path to a TOML or JSON config file
    #[arg(long = "config", short = 'c')]
    pub config: Option<String>,

    /// Enable debug logging (per-request latency lines)
    #[arg(long, short = 'v')]
    pub verbose: bool,
}
