use std::time::Duration;

use serde::Deserialize;

use crate::args::{PositiveUsize, SinkKind};
use crate::args::parsers::parse_duration_value;
use crate::error::ValidationError;
use crate::http::EndpointTarget;
use crate::payload::PayloadConfig;
use crate::sinks::SinkTarget;

pub const DEFAULT_WORKERS: usize = 10;
/// Upper bound on the worker count; the job queue and metrics channel are
/// sized from it.
pub const MAX_WORKERS_LIMIT: usize = 10_000;

pub(crate) const fn check_worker_count(
    workers: PositiveUsize,
) -> Result<PositiveUsize, ValidationError> {
    if workers.get() > MAX_WORKERS_LIMIT {
        Err(ValidationError::ValueTooLarge {
            max: MAX_WORKERS_LIMIT,
        })
    } else {
        Ok(workers)
    }
}

/// On-disk configuration (`.toml` or `.json`). Every field is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub workers: Option<usize>,
    pub target_url: Option<String>,
    pub sink: Option<SinkKind>,
    pub sink_address: Option<String>,
    pub sink_timeout: Option<DurationValue>,
    pub request_timeout: Option<DurationValue>,
    pub summary_interval: Option<DurationValue>,
    pub duration: Option<DurationValue>,
    pub id_length: Option<usize>,
    pub max_slots: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_value(text),
        }
    }
}

/// Fully resolved, immutable run configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    pub workers: PositiveUsize,
    pub target: EndpointTarget,
    pub sink: SinkTarget,
    pub payload: PayloadConfig,
    pub request_timeout: Duration,
    pub summary_interval: Duration,
    /// Stop on its own after this long; `None` runs until a signal arrives.
    pub duration: Option<Duration>,
    pub seed: Option<u64>,
}
