use tracing::warn;

use crate::args::{PositiveUsize, SinkKind};
use crate::http::EndpointTarget;
use crate::sinks::default_sink_address;

use super::resolve::validate_sink_address;
use super::types::{DEFAULT_WORKERS, check_worker_count};

pub const ENV_MAX_WORKERS: &str = "MAX_WORKERS";
pub const ENV_NGINX_URL: &str = "NGINX_URL";
pub const ENV_METRICS_SINK: &str = "METRICS_SINK";
pub const ENV_VICTORIA_URL: &str = "VICTORIA_URL";
pub const ENV_QUEST_DB_URL: &str = "QUEST_DB_URL";

/// Environment layer. A field is `None` when the variable is unset, empty, or
/// invalid; invalid values are reported with a warning naming the default
/// that will be used instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvConfig {
    pub workers: Option<PositiveUsize>,
    pub target_url: Option<String>,
    pub sink: Option<SinkKind>,
    pub victoria_url: Option<String>,
    pub quest_db_address: Option<String>,
}

impl EnvConfig {
    #[must_use]
    pub fn from_process_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the layer from an arbitrary variable source.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let workers = read(ENV_MAX_WORKERS).and_then(|value| {
            value
                .parse::<PositiveUsize>()
                .and_then(check_worker_count)
                .map_err(|err| {
                    warn!(
                        "Invalid {} value '{}' ({}), using default: {}",
                        ENV_MAX_WORKERS, value, err, DEFAULT_WORKERS
                    );
                })
                .ok()
        });

        let target_url = read(ENV_NGINX_URL).and_then(|value| {
            EndpointTarget::parse(&value)
                .map_err(|err| {
                    warn!(
                        "Invalid {} value '{}' ({}), using default: {}",
                        ENV_NGINX_URL,
                        value,
                        err,
                        crate::http::DEFAULT_TARGET_URL
                    );
                })
                .ok()
                .map(|_| value)
        });

        let sink = read(ENV_METRICS_SINK).and_then(|value| {
            value
                .parse::<SinkKind>()
                .map_err(|err| {
                    warn!(
                        "Invalid {} value '{}' ({}), using default: {}",
                        ENV_METRICS_SINK,
                        value,
                        err,
                        SinkKind::default()
                    );
                })
                .ok()
        });

        let victoria_url = read(ENV_VICTORIA_URL)
            .and_then(|value| checked_sink_address(ENV_VICTORIA_URL, SinkKind::Prometheus, value));
        let quest_db_address = read(ENV_QUEST_DB_URL)
            .and_then(|value| checked_sink_address(ENV_QUEST_DB_URL, SinkKind::Line, value));

        Self {
            workers,
            target_url,
            sink,
            victoria_url,
            quest_db_address,
        }
    }

    /// Sink address from the variable that belongs to `kind`.
    #[must_use]
    pub fn sink_address(&self, kind: SinkKind) -> Option<&str> {
        match kind {
            SinkKind::Prometheus => self.victoria_url.as_deref(),
            SinkKind::Line => self.quest_db_address.as_deref(),
        }
    }
}

fn checked_sink_address(key: &str, kind: SinkKind, value: String) -> Option<String> {
    match validate_sink_address(kind, &value) {
        Ok(()) => Some(value),
        Err(err) => {
            warn!(
                "Invalid {} value '{}' ({}), using default: {}",
                key,
                value,
                err,
                default_sink_address(kind)
            );
            None
        }
    }
}
