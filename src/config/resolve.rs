use std::time::Duration;

use crate::args::{LoaderArgs, PositiveUsize, SinkKind};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::http::{DEFAULT_REQUEST_TIMEOUT, DEFAULT_TARGET_URL, EndpointTarget, join_endpoint};
use crate::metrics::DEFAULT_SUMMARY_INTERVAL;
use crate::payload::PayloadConfig;
use crate::sinks::{DEFAULT_SINK_TIMEOUT, SinkTarget, default_sink_address};

use super::env::EnvConfig;
use super::types::{
    ConfigFile, DEFAULT_WORKERS, DurationValue, LoaderConfig, check_worker_count,
};

/// Merges CLI flags, the optional config file, and the environment into one
/// [`LoaderConfig`].
///
/// # Errors
///
/// Returns an error when a CLI or config-file value is invalid. Environment
/// problems never fail here; [`EnvConfig`] already replaced them.
pub fn resolve_config(
    args: &LoaderArgs,
    file: Option<&ConfigFile>,
    env: &EnvConfig,
) -> AppResult<LoaderConfig> {
    let empty = ConfigFile::default();
    let file = file.unwrap_or(&empty);

    let workers = match (args.workers, file.workers) {
        (Some(workers), _) => check_worker_count(workers).map_err(AppError::validation)?,
        (None, Some(workers)) => check_worker_count(positive_field("workers", workers)?)
            .map_err(|err| {
                AppError::config(ConfigError::InvalidField {
                    field: "workers",
                    source: err,
                })
            })?,
        (None, None) => env
            .workers
            .or_else(|| PositiveUsize::new(DEFAULT_WORKERS))
            .unwrap_or(PositiveUsize::MIN),
    };

    let target_url = args
        .target_url
        .as_deref()
        .or(file.target_url.as_deref())
        .or(env.target_url.as_deref())
        .unwrap_or(DEFAULT_TARGET_URL);
    let target = EndpointTarget::parse(target_url).map_err(AppError::validation)?;

    let sink_kind = args.sink.or(file.sink).or(env.sink).unwrap_or_default();
    let sink_address = match args.sink_address.as_deref().or(file.sink_address.as_deref()) {
        Some(address) => {
            validate_sink_address(sink_kind, address).map_err(AppError::validation)?;
            address.trim().to_owned()
        }
        None => env
            .sink_address(sink_kind)
            .unwrap_or_else(|| default_sink_address(sink_kind))
            .to_owned(),
    };
    let sink_timeout = duration_layer(
        args.sink_timeout,
        file.sink_timeout.as_ref(),
        "sink_timeout",
    )?
    .unwrap_or(DEFAULT_SINK_TIMEOUT);

    let id_length = match (args.id_length, file.id_length) {
        (Some(length), _) => length,
        (None, Some(length)) => positive_field("id_length", length)?,
        (None, None) => PayloadConfig::default().id_length,
    };
    let max_slots = args
        .max_slots
        .or(file.max_slots)
        .unwrap_or(PayloadConfig::default().max_slots);

    let request_timeout = duration_layer(
        args.request_timeout,
        file.request_timeout.as_ref(),
        "request_timeout",
    )?
    .unwrap_or(DEFAULT_REQUEST_TIMEOUT);
    let summary_interval = duration_layer(
        args.summary_interval,
        file.summary_interval.as_ref(),
        "summary_interval",
    )?
    .unwrap_or(DEFAULT_SUMMARY_INTERVAL);
    let duration = duration_layer(args.duration, file.duration.as_ref(), "duration")?;

    Ok(LoaderConfig {
        workers,
        target,
        sink: SinkTarget {
            kind: sink_kind,
            address: sink_address,
            timeout: sink_timeout,
        },
        payload: PayloadConfig {
            id_length,
            max_slots,
        },
        request_timeout,
        summary_interval,
        duration,
        seed: args.seed.or(file.seed),
    })
}

/// Line sinks take `host:port`; Prometheus sinks take an http(s) base URL.
pub(super) fn validate_sink_address(kind: SinkKind, address: &str) -> Result<(), ValidationError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(ValidationError::EmptySinkAddress);
    }
    match kind {
        SinkKind::Line => Ok(()),
        SinkKind::Prometheus => {
            let url = join_endpoint(address, "").map_err(|err| ValidationError::InvalidUrl {
                url: address.to_owned(),
                source: err,
            })?;
            if matches!(url.scheme(), "http" | "https") {
                Ok(())
            } else {
                Err(ValidationError::UnsupportedScheme {
                    url: address.to_owned(),
                })
            }
        }
    }
}

fn positive_field(field: &'static str, value: usize) -> AppResult<PositiveUsize> {
    PositiveUsize::try_from(value)
        .map_err(|err| AppError::config(ConfigError::InvalidField { field, source: err }))
}

fn duration_layer(
    cli: Option<Duration>,
    file: Option<&DurationValue>,
    field: &'static str,
) -> AppResult<Option<Duration>> {
    if cli.is_some() {
        return Ok(cli);
    }
    file.map(|value| {
        value
            .to_duration()
            .map_err(|err| AppError::config(ConfigError::InvalidField { field, source: err }))
    })
    .transpose()
}
