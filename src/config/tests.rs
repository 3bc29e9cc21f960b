use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

use tempfile::Builder;

use super::*;
use crate::args::{LoaderArgs, PositiveUsize, SinkKind};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::http::DEFAULT_REQUEST_TIMEOUT;
use crate::metrics::DEFAULT_SUMMARY_INTERVAL;
use crate::sinks::{DEFAULT_LINE_ADDRESS, DEFAULT_PROMETHEUS_URL, DEFAULT_SINK_TIMEOUT};

fn env_from(pairs: &[(&str, &str)]) -> EnvConfig {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect();
    EnvConfig::from_lookup(|key| vars.get(key).cloned())
}

fn write_config(suffix: &str, content: &str) -> AppResult<tempfile::NamedTempFile> {
    let mut file = Builder::new()
        .suffix(suffix)
        .tempfile()
        .map_err(|err| AppError::validation(format!("tempfile failed: {}", err)))?;
    file.write_all(content.as_bytes())
        .map_err(|err| AppError::validation(format!("write failed: {}", err)))?;
    Ok(file)
}

#[test]
fn defaults_apply_when_nothing_is_set() -> AppResult<()> {
    let config = resolve_config(&LoaderArgs::default(), None, &EnvConfig::default())?;
    let checks = [
        (config.workers.get() == DEFAULT_WORKERS, "workers"),
        (
            config.target.add_widget_url().as_str() == "http://localhost/rpc/add_widget",
            "target",
        ),
        (config.sink.kind == SinkKind::Prometheus, "sink kind"),
        (config.sink.address == DEFAULT_PROMETHEUS_URL, "sink address"),
        (config.sink.timeout == DEFAULT_SINK_TIMEOUT, "sink timeout"),
        (config.request_timeout == DEFAULT_REQUEST_TIMEOUT, "request timeout"),
        (
            config.summary_interval == DEFAULT_SUMMARY_INTERVAL,
            "summary interval",
        ),
        (config.payload.id_length.get() == 10, "id length"),
        (config.payload.max_slots == 3, "max slots"),
        (config.duration.is_none(), "duration"),
        (config.seed.is_none(), "seed"),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(AppError::validation(message));
        }
    }
    Ok(())
}

#[test]
fn environment_values_are_read() -> AppResult<()> {
    let env = env_from(&[
        (ENV_MAX_WORKERS, "25"),
        (ENV_NGINX_URL, "http://nginx:81"),
        (ENV_METRICS_SINK, "line"),
        (ENV_QUEST_DB_URL, "questdb:9009"),
        (ENV_VICTORIA_URL, "http://victoria:8428"),
    ]);
    let config = resolve_config(&LoaderArgs::default(), None, &env)?;
    let checks = [
        (config.workers.get() == 25, "workers"),
        (
            config.target.base_url().as_str() == "http://nginx:81/",
            "target",
        ),
        (config.sink.kind == SinkKind::Line, "sink kind"),
        (config.sink.address == "questdb:9009", "line address"),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(AppError::validation(message));
        }
    }
    Ok(())
}

#[test]
fn invalid_environment_values_fall_back_to_defaults() -> AppResult<()> {
    let env = env_from(&[
        (ENV_MAX_WORKERS, "lots"),
        (ENV_NGINX_URL, "not a url"),
        (ENV_METRICS_SINK, "kafka"),
        (ENV_VICTORIA_URL, "ftp://victoria"),
    ]);
    if env != EnvConfig::default() {
        return Err(AppError::validation(format!(
            "invalid values were kept: {:?}",
            env
        )));
    }
    let config = resolve_config(&LoaderArgs::default(), None, &env)?;
    if config.workers.get() != DEFAULT_WORKERS || config.sink.address != DEFAULT_PROMETHEUS_URL {
        return Err(AppError::validation("defaults not applied"));
    }
    Ok(())
}

#[test]
fn zero_and_empty_environment_values_are_ignored() -> AppResult<()> {
    let env = env_from(&[(ENV_MAX_WORKERS, "0"), (ENV_METRICS_SINK, "   ")]);
    if env.workers.is_some() || env.sink.is_some() {
        return Err(AppError::validation(format!("unexpected env: {:?}", env)));
    }
    Ok(())
}

#[test]
fn sink_address_follows_selected_kind() -> AppResult<()> {
    let env = env_from(&[
        (ENV_METRICS_SINK, "prometheus"),
        (ENV_QUEST_DB_URL, "questdb:9009"),
    ]);
    let config = resolve_config(&LoaderArgs::default(), None, &env)?;
    if config.sink.address != DEFAULT_PROMETHEUS_URL {
        return Err(AppError::validation(format!(
            "line address leaked into prometheus sink: {}",
            config.sink.address
        )));
    }

    let args = LoaderArgs {
        sink: Some(SinkKind::Line),
        ..LoaderArgs::default()
    };
    let config = resolve_config(&args, None, &EnvConfig::default())?;
    if config.sink.address != DEFAULT_LINE_ADDRESS {
        return Err(AppError::validation("line default address not applied"));
    }
    Ok(())
}

#[test]
fn cli_overrides_file_and_file_overrides_env() -> AppResult<()> {
    let file = ConfigFile {
        workers: Some(6),
        target_url: Some("http://from-file".to_owned()),
        sink: Some(SinkKind::Line),
        ..ConfigFile::default()
    };
    let env = env_from(&[
        (ENV_MAX_WORKERS, "30"),
        (ENV_NGINX_URL, "http://from-env"),
        (ENV_METRICS_SINK, "prometheus"),
    ]);
    let args = LoaderArgs {
        workers: PositiveUsize::new(2),
        ..LoaderArgs::default()
    };
    let config = resolve_config(&args, Some(&file), &env)?;
    let checks = [
        (config.workers.get() == 2, "cli workers"),
        (
            config.target.base_url().host_str() == Some("from-file"),
            "file target",
        ),
        (config.sink.kind == SinkKind::Line, "file sink"),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(AppError::validation(message));
        }
    }
    Ok(())
}

#[test]
fn invalid_cli_target_is_fatal() -> AppResult<()> {
    let args = LoaderArgs {
        target_url: Some("nginx".to_owned()),
        ..LoaderArgs::default()
    };
    if resolve_config(&args, None, &EnvConfig::default()).is_ok() {
        return Err(AppError::validation("invalid target accepted"));
    }
    Ok(())
}

#[test]
fn invalid_explicit_sink_address_is_fatal() -> AppResult<()> {
    let args = LoaderArgs {
        sink: Some(SinkKind::Prometheus),
        sink_address: Some("victoria:8428".to_owned()),
        ..LoaderArgs::default()
    };
    if resolve_config(&args, None, &EnvConfig::default()).is_ok() {
        return Err(AppError::validation("scheme-less prometheus url accepted"));
    }
    Ok(())
}

#[test]
fn toml_config_file_is_loaded() -> AppResult<()> {
    let file = write_config(
        ".toml",
        r#"
workers = 3
target_url = "http://nginx"
sink = "questdb"
sink_address = "questdb:9009"
sink_timeout = "500ms"
request_timeout = 2
duration = "30s"
id_length = 8
max_slots = 1
seed = 11
"#,
    )?;
    let path = file.path().to_string_lossy().into_owned();
    let loaded = load_config(Some(&path))?
        .ok_or_else(|| AppError::validation("config not loaded"))?;
    let config = resolve_config(&LoaderArgs::default(), Some(&loaded), &EnvConfig::default())?;
    let checks = [
        (config.workers.get() == 3, "workers"),
        (config.sink.kind == SinkKind::Line, "sink"),
        (config.sink.address == "questdb:9009", "sink address"),
        (
            config.sink.timeout == Duration::from_millis(500),
            "sink timeout",
        ),
        (
            config.request_timeout == Duration::from_secs(2),
            "request timeout",
        ),
        (config.duration == Some(Duration::from_secs(30)), "duration"),
        (config.payload.id_length.get() == 8, "id length"),
        (config.payload.max_slots == 1, "max slots"),
        (config.seed == Some(11), "seed"),
    ];
    for (ok, message) in checks {
        if !ok {
            return Err(AppError::validation(message));
        }
    }
    Ok(())
}

#[test]
fn json_config_file_is_loaded() -> AppResult<()> {
    let file = write_config(".json", r#"{"workers": 5, "sink": "prometheus"}"#)?;
    let loaded = load_config_file(file.path())?;
    if loaded.workers != Some(5) || loaded.sink != Some(SinkKind::Prometheus) {
        return Err(AppError::validation(format!("unexpected config: {:?}", loaded)));
    }
    Ok(())
}

#[test]
fn config_file_errors_are_reported() -> AppResult<()> {
    let unknown_field = write_config(".toml", "threads = 4\n")?;
    let bad_extension = write_config(".yaml", "workers: 4\n")?;
    let zero_workers = write_config(".toml", "workers = 0\n")?;

    if load_config_file(unknown_field.path()).is_ok() {
        return Err(AppError::validation("unknown field accepted"));
    }
    match load_config_file(bad_extension.path()) {
        Err(AppError::Config(ConfigError::UnsupportedExtension { ext })) if ext == "yaml" => {}
        Err(other) => return Err(AppError::validation(format!("unexpected error: {}", other))),
        Ok(_) => return Err(AppError::validation("yaml accepted")),
    }
    let loaded = load_config_file(zero_workers.path())?;
    match resolve_config(&LoaderArgs::default(), Some(&loaded), &EnvConfig::default()) {
        Err(AppError::Config(ConfigError::InvalidField { field, .. })) if field == "workers" => {
            Ok(())
        }
        Err(other) => Err(AppError::validation(format!("unexpected error: {}", other))),
        Ok(_) => Err(AppError::validation("zero workers accepted")),
    }
}

#[test]
fn missing_explicit_config_file_is_an_error() -> AppResult<()> {
    let dir = tempfile::tempdir()
        .map_err(|err| AppError::validation(format!("tempdir failed: {}", err)))?;
    let path = dir.path().join("absent.toml").to_string_lossy().into_owned();
    match load_config(Some(&path)) {
        Err(AppError::Config(ConfigError::ReadConfig { .. })) => Ok(()),
        Err(other) => Err(AppError::validation(format!("unexpected error: {}", other))),
        Ok(_) => Err(AppError::validation("missing file accepted")),
    }
}

#[test]
fn oversized_environment_worker_count_falls_back_to_default() -> AppResult<()> {
    let env = env_from(&[(ENV_MAX_WORKERS, "2305843009213693952")]);
    if env.workers.is_some() {
        return Err(AppError::validation(format!(
            "oversized worker count kept: {:?}",
            env.workers
        )));
    }
    let config = resolve_config(&LoaderArgs::default(), None, &env)?;
    if config.workers.get() != DEFAULT_WORKERS {
        return Err(AppError::validation(format!(
            "expected default workers, got {}",
            config.workers.get()
        )));
    }

    let at_limit = env_from(&[(ENV_MAX_WORKERS, "10000")]);
    if at_limit.workers.map(PositiveUsize::get) != Some(MAX_WORKERS_LIMIT) {
        return Err(AppError::validation("worker count at the limit was rejected"));
    }
    Ok(())
}

#[test]
fn oversized_cli_and_file_worker_counts_are_fatal() -> AppResult<()> {
    let too_many = MAX_WORKERS_LIMIT.saturating_add(1);
    let args = LoaderArgs {
        workers: PositiveUsize::new(too_many),
        ..LoaderArgs::default()
    };
    match resolve_config(&args, None, &EnvConfig::default()) {
        Err(AppError::Validation(ValidationError::ValueTooLarge { max }))
            if max == MAX_WORKERS_LIMIT => {}
        Err(other) => return Err(AppError::validation(format!("unexpected error: {}", other))),
        Ok(_) => return Err(AppError::validation("oversized cli workers accepted")),
    }

    let file = ConfigFile {
        workers: Some(too_many),
        ..ConfigFile::default()
    };
    match resolve_config(&LoaderArgs::default(), Some(&file), &EnvConfig::default()) {
        Err(AppError::Config(ConfigError::InvalidField { field, .. })) if field == "workers" => {
            Ok(())
        }
        Err(other) => Err(AppError::validation(format!("unexpected error: {}", other))),
        Ok(_) => Err(AppError::validation("oversized file workers accepted")),
    }
}

#[test]
fn explicit_sink_address_is_trimmed() -> AppResult<()> {
    let args = LoaderArgs {
        sink: Some(SinkKind::Line),
        sink_address: Some(" host:9009 ".to_owned()),
        ..LoaderArgs::default()
    };
    let config = resolve_config(&args, None, &EnvConfig::default())?;
    if config.sink.address != "host:9009" {
        return Err(AppError::validation(format!(
            "untrimmed address: {:?}",
            config.sink.address
        )));
    }

    let file = ConfigFile {
        sink: Some(SinkKind::Prometheus),
        sink_address: Some("\thttp://victoria:8428 \n".to_owned()),
        ..ConfigFile::default()
    };
    let config = resolve_config(&LoaderArgs::default(), Some(&file), &EnvConfig::default())?;
    if config.sink.address != "http://victoria:8428" {
        return Err(AppError::validation(format!(
            "untrimmed address: {:?}",
            config.sink.address
        )));
    }
    Ok(())
}
