//! Configuration loading and resolution.
//!
//! Values are layered, highest precedence first: CLI flags, config file,
//! environment, built-in defaults. Only the environment layer is forgiving:
//! a bad environment value is replaced by its default with a warning.
mod env;
mod loader;
mod resolve;
pub mod types;

#[cfg(test)]
mod tests;

pub use env::{
    ENV_MAX_WORKERS, ENV_METRICS_SINK, ENV_NGINX_URL, ENV_QUEST_DB_URL, ENV_VICTORIA_URL,
    EnvConfig,
};
pub use loader::load_config;
pub use resolve::resolve_config;
pub use types::{ConfigFile, DEFAULT_WORKERS, LoaderConfig, MAX_WORKERS_LIMIT};

#[cfg(test)]
pub(crate) use loader::load_config_file;
