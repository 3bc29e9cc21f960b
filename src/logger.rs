use tracing_subscriber::{EnvFilter, FmtSubscriber};

const LOG_ENV: &str = "WIDGET_LOADER_LOG";
const FALLBACK_ENV: &str = "RUST_LOG";

/// Installs the global fmt subscriber. `WIDGET_LOADER_LOG` wins over
/// `RUST_LOG`; without either the level is `info`, or `debug` when verbose.
pub fn init_logging(verbose: bool) {
    let filter = build_filter(verbose, |key| std::env::var(key).ok());
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();

    if let Err(err) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set global default subscriber: {}", err);
    }
}

/// An unparseable directive from the environment falls back to `info`.
fn build_filter<F>(verbose: bool, lookup: F) -> EnvFilter
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(LOG_ENV).or_else(|| lookup(FALLBACK_ENV)) {
        Some(directives) => {
            EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("info"))
        }
        None if verbose => EnvFilter::new("debug"),
        None => EnvFilter::new("info"),
    }
}
