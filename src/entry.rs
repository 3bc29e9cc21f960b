use clap::Parser;
use tracing::info;

use crate::app::{LoadRunner, RunReport};
use crate::args::LoaderArgs;
use crate::config::{EnvConfig, LoaderConfig, load_config, resolve_config};
use crate::error::{AppError, AppResult, ValidationError};
use crate::shutdown_handlers::{setup_signal_shutdown_handler, shutdown_channel};

/// Binary entry point: parse, configure, run until a signal, report.
///
/// # Errors
///
/// Returns an error when startup fails: bad flags, an unreadable config file,
/// or a sink/client that cannot be built.
pub fn run() -> AppResult<()> {
    let args = LoaderArgs::parse();

    crate::logger::init_logging(args.verbose);

    let config = build_config(&args)?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|err| AppError::validation(ValidationError::RuntimeBuildFailed { source: err }))?;

    let report = runtime.block_on(run_async(config))?;
    log_report(&report);
    Ok(())
}

fn build_config(args: &LoaderArgs) -> AppResult<LoaderConfig> {
    let file = load_config(args.config.as_deref())?;
    let env = EnvConfig::from_process_env();
    resolve_config(args, file.as_ref(), &env)
}

async fn run_async(config: LoaderConfig) -> AppResult<RunReport> {
    let runner = LoadRunner::new(config)?;
    let (shutdown_tx, _) = shutdown_channel();
    let signal_handle = setup_signal_shutdown_handler(&shutdown_tx);

    let report = runner.run(&shutdown_tx).await;

    drop(shutdown_tx.send(()));
    signal_handle.await?;
    report
}

fn log_report(report: &RunReport) {
    let average = report.stats.average_secs().unwrap_or(0.0);
    info!(
        "Shutdown complete. Dispatched: {}, completed: {}, total requests: {}, average duration: {:.3}s",
        report.dispatched,
        report.completed,
        report.stats.total_requests(),
        average
    );
}
