use std::time::Duration;

use reqwest::Client;

use crate::error::HttpError;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const POOL_MAX_IDLE_PER_HOST: usize = 100;
const POOL_IDLE_TIMEOUT: Duration = Duration::from_secs(90);
const USER_AGENT: &str = concat!("widget-loader/", env!("CARGO_PKG_VERSION"));

/// Builds the client shared by all workers. Its connection pool is sized so
/// every worker can keep a warm connection to the target.
///
/// # Errors
///
/// Returns an error when the underlying TLS/HTTP stack cannot be initialized.
pub fn build_target_client(request_timeout: Duration) -> Result<Client, HttpError> {
    Client::builder()
        .timeout(request_timeout)
        .user_agent(USER_AGENT)
        .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
        .pool_idle_timeout(Some(POOL_IDLE_TIMEOUT))
        .build()
        .map_err(|err| HttpError::BuildClientFailed { source: err })
}
