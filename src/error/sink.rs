use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to format sample: {source}")]
    WriteLine {
        #[source]
        source: std::fmt::Error,
    },
    #[error("Failed to connect to line-protocol sink '{address}': {source}")]
    Connect {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write to line-protocol sink '{address}': {source}")]
    Write {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Metrics sink '{address}' did not respond within {timeout:?}")]
    Timeout { address: String, timeout: Duration },
    #[error("Invalid Prometheus sink URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("Failed to build sink HTTP client: {source}")]
    BuildClient {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to send metrics to '{url}': {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to send metrics: status={status}, response={body}")]
    UnexpectedStatus { status: u16, body: String },
    #[cfg(test)]
    #[error("Test expectation failed: {message}")]
    TestExpectation { message: &'static str },
}
