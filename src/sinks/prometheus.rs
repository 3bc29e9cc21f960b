use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, StatusCode, Url, header::CONTENT_TYPE};

use crate::error::SinkError;
use crate::http::join_endpoint;

use super::MetricsSink;
use super::format::format_prometheus;

pub(crate) const IMPORT_PROMETHEUS_PATH: &str = "api/v1/import/prometheus";

/// Pushes samples to a VictoriaMetrics-compatible Prometheus import endpoint.
/// Only `204 No Content` counts as accepted.
#[derive(Debug, Clone)]
pub struct PrometheusPushSink {
    client: Client,
    endpoint: Url,
    timeout: Duration,
}

impl PrometheusPushSink {
    /// # Errors
    ///
    /// Returns an error when `base_url` is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SinkError> {
        let endpoint =
            join_endpoint(base_url, IMPORT_PROMETHEUS_PATH).map_err(|err| SinkError::InvalidUrl {
                url: base_url.to_owned(),
                source: err,
            })?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| SinkError::BuildClient { source: err })?;
        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl MetricsSink for PrometheusPushSink {
    async fn report(&self, duration_seconds: f64) -> Result<(), SinkError> {
        let body = format_prometheus(duration_seconds, Utc::now().timestamp())?;
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    SinkError::Timeout {
                        address: self.endpoint.to_string(),
                        timeout: self.timeout,
                    }
                } else {
                    SinkError::Request {
                        url: self.endpoint.to_string(),
                        source: err,
                    }
                }
            })?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(SinkError::UnexpectedStatus {
            status: status.as_u16(),
            body,
        })
    }
}
