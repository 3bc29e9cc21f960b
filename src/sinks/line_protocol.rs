use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::SinkError;

use super::MetricsSink;
use super::format::format_line_protocol;

/// Writes one ILP line per sample; the connection lives for a single call.
#[derive(Debug, Clone)]
pub struct LineProtocolSink {
    address: String,
    timeout: Duration,
}

impl LineProtocolSink {
    #[must_use]
    pub fn new(address: &str, timeout: Duration) -> Self {
        Self {
            address: address.to_owned(),
            timeout,
        }
    }

    async fn send_line(&self, line: &str) -> Result<(), SinkError> {
        let mut stream = TcpStream::connect(self.address.as_str())
            .await
            .map_err(|err| SinkError::Connect {
                address: self.address.clone(),
                source: err,
            })?;
        stream
            .write_all(line.as_bytes())
            .await
            .map_err(|err| SinkError::Write {
                address: self.address.clone(),
                source: err,
            })?;
        stream.shutdown().await.map_err(|err| SinkError::Write {
            address: self.address.clone(),
            source: err,
        })
    }
}

#[async_trait]
impl MetricsSink for LineProtocolSink {
    async fn report(&self, duration_seconds: f64) -> Result<(), SinkError> {
        let line = format_line_protocol(duration_seconds, Utc::now().timestamp_micros())?;
        timeout(self.timeout, self.send_line(&line))
            .await
            .map_err(|_elapsed| SinkError::Timeout {
                address: self.address.clone(),
                timeout: self.timeout,
            })?
    }
}
