use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Failed to build HTTP client: {source}")]
    BuildClientFailed {
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to encode request: {source}")]
    EncodeRequest {
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to send request to '{url}': {source}")]
    SendRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("Failed to read response body from '{url}': {source}")]
    ReadResponse {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl HttpError {
    /// Whether the failure was the client-level deadline expiring.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            HttpError::SendRequest { source, .. } | HttpError::ReadResponse { source, .. } => {
                source.is_timeout()
            }
            HttpError::BuildClientFailed { .. } | HttpError::EncodeRequest { .. } => false,
        }
    }
}
