use futures_util::StreamExt;
use reqwest::{Client, header::CONTENT_TYPE};

use crate::error::HttpError;
use crate::payload::WidgetRequest;

use super::EndpointTarget;

/// Posts one widget to the target. The response status is not inspected; only
/// transport-level failures count as errors. The body is drained so the
/// connection returns to the pool.
///
/// # Errors
///
/// Returns an error when the payload cannot be encoded, the request cannot be
/// sent, or the response body cannot be read.
pub async fn send_add_widget(
    client: &Client,
    target: &EndpointTarget,
    request: &WidgetRequest,
) -> Result<u16, HttpError> {
    let body =
        serde_json::to_vec(request).map_err(|err| HttpError::EncodeRequest { source: err })?;
    let url = target.add_widget_url();
    let response = client
        .post(url.clone())
        .header(CONTENT_TYPE, "application/json")
        .body(body)
        .send()
        .await
        .map_err(|err| HttpError::SendRequest {
            url: url.to_string(),
            source: err,
        })?;
    let status = response.status().as_u16();
    drain_response_body(response)
        .await
        .map_err(|err| HttpError::ReadResponse {
            url: url.to_string(),
            source: err,
        })?;
    Ok(status)
}

async fn drain_response_body(response: reqwest::Response) -> Result<u64, reqwest::Error> {
    let mut stream = response.bytes_stream();
    let mut total_bytes: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let bytes = chunk?;
        total_bytes = total_bytes.saturating_add(u64::try_from(bytes.len()).unwrap_or(u64::MAX));
    }
    Ok(total_bytes)
}
