//! Response handling
//!
//! Turns HTTP responses into typed results. Non-2xx bodies are read as the
//! server's `{id, message, status_code}` error shape; requests that never
//! got a response become status 0.

use chat_core::{ApiError, ApiResult};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

/// Decode a successful JSON body, or the server's error
pub(crate) async fn json<T: DeserializeOwned>(response: Response, url: &str) -> ApiResult<T> {
    let response = check(response, url).await?;
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::new(format!("Invalid response body: {e}"), 0, url))
}

/// Accept any successful response, ignoring its body
pub(crate) async fn empty(response: Response, url: &str) -> ApiResult<()> {
    check(response, url).await.map(|_| ())
}

/// Map a transport failure to an error with status 0
pub(crate) fn transport_error(err: &reqwest::Error, url: &str) -> ApiError {
    warn!(url = %url, error = %err, "Request failed before a response");
    ApiError::network(err.to_string(), url)
}

async fn check(response: Response, url: &str) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    debug!(url = %url, status = status.as_u16(), "Server returned an error");
    Err(error_from_body(status, &body, url))
}

/// Build the error for a non-2xx response
///
/// The HTTP status and the request url always win over what the body says.
pub(crate) fn error_from_body(status: StatusCode, body: &str, url: &str) -> ApiError {
    match serde_json::from_str::<ApiError>(body) {
        Ok(mut err) => {
            err.status_code = status.as_u16();
            err.url = url.to_string();
            if err.message.is_empty() {
                err.message = reason(status);
            }
            err
        }
        Err(_) => {
            let message = if body.trim().is_empty() {
                reason(status)
            } else {
                body.trim().to_string()
            };
            ApiError::new(message, status.as_u16(), url)
        }
    }
}

fn reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown error")
        .to_string()
}
