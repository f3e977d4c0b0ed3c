//! API errors - failures reported by the REST collaborator

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned by a REST call
///
/// `status_code` is 0 when the request never produced an HTTP response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{message} (status {status_code}, url {url})")]
pub struct ApiError {
    pub message: String,
    #[serde(default)]
    pub status_code: u16,
    /// Server-side error id, e.g. `api.context.session_expired.app_error`
    #[serde(default, rename = "id")]
    pub server_error_id: String,
    #[serde(default)]
    pub url: String,
}

impl ApiError {
    /// Create an error for an HTTP response
    pub fn new(message: impl Into<String>, status_code: u16, url: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code,
            server_error_id: String::new(),
            url: url.into(),
        }
    }

    /// Create an error for a request that never got a response
    pub fn network(message: impl Into<String>, url: impl Into<String>) -> Self {
        Self::new(message, 0, url)
    }

    /// Set the server error id
    pub fn with_server_error_id(mut self, id: impl Into<String>) -> Self {
        self.server_error_id = id.into();
        self
    }

    #[inline]
    pub fn is_unauthorized(&self) -> bool {
        self.status_code == 401
    }

    #[inline]
    pub fn is_network(&self) -> bool {
        self.status_code == 0
    }

    /// Session is gone: a 401 from anything but the login call itself
    pub fn should_force_logout(&self) -> bool {
        self.is_unauthorized() && !self.url.contains("/users/login")
    }
}
