//! Action layer error types
//!
//! Every action returns `ActionResult<T>`: the value on success, or an
//! `ActionError` the caller can render. Nothing panics past an action.

use chat_core::{ApiError, DomainError};
use std::fmt;
use validator::ValidationErrors;

/// Action layer error type
#[derive(Debug)]
pub enum ActionError {
    /// The REST call failed
    Api(ApiError),

    /// A local precondition failed before any request was made
    Domain(DomainError),

    /// Invalid input
    Validation(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ActionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api(e) => write!(f, "{e}"),
            Self::Domain(e) => write!(f, "{e}"),
            Self::Validation(msg) => write!(f, "Validation error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ActionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Api(e) => Some(e),
            Self::Domain(e) => Some(e),
            _ => None,
        }
    }
}

impl ActionError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// The REST error, if this failure came from the server
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(e) => Some(e),
            _ => None,
        }
    }

    /// HTTP-like status for this error; 0 for a request that never got a response
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Api(e) => e.status_code,
            Self::Domain(e) => {
                if e.is_not_found() {
                    404
                } else if e.is_validation() {
                    400
                } else if e.is_session() {
                    401
                } else {
                    500
                }
            }
            Self::Validation(_) => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Stable error code
    pub fn error_code(&self) -> &str {
        match self {
            Self::Api(e) if !e.server_error_id.is_empty() => &e.server_error_id,
            Self::Api(e) if e.is_network() => "NETWORK_ERROR",
            Self::Api(_) => "API_ERROR",
            Self::Domain(e) => e.code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<ApiError> for ActionError {
    fn from(err: ApiError) -> Self {
        Self::Api(err)
    }
}

impl From<DomainError> for ActionError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<ValidationErrors> for ActionError {
    fn from(err: ValidationErrors) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Result type for actions
pub type ActionResult<T> = Result<T, ActionError>;
