//! Domain errors - local precondition failures detected before any request is made

use thiserror::Error;

use crate::entities::CategoryType;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    #[error("Channel member not found: {0}")]
    ChannelMemberNotFound(String),

    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    #[error("No {category_type:?} category in team {team_id}")]
    CategoryTypeNotFound {
        team_id: String,
        category_type: CategoryType,
    },

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Only custom categories can be deleted: {0}")]
    CannotDeleteCategory(String),

    #[error("No current user")]
    NotLoggedIn,

    #[error("No current team")]
    NoCurrentTeam,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get a stable error code string
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::PostNotFound(_) => "UNKNOWN_POST",
            Self::ChannelNotFound(_) => "UNKNOWN_CHANNEL",
            Self::ChannelMemberNotFound(_) => "UNKNOWN_CHANNEL_MEMBER",
            Self::CategoryNotFound(_) => "UNKNOWN_CATEGORY",
            Self::CategoryTypeNotFound { .. } => "UNKNOWN_CATEGORY_TYPE",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",

            // Business Rules
            Self::CannotDeleteCategory(_) => "CANNOT_DELETE_CATEGORY",
            Self::NotLoggedIn => "NOT_LOGGED_IN",
            Self::NoCurrentTeam => "NO_CURRENT_TEAM",

            // Infrastructure
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::PostNotFound(_)
                | Self::ChannelNotFound(_)
                | Self::ChannelMemberNotFound(_)
                | Self::CategoryNotFound(_)
                | Self::CategoryTypeNotFound { .. }
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::CannotDeleteCategory(_))
    }

    /// Check if the caller lacks the session state the operation needs
    pub fn is_session(&self) -> bool {
        matches!(self, Self::NotLoggedIn | Self::NoCurrentTeam)
    }
}
