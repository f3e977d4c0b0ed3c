//! Request DTOs for actions that take user input
//!
//! All request DTOs implement `Deserialize` and `Validate` for input validation.

use serde::Deserialize;
use validator::Validate;

/// Longest message the server accepts
pub const MAX_POST_MESSAGE_LENGTH: u64 = 16383;
/// Longest category name the server accepts
pub const MAX_CATEGORY_NAME_LENGTH: u64 = 22;

// ============================================================================
// Post Requests
// ============================================================================

/// Create post request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreatePostRequest {
    #[validate(length(min = 1, message = "Channel id is required"))]
    pub channel_id: String,

    /// Root of the thread when replying
    #[serde(default)]
    pub root_id: String,

    #[validate(length(min = 1, max = 16383, message = "Message must be 1-16383 characters"))]
    pub message: String,

    /// Placeholder id of a failed post being sent again
    #[serde(default)]
    pub pending_post_id: String,
}

/// Edit post request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct EditPostRequest {
    #[validate(length(min = 1, max = 16383, message = "Message must be 1-16383 characters"))]
    pub message: String,
}

// ============================================================================
// Category Requests
// ============================================================================

/// Create category request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "Team id is required"))]
    pub team_id: String,

    #[validate(length(min = 1, max = 22, message = "Category name must be 1-22 characters"))]
    pub display_name: String,

    /// Channels moved into the new category
    #[serde(default)]
    pub channel_ids: Vec<String>,
}

/// Rename category request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RenameCategoryRequest {
    #[validate(length(min = 1, max = 22, message = "Category name must be 1-22 characters"))]
    pub display_name: String,
}
