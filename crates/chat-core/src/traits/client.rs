//! REST collaborator traits (ports) - the calls the action layer makes
//!
//! The action layer only depends on these traits. The HTTP implementation
//! lives in `chat-api`; tests substitute in-memory doubles.

use async_trait::async_trait;

use crate::entities::{
    Channel, ChannelCategory, ChannelMembership, ChannelStats, ChannelUnread,
    OrderedChannelCategories, Post, PostList, Preference, Reaction, UserStatus,
};
use crate::error::ApiError;

/// Result type for REST calls
pub type ApiResult<T> = Result<T, ApiError>;

// ============================================================================
// Post Client
// ============================================================================

#[async_trait]
pub trait PostClient: Send + Sync {
    /// Fetch a single post
    async fn get_post(&self, post_id: &str) -> ApiResult<Post>;

    /// Create a post; the returned post carries the placeholder's `pending_post_id`
    async fn create_post(&self, post: &Post) -> ApiResult<Post>;

    /// Update the message of an existing post
    async fn patch_post(&self, post: &Post) -> ApiResult<Post>;

    /// Delete a post
    async fn delete_post(&self, post_id: &str) -> ApiResult<()>;

    /// Root post and every reply
    async fn get_post_thread(&self, root_id: &str) -> ApiResult<PostList>;

    /// Page `page` of the channel, newest first
    async fn get_posts(&self, channel_id: &str, page: u32, per_page: u32) -> ApiResult<PostList>;

    /// Page around the user's last viewed position
    async fn get_posts_unread(
        &self,
        channel_id: &str,
        user_id: &str,
        limit_before: u32,
        limit_after: u32,
    ) -> ApiResult<PostList>;

    /// Posts created or modified since `since` (milliseconds)
    async fn get_posts_since(&self, channel_id: &str, since: i64) -> ApiResult<PostList>;

    /// Posts older than `post_id`
    async fn get_posts_before(
        &self,
        channel_id: &str,
        post_id: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<PostList>;

    /// Posts newer than `post_id`
    async fn get_posts_after(
        &self,
        channel_id: &str,
        post_id: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<PostList>;

    async fn pin_post(&self, post_id: &str) -> ApiResult<()>;

    async fn unpin_post(&self, post_id: &str) -> ApiResult<()>;

    async fn add_reaction(&self, user_id: &str, post_id: &str, emoji_name: &str)
        -> ApiResult<Reaction>;

    async fn remove_reaction(&self, user_id: &str, post_id: &str, emoji_name: &str)
        -> ApiResult<()>;

    async fn get_reactions_for_post(&self, post_id: &str) -> ApiResult<Vec<Reaction>>;

    /// Move the user's read position to just before `post_id`
    async fn set_post_unread(&self, user_id: &str, post_id: &str) -> ApiResult<ChannelUnread>;
}

// ============================================================================
// Category Client
// ============================================================================

#[async_trait]
pub trait CategoryClient: Send + Sync {
    /// All categories of the user in a team, with their order
    async fn get_channel_categories(
        &self,
        user_id: &str,
        team_id: &str,
    ) -> ApiResult<OrderedChannelCategories>;

    /// Create a category; the server assigns the id
    async fn create_channel_category(
        &self,
        user_id: &str,
        team_id: &str,
        category: &ChannelCategory,
    ) -> ApiResult<ChannelCategory>;

    /// Replace the given categories, returning the server's copies
    async fn update_channel_categories(
        &self,
        user_id: &str,
        team_id: &str,
        categories: &[ChannelCategory],
    ) -> ApiResult<Vec<ChannelCategory>>;

    /// Replace the team's category order
    async fn update_channel_category_order(
        &self,
        user_id: &str,
        team_id: &str,
        order: &[String],
    ) -> ApiResult<Vec<String>>;

    async fn delete_channel_category(
        &self,
        user_id: &str,
        team_id: &str,
        category_id: &str,
    ) -> ApiResult<()>;
}

// ============================================================================
// Channel Client
// ============================================================================

#[async_trait]
pub trait ChannelClient: Send + Sync {
    async fn get_channel(&self, channel_id: &str) -> ApiResult<Channel>;

    /// Add a user to a channel
    async fn add_to_channel(&self, user_id: &str, channel_id: &str)
        -> ApiResult<ChannelMembership>;

    /// Remove a user from a channel
    async fn remove_from_channel(&self, user_id: &str, channel_id: &str) -> ApiResult<()>;

    async fn get_channel_stats(&self, channel_id: &str) -> ApiResult<ChannelStats>;
}

// ============================================================================
// Preference Client
// ============================================================================

#[async_trait]
pub trait PreferenceClient: Send + Sync {
    /// Save preferences; existing entries with the same key are replaced
    async fn save_preferences(&self, user_id: &str, preferences: &[Preference]) -> ApiResult<()>;
}

// ============================================================================
// Status Client
// ============================================================================

#[async_trait]
pub trait StatusClient: Send + Sync {
    /// Statuses of many users in one call
    async fn get_statuses_by_ids(&self, user_ids: &[String]) -> ApiResult<Vec<UserStatus>>;
}
