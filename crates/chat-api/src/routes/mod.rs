//! Route definitions
//!
//! Every endpoint the client calls, built under `{base}/api/v4`.

/// URL builder for the server's v4 API
#[derive(Debug, Clone)]
pub struct Routes {
    api: String,
}

impl Routes {
    /// Routes for a server, trailing slash tolerated
    pub fn new(base_url: &str) -> Self {
        Self {
            api: format!("{}/api/v4", base_url.trim_end_matches('/')),
        }
    }

    pub fn api(&self) -> &str {
        &self.api
    }

    // ===== Posts =====

    pub fn posts(&self) -> String {
        format!("{}/posts", self.api)
    }

    pub fn post(&self, post_id: &str) -> String {
        format!("{}/posts/{post_id}", self.api)
    }

    pub fn post_patch(&self, post_id: &str) -> String {
        format!("{}/patch", self.post(post_id))
    }

    pub fn post_thread(&self, post_id: &str) -> String {
        format!("{}/thread", self.post(post_id))
    }

    pub fn post_pin(&self, post_id: &str) -> String {
        format!("{}/pin", self.post(post_id))
    }

    pub fn post_unpin(&self, post_id: &str) -> String {
        format!("{}/unpin", self.post(post_id))
    }

    pub fn post_reactions(&self, post_id: &str) -> String {
        format!("{}/reactions", self.post(post_id))
    }

    /// Posts of a channel; paging goes in the query string
    pub fn channel_posts(&self, channel_id: &str) -> String {
        format!("{}/posts", self.channel(channel_id))
    }

    pub fn channel_posts_unread(&self, user_id: &str, channel_id: &str) -> String {
        format!("{}/users/{user_id}/channels/{channel_id}/posts/unread", self.api)
    }

    /// Move the user's read position to just before the post
    pub fn post_set_unread(&self, user_id: &str, post_id: &str) -> String {
        format!("{}/users/{user_id}/posts/{post_id}/set_unread", self.api)
    }

    // ===== Reactions =====

    pub fn reactions(&self) -> String {
        format!("{}/reactions", self.api)
    }

    pub fn user_reaction(&self, user_id: &str, post_id: &str, emoji_name: &str) -> String {
        format!(
            "{}/users/{user_id}/posts/{post_id}/reactions/{emoji_name}",
            self.api
        )
    }

    // ===== Channels =====

    pub fn channel(&self, channel_id: &str) -> String {
        format!("{}/channels/{channel_id}", self.api)
    }

    pub fn channel_members(&self, channel_id: &str) -> String {
        format!("{}/members", self.channel(channel_id))
    }

    pub fn channel_member(&self, channel_id: &str, user_id: &str) -> String {
        format!("{}/{user_id}", self.channel_members(channel_id))
    }

    pub fn channel_stats(&self, channel_id: &str) -> String {
        format!("{}/stats", self.channel(channel_id))
    }

    // ===== Categories =====

    pub fn categories(&self, user_id: &str, team_id: &str) -> String {
        format!(
            "{}/users/{user_id}/teams/{team_id}/channels/categories",
            self.api
        )
    }

    pub fn category_order(&self, user_id: &str, team_id: &str) -> String {
        format!("{}/order", self.categories(user_id, team_id))
    }

    pub fn category(&self, user_id: &str, team_id: &str, category_id: &str) -> String {
        format!("{}/{category_id}", self.categories(user_id, team_id))
    }

    // ===== Preferences =====

    pub fn preferences(&self, user_id: &str) -> String {
        format!("{}/users/{user_id}/preferences", self.api)
    }

    // ===== Statuses =====

    pub fn statuses_by_ids(&self) -> String {
        format!("{}/users/status/ids", self.api)
    }
}
