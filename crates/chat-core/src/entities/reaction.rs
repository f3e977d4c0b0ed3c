//! Reaction entity - represents an emoji reaction on a post

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Reaction entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    pub user_id: String,
    pub post_id: String,
    pub emoji_name: String,
    #[serde(default)]
    pub create_at: i64,
}

impl Reaction {
    /// Create a new Reaction
    pub fn new(
        user_id: impl Into<String>,
        post_id: impl Into<String>,
        emoji_name: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            post_id: post_id.into(),
            emoji_name: emoji_name.into(),
            create_at: Utc::now().timestamp_millis(),
        }
    }

    /// Key of this reaction within its post: one per user and emoji
    pub fn key(&self) -> String {
        format!("{}-{}", self.user_id, self.emoji_name)
    }

    /// Check if reaction uses a specific emoji
    #[inline]
    pub fn is_emoji(&self, emoji_name: &str) -> bool {
        self.emoji_name == emoji_name
    }
}
