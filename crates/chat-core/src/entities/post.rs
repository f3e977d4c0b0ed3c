//! Post entity - a message in a channel, plus the paged list shapes the server returns

use std::collections::HashMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::reaction::Reaction;

/// Post type of the aggregate "user joined/left" system post
pub const POST_TYPE_COMBINED_USER_ACTIVITY: &str = "system_combined_user_activity";

/// Client-side lifecycle marker for a stored post
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PostState {
    /// Soft deleted; kept in place as a "message deleted" placeholder
    Deleted,
}

/// Data the server attaches to a post
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetadata {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Reaction>,
}

/// Post entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub channel_id: String,
    #[serde(default)]
    pub user_id: String,
    /// Empty for root posts
    #[serde(default)]
    pub root_id: String,
    #[serde(default)]
    pub create_at: i64,
    #[serde(default)]
    pub update_at: i64,
    #[serde(default)]
    pub edit_at: i64,
    #[serde(default)]
    pub delete_at: i64,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "type")]
    pub post_type: String,
    #[serde(default)]
    pub reply_count: i64,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub pending_post_id: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_ids: Vec<String>,
    #[serde(default)]
    pub has_reactions: bool,
    /// Constituent posts of a combined activity post
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub system_post_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_following: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<PostMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<PostState>,
    /// A placeholder whose create request failed; kept so it can be retried
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,
}

impl Post {
    /// Create a new root post
    pub fn new(id: impl Into<String>, channel_id: impl Into<String>, create_at: i64) -> Self {
        Self {
            id: id.into(),
            channel_id: channel_id.into(),
            create_at,
            update_at: create_at,
            ..Self::default()
        }
    }

    /// Create a reply to `root_id`
    pub fn new_reply(
        id: impl Into<String>,
        channel_id: impl Into<String>,
        root_id: impl Into<String>,
        create_at: i64,
    ) -> Self {
        Self {
            root_id: root_id.into(),
            ..Self::new(id, channel_id, create_at)
        }
    }

    /// Create a local placeholder shown while the server creates the real post.
    ///
    /// The placeholder id is `{user_id}:{timestamp}` and doubles as the pending id.
    pub fn new_pending(
        user_id: impl Into<String>,
        channel_id: impl Into<String>,
        root_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let user_id = user_id.into();
        let now = Utc::now().timestamp_millis();
        let pending_id = format!("{user_id}:{now}");
        Self {
            id: pending_id.clone(),
            pending_post_id: pending_id,
            user_id,
            channel_id: channel_id.into(),
            root_id: root_id.into(),
            message: message.into(),
            create_at: now,
            update_at: now,
            ..Self::default()
        }
    }

    /// Check if post is a reply
    #[inline]
    pub fn is_reply(&self) -> bool {
        !self.root_id.is_empty()
    }

    /// Check if the post was deleted, either by the server or locally
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.delete_at > 0 || self.state == Some(PostState::Deleted)
    }

    /// Check if this is a combined activity post that aggregates other posts
    #[inline]
    pub fn is_combined_activity(&self) -> bool {
        self.post_type == POST_TYPE_COMBINED_USER_ACTIVITY && !self.system_post_ids.is_empty()
    }

    /// Turn the post into a "message deleted" placeholder
    pub fn mark_deleted(&mut self) {
        self.state = Some(PostState::Deleted);
        self.message.clear();
        self.file_ids.clear();
        self.has_reactions = false;
        self.metadata = None;
        self.is_pinned = false;
    }
}

/// A page of posts as returned by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostList {
    /// Post ids, newest first
    #[serde(default)]
    pub order: Vec<String>,
    #[serde(default)]
    pub posts: HashMap<String, Post>,
    /// Empty when no newer page exists
    #[serde(default)]
    pub next_post_id: String,
    /// Empty when no older page exists
    #[serde(default)]
    pub prev_post_id: String,
}

impl PostList {
    /// Build a list from posts already sorted newest first
    pub fn from_posts(posts: Vec<Post>) -> Self {
        let order = posts.iter().map(|p| p.id.clone()).collect();
        let posts = posts.into_iter().map(|p| (p.id.clone(), p)).collect();
        Self {
            order,
            posts,
            next_post_id: String::new(),
            prev_post_id: String::new(),
        }
    }

    /// Set the pagination cursors
    pub fn with_cursors(mut self, next_post_id: &str, prev_post_id: &str) -> Self {
        self.next_post_id = next_post_id.to_string();
        self.prev_post_id = prev_post_id.to_string();
        self
    }

    /// No newer page exists
    #[inline]
    pub fn reached_newest(&self) -> bool {
        self.next_post_id.is_empty()
    }

    /// No older page exists
    #[inline]
    pub fn reached_oldest(&self) -> bool {
        self.prev_post_id.is_empty()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty() && self.posts.is_empty()
    }
}

/// A contiguous, gap-free run of post ids in a channel, newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostOrderBlock {
    pub order: Vec<String>,
    /// The newest end of the block touches the present
    #[serde(default)]
    pub recent: bool,
    /// The oldest end of the block touches the start of the channel
    #[serde(default)]
    pub oldest: bool,
}

impl PostOrderBlock {
    pub fn new(order: Vec<String>, recent: bool, oldest: bool) -> Self {
        Self {
            order,
            recent,
            oldest,
        }
    }

    #[inline]
    pub fn contains(&self, post_id: &str) -> bool {
        self.order.iter().any(|id| id == post_id)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Same extent: same length and the same ids at both ends
    pub fn same_extent(&self, other: &Self) -> bool {
        self.order.len() == other.order.len()
            && self.order.first() == other.order.first()
            && self.order.last() == other.order.last()
    }
}
