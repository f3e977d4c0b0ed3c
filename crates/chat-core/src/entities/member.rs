//! Membership entities - the current user's view of a channel or team

use serde::{Deserialize, Serialize};

/// The current user's membership in a channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMembership {
    pub channel_id: String,
    pub user_id: String,
    /// Messages the user has seen
    #[serde(default)]
    pub msg_count: i64,
    #[serde(default)]
    pub mention_count: i64,
    #[serde(default)]
    pub last_viewed_at: i64,
    #[serde(default)]
    pub roles: String,
}

impl ChannelMembership {
    /// Create a new membership
    pub fn new(channel_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            user_id: user_id.into(),
            ..Self::default()
        }
    }

    /// Unread messages given the channel's total
    #[inline]
    pub fn unread_count(&self, total_msg_count: i64) -> i64 {
        (total_msg_count - self.msg_count).max(0)
    }
}

/// The current user's membership in a team, with aggregated unread counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMembership {
    pub team_id: String,
    pub user_id: String,
    #[serde(default)]
    pub msg_count: i64,
    #[serde(default)]
    pub mention_count: i64,
}

impl TeamMembership {
    /// Create a new membership
    pub fn new(team_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            team_id: team_id.into(),
            user_id: user_id.into(),
            msg_count: 0,
            mention_count: 0,
        }
    }
}

/// Unread state of a channel after the user marked a post as unread
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelUnread {
    #[serde(default)]
    pub team_id: String,
    pub channel_id: String,
    #[serde(default)]
    pub msg_count: i64,
    #[serde(default)]
    pub mention_count: i64,
    #[serde(default)]
    pub last_viewed_at: i64,
}
