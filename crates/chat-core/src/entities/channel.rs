//! Channel entity - an open, private, direct or group channel

use serde::{Deserialize, Serialize};

/// Channel type, serialized as the server's single-letter code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ChannelType {
    /// Public channel
    #[default]
    #[serde(rename = "O")]
    Open,
    /// Private channel
    #[serde(rename = "P")]
    Private,
    /// Direct message between two users
    #[serde(rename = "D")]
    Direct,
    /// Group message
    #[serde(rename = "G")]
    Group,
}

impl ChannelType {
    /// Direct and group messages live outside any single team
    #[inline]
    #[must_use]
    pub fn is_direct_or_group(self) -> bool {
        matches!(self, Self::Direct | Self::Group)
    }
}

/// Channel entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    /// Empty for direct and group channels
    #[serde(default)]
    pub team_id: String,
    #[serde(rename = "type")]
    pub channel_type: ChannelType,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub total_msg_count: i64,
    #[serde(default)]
    pub last_post_at: i64,
    #[serde(default)]
    pub delete_at: i64,
}

impl Channel {
    /// Create a new channel of the given type
    #[must_use]
    pub fn new(id: impl Into<String>, team_id: impl Into<String>, channel_type: ChannelType) -> Self {
        Self {
            id: id.into(),
            team_id: team_id.into(),
            channel_type,
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn is_private(&self) -> bool {
        self.channel_type == ChannelType::Private
    }

    #[inline]
    #[must_use]
    pub fn is_direct_or_group(&self) -> bool {
        self.channel_type.is_direct_or_group()
    }

    #[inline]
    #[must_use]
    pub fn is_archived(&self) -> bool {
        self.delete_at > 0
    }
}

/// Per-channel statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub channel_id: String,
    #[serde(default)]
    pub member_count: i64,
    #[serde(default)]
    pub pinnedpost_count: i64,
}

impl ChannelStats {
    pub fn new(channel_id: impl Into<String>) -> Self {
        Self {
            channel_id: channel_id.into(),
            ..Self::default()
        }
    }
}
