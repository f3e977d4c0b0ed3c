//! Channel category entity - a named, ordered group of channels in a team's sidebar

use serde::{Deserialize, Serialize};

use super::channel::ChannelType;

/// Category type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CategoryType {
    Favorites,
    /// Default home of open and private channels
    #[default]
    Channels,
    /// Default home of direct and group channels
    DirectMessages,
    Custom,
}

impl CategoryType {
    /// The built-in category a channel of this type falls back to
    #[must_use]
    pub fn default_for(channel_type: ChannelType) -> Self {
        if channel_type.is_direct_or_group() {
            Self::DirectMessages
        } else {
            Self::Channels
        }
    }
}

/// How the channels of a category are sorted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CategorySorting {
    /// Server-defined order
    #[default]
    #[serde(rename = "")]
    Default,
    #[serde(rename = "alpha")]
    Alphabetical,
    /// Most recently active first
    #[serde(rename = "recent")]
    Recency,
    /// User-defined order in `channel_ids`
    #[serde(rename = "manual")]
    Manual,
}

/// Channel category entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelCategory {
    pub id: String,
    pub team_id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "type")]
    pub category_type: CategoryType,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub sorting: CategorySorting,
    #[serde(default)]
    pub channel_ids: Vec<String>,
    #[serde(default)]
    pub muted: bool,
    #[serde(default)]
    pub collapsed: bool,
}

impl ChannelCategory {
    /// Create a new empty category
    pub fn new(
        id: impl Into<String>,
        team_id: impl Into<String>,
        category_type: CategoryType,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            team_id: team_id.into(),
            category_type,
            display_name: display_name.into(),
            ..Self::default()
        }
    }

    /// Set the channel ids
    pub fn with_channels<I, S>(mut self, channel_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.channel_ids = channel_ids.into_iter().map(Into::into).collect();
        self
    }

    #[inline]
    pub fn contains(&self, channel_id: &str) -> bool {
        self.channel_ids.iter().any(|id| id == channel_id)
    }

    #[inline]
    pub fn is_favorites(&self) -> bool {
        self.category_type == CategoryType::Favorites
    }

    #[inline]
    pub fn is_custom(&self) -> bool {
        self.category_type == CategoryType::Custom
    }

    /// Remove a channel, returning whether it was present
    pub fn remove_channel(&mut self, channel_id: &str) -> bool {
        let before = self.channel_ids.len();
        self.channel_ids.retain(|id| id != channel_id);
        self.channel_ids.len() != before
    }

    /// Place a channel at `index` (clamped), moving it if already present
    pub fn insert_channel(&mut self, channel_id: &str, index: usize) {
        self.remove_channel(channel_id);
        let index = index.min(self.channel_ids.len());
        self.channel_ids.insert(index, channel_id.to_string());
    }
}

/// Categories of one team as returned by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderedChannelCategories {
    pub categories: Vec<ChannelCategory>,
    /// Category ids in sidebar order
    pub order: Vec<String>,
}
