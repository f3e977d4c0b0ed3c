//! Preference entity - a user setting stored as a category/name/value triple

use serde::{Deserialize, Serialize};

/// Category of the legacy per-channel favorite flag
pub const CATEGORY_FAVORITE_CHANNEL: &str = "favorite_channel";

/// Preference entity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preference {
    pub user_id: String,
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Preference {
    /// Create a new Preference
    pub fn new(
        user_id: impl Into<String>,
        category: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            category: category.into(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// The legacy favorite flag for a channel
    pub fn favorite_channel(user_id: &str, channel_id: &str, favorite: bool) -> Self {
        Self::new(
            user_id,
            CATEGORY_FAVORITE_CHANNEL,
            channel_id,
            if favorite { "true" } else { "false" },
        )
    }

    /// Store key, `{category}--{name}`
    pub fn key(&self) -> String {
        preference_key(&self.category, &self.name)
    }

    #[inline]
    pub fn is_true(&self) -> bool {
        self.value == "true"
    }
}

/// Build a preference store key
pub fn preference_key(category: &str, name: &str) -> String {
    format!("{category}--{name}")
}
