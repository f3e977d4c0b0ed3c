//! Preferences slice.

use std::collections::HashMap;

use chat_core::{preference_key, Action, Preference, CATEGORY_FAVORITE_CHANNEL};

/// The current user's preferences keyed `{category}--{name}`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesState {
    my_preferences: HashMap<String, Preference>,
}

impl PreferencesState {
    /// Apply one action to the slice
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::ReceivedPreferences(data) => {
                for preference in &data.preferences {
                    self.my_preferences
                        .insert(preference.key(), preference.clone());
                }
            }
            Action::DeletedPreferences(data) => {
                for preference in &data.preferences {
                    self.my_preferences.remove(&preference.key());
                }
            }
            Action::LogoutSuccess => *self = Self::default(),
            _ => {}
        }
    }

    pub fn get(&self, category: &str, name: &str) -> Option<&Preference> {
        self.my_preferences.get(&preference_key(category, name))
    }

    /// The legacy favorite flag of a channel
    pub fn is_favorite_channel(&self, channel_id: &str) -> bool {
        self.get(CATEGORY_FAVORITE_CHANNEL, channel_id)
            .is_some_and(Preference::is_true)
    }
}
