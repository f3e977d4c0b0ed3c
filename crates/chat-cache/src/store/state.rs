//! The state tree and its cross-slice selectors

use chat_core::{Action, CategoryType, ChannelCategory};

use crate::categories::CategoriesState;
use crate::channels::{ChannelsState, TeamsState};
use crate::posts::PostsState;
use crate::preferences::PreferencesState;
use crate::users::UsersState;

/// Every slice of the client state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub posts: PostsState,
    pub channels: ChannelsState,
    pub teams: TeamsState,
    pub categories: CategoriesState,
    pub preferences: PreferencesState,
    pub users: UsersState,
}

impl StoreState {
    /// Apply one action to every slice
    pub fn apply(&mut self, action: &Action) {
        self.posts.apply(action);
        self.channels.apply(action);
        self.teams.apply(action);
        self.categories.apply(action);
        self.preferences.apply(action);
        self.users.apply(action);
    }

    pub fn current_user_id(&self) -> Option<&str> {
        self.users.current_user_id()
    }

    pub fn current_team_id(&self) -> Option<&str> {
        self.teams.current_team_id()
    }

    /// Team whose sidebar shows the channel
    ///
    /// Direct and group channels belong to no team and are shown in the
    /// current one.
    pub fn team_for_channel(&self, channel_id: &str) -> Option<String> {
        let team_id = self
            .channels
            .channel(channel_id)
            .map(|c| c.team_id.as_str())
            .filter(|id| !id.is_empty())
            .or_else(|| self.current_team_id())?;
        Some(team_id.to_string())
    }

    /// Favorite by category membership when the team has a Favorites
    /// category, by the legacy preference otherwise
    pub fn is_favorite_channel(&self, channel_id: &str) -> bool {
        let favorites = self
            .team_for_channel(channel_id)
            .and_then(|team_id| {
                self.categories
                    .category_of_type(&team_id, CategoryType::Favorites)
                    .map(|c| c.contains(channel_id))
            });
        favorites.unwrap_or_else(|| self.preferences.is_favorite_channel(channel_id))
    }

    /// Built-in category a channel returns to when it leaves Favorites or a
    /// deleted category
    pub fn default_category_for_channel(
        &self,
        team_id: &str,
        channel_id: &str,
    ) -> Option<&ChannelCategory> {
        let category_type = self
            .channels
            .channel(channel_id)
            .map_or(CategoryType::Channels, |c| {
                CategoryType::default_for(c.channel_type)
            });
        self.categories.category_of_type(team_id, category_type)
    }
}
