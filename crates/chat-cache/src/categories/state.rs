//! Category storage and lookups

use std::collections::HashMap;

use chat_core::events::CategoryOrderSnapshot;
use chat_core::{Action, CategoryType, ChannelCategory};

/// Categories by id plus the sidebar order of each team
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoriesState {
    by_id: HashMap<String, ChannelCategory>,
    order_by_team: HashMap<String, Vec<String>>,
}

impl CategoriesState {
    /// Apply one action to the slice
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::ReceivedCategories(data) => {
                for category in &data.categories {
                    self.by_id.insert(category.id.clone(), category.clone());
                }
            }
            Action::ReceivedCategoryOrder(data) => {
                self.order_by_team
                    .insert(data.team_id.clone(), data.order.clone());
            }
            Action::CategoryDeleted(data) => {
                if let Some(category) = self.by_id.remove(&data.category_id) {
                    if let Some(order) = self.order_by_team.get_mut(&category.team_id) {
                        order.retain(|id| id != &category.id);
                    }
                }
            }
            Action::RestoreCategories(snapshot) => self.restore(snapshot),
            Action::LeaveChannel(data) => self.remove_channel(&data.channel.id),
            Action::ChannelMemberRemoved(data) => self.remove_channel(&data.channel_id),
            Action::LogoutSuccess => *self = Self::default(),
            _ => {}
        }
    }

    /// Replace every category of the snapshot's team wholesale
    fn restore(&mut self, snapshot: &CategoryOrderSnapshot) {
        self.by_id
            .retain(|_, category| category.team_id != snapshot.team_id);
        for category in &snapshot.categories {
            self.by_id.insert(category.id.clone(), category.clone());
        }
        match &snapshot.order {
            Some(order) => {
                self.order_by_team
                    .insert(snapshot.team_id.clone(), order.clone());
            }
            None => {
                self.order_by_team.remove(&snapshot.team_id);
            }
        }
    }

    fn remove_channel(&mut self, channel_id: &str) {
        for category in self.by_id.values_mut() {
            category.remove_channel(channel_id);
        }
    }

    // ========================================================================
    // Selectors
    // ========================================================================

    /// Copy of a team's categories and order, for rollback
    pub fn snapshot(&self, team_id: &str) -> CategoryOrderSnapshot {
        CategoryOrderSnapshot {
            team_id: team_id.to_string(),
            categories: self
                .by_id
                .values()
                .filter(|c| c.team_id == team_id)
                .cloned()
                .collect(),
            order: self.order_by_team.get(team_id).cloned(),
        }
    }

    pub fn category(&self, category_id: &str) -> Option<&ChannelCategory> {
        self.by_id.get(category_id)
    }

    /// Category ids of a team in sidebar order
    pub fn order(&self, team_id: &str) -> &[String] {
        self.order_by_team
            .get(team_id)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Categories of a team in sidebar order
    pub fn categories_for_team(&self, team_id: &str) -> Vec<&ChannelCategory> {
        self.order(team_id)
            .iter()
            .filter_map(|id| self.by_id.get(id))
            .collect()
    }

    /// The built-in category of a type, if the team has one
    pub fn category_of_type(
        &self,
        team_id: &str,
        category_type: CategoryType,
    ) -> Option<&ChannelCategory> {
        self.by_id
            .values()
            .find(|c| c.team_id == team_id && c.category_type == category_type)
    }

    /// The category currently holding a channel within a team
    ///
    /// Does not need the team's order to be loaded.
    pub fn category_containing(&self, team_id: &str, channel_id: &str) -> Option<&ChannelCategory> {
        self.by_id
            .values()
            .find(|c| c.team_id == team_id && c.contains(channel_id))
    }

    /// Categories have been fetched for the team
    pub fn is_loaded(&self, team_id: &str) -> bool {
        self.order_by_team.contains_key(team_id)
    }

    /// Teams whose categories are loaded
    pub fn team_ids(&self) -> impl Iterator<Item = &String> {
        self.order_by_team.keys()
    }
}
