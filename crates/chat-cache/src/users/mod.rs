//! Users slice: who is logged in and the statuses seen so far.

use std::collections::HashMap;

use chat_core::{Action, StatusKind, UserStatus};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsersState {
    current_user_id: Option<String>,
    statuses: HashMap<String, UserStatus>,
}

impl UsersState {
    /// Apply one action to the slice
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::SetCurrentUser(data) => self.current_user_id = Some(data.user_id.clone()),
            Action::ReceivedStatuses(data) => {
                for status in &data.statuses {
                    self.statuses.insert(status.user_id.clone(), status.clone());
                }
            }
            Action::LogoutSuccess => *self = Self::default(),
            _ => {}
        }
    }

    pub fn current_user_id(&self) -> Option<&str> {
        self.current_user_id.as_deref()
    }

    pub fn status(&self, user_id: &str) -> StatusKind {
        self.statuses
            .get(user_id)
            .map_or(StatusKind::Offline, |s| s.status)
    }

    /// Ids of every user whose status has been fetched
    pub fn status_user_ids(&self) -> Vec<String> {
        self.statuses.keys().cloned().collect()
    }
}
