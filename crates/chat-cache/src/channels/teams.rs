//! Current team and team memberships

use std::collections::HashMap;

use chat_core::{Action, TeamMembership};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamsState {
    current_team_id: Option<String>,
    my_members: HashMap<String, TeamMembership>,
}

impl TeamsState {
    /// Apply one action to the slice
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::SelectTeam(data) => self.current_team_id = Some(data.team_id.clone()),
            Action::ReceivedTeamMember(data) => {
                self.my_members
                    .insert(data.member.team_id.clone(), data.member.clone());
            }
            // Team counts are unread aggregates, so both go down
            Action::DecrementUnreadMsgCount(data) => {
                if let Some(member) = self.my_members.get_mut(&data.team_id) {
                    member.msg_count = (member.msg_count - data.amount).max(0);
                }
            }
            Action::DecrementUnreadMentionCount(data) => {
                if let Some(member) = self.my_members.get_mut(&data.team_id) {
                    member.mention_count = (member.mention_count - data.amount).max(0);
                }
            }
            Action::PostUnreadSuccess(data) => {
                if let Some(member) = self.my_members.get_mut(&data.team_id) {
                    member.msg_count = (member.msg_count + data.delta_msgs).max(0);
                    member.mention_count = (member.mention_count + data.delta_mentions).max(0);
                }
            }
            Action::LogoutSuccess => *self = Self::default(),
            _ => {}
        }
    }

    pub fn current_team_id(&self) -> Option<&str> {
        self.current_team_id.as_deref()
    }

    pub fn my_member(&self, team_id: &str) -> Option<&TeamMembership> {
        self.my_members.get(team_id)
    }
}
