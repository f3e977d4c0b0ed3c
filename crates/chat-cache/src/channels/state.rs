//! Channels, memberships and stats

use std::collections::HashMap;

use chat_core::{Action, Channel, ChannelMembership, ChannelStats};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelsState {
    channels: HashMap<String, Channel>,
    my_members: HashMap<String, ChannelMembership>,
    stats: HashMap<String, ChannelStats>,
}

impl ChannelsState {
    /// Apply one action to the slice
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::ReceivedChannel(data) => {
                self.channels
                    .insert(data.channel.id.clone(), data.channel.clone());
            }
            Action::ReceivedMyChannelMember(data) => {
                self.my_members
                    .insert(data.member.channel_id.clone(), data.member.clone());
            }
            Action::ChannelMemberRemoved(data) => {
                self.my_members.remove(&data.channel_id);
            }
            Action::LeaveChannel(data) => {
                self.my_members.remove(&data.channel.id);
                // Private channels are no longer visible once left
                if data.channel.is_private() {
                    self.channels.remove(&data.channel.id);
                }
            }
            Action::ReceivedChannelStats(data) => {
                self.stats
                    .insert(data.stats.channel_id.clone(), data.stats.clone());
            }
            Action::IncrementPinnedPostCount(data) => {
                if let Some(stats) = self.stats.get_mut(&data.channel_id) {
                    stats.pinnedpost_count += 1;
                }
            }
            Action::DecrementPinnedPostCount(data) => {
                if let Some(stats) = self.stats.get_mut(&data.channel_id) {
                    stats.pinnedpost_count = (stats.pinnedpost_count - 1).max(0);
                }
            }
            Action::DecrementUnreadMsgCount(data) => {
                // The member counts messages read, so reading raises it
                if let Some(member) = self.my_members.get_mut(&data.channel_id) {
                    member.msg_count += data.amount;
                }
            }
            Action::DecrementUnreadMentionCount(data) => {
                if let Some(member) = self.my_members.get_mut(&data.channel_id) {
                    member.mention_count = (member.mention_count - data.amount).max(0);
                }
            }
            Action::PostUnreadSuccess(data) => {
                if let Some(member) = self.my_members.get_mut(&data.channel_id) {
                    member.msg_count = data.msg_count;
                    member.mention_count = data.mention_count;
                    member.last_viewed_at = data.last_viewed_at;
                }
            }
            Action::LogoutSuccess => *self = Self::default(),
            _ => {}
        }
    }

    pub fn channel(&self, channel_id: &str) -> Option<&Channel> {
        self.channels.get(channel_id)
    }

    pub fn my_member(&self, channel_id: &str) -> Option<&ChannelMembership> {
        self.my_members.get(channel_id)
    }

    pub fn stats(&self, channel_id: &str) -> Option<&ChannelStats> {
        self.stats.get(channel_id)
    }

    /// Unread messages in a channel, zero when either side is unknown
    pub fn unread_count(&self, channel_id: &str) -> i64 {
        match (self.channels.get(channel_id), self.my_members.get(channel_id)) {
            (Some(channel), Some(member)) => member.unread_count(channel.total_msg_count),
            _ => 0,
        }
    }
}
