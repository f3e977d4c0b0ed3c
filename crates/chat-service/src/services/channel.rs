//! Channel actions
//!
//! Joining, leaving and reading channels, and keeping the sidebar in step.

use chat_core::events::{ChannelData, ChannelIdData, ChannelStatsData, UnreadCountData};
use chat_core::{Action, ChannelStats, DomainError};
use tracing::{debug, info, instrument, warn};

use super::category::CategoryActions;
use super::context::ActionContext;
use super::error::ActionResult;

/// Channel actions
pub struct ChannelActions<'a> {
    ctx: &'a ActionContext,
}

impl<'a> ChannelActions<'a> {
    /// Create a new ChannelActions
    pub fn new(ctx: &'a ActionContext) -> Self {
        Self { ctx }
    }

    /// Join a channel and give it a sidebar category
    #[instrument(skip(self))]
    pub async fn join_channel(&self, channel_id: &str) -> ActionResult<()> {
        let user_id = self.ctx.current_user_id()?;
        let client = self.ctx.channel_client();

        let member = client
            .add_to_channel(&user_id, channel_id)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;
        let channel = client
            .get_channel(channel_id)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;

        self.ctx.store().batch(vec![
            Action::received_channel(channel.clone()),
            Action::received_my_channel_member(member),
        ]);
        CategoryActions::new(self.ctx)
            .add_channel_to_initial_category(&channel, false)
            .await?;

        info!(channel_id = %channel_id, "Joined channel");
        Ok(())
    }

    /// Leave a channel
    ///
    /// The membership and the channel's sidebar entry disappear at once. If
    /// the server refuses, both come back exactly as they were; once it
    /// agrees the channel's posts are purged.
    #[instrument(skip(self))]
    pub async fn leave_channel(&self, channel_id: &str) -> ActionResult<()> {
        let user_id = self.ctx.current_user_id()?;

        let (channel, rollback) = self.ctx.store().dispatch_with(|state| {
            let channel = state
                .channels
                .channel(channel_id)
                .cloned()
                .ok_or_else(|| DomainError::ChannelNotFound(channel_id.to_string()))?;

            let mut rollback = vec![Action::received_channel(channel.clone())];
            if let Some(member) = state.channels.my_member(channel_id) {
                rollback.push(Action::received_my_channel_member(member.clone()));
            }
            for team_id in state.categories.team_ids() {
                if state
                    .categories
                    .category_containing(team_id, channel_id)
                    .is_some()
                {
                    rollback.push(Action::RestoreCategories(
                        state.categories.snapshot(team_id),
                    ));
                }
            }

            let remove = Action::ChannelMemberRemoved(ChannelIdData {
                channel_id: channel_id.to_string(),
            });
            Ok::<_, DomainError>((vec![remove], (channel, rollback)))
        })?;

        if let Err(e) = self
            .ctx
            .channel_client()
            .remove_from_channel(&user_id, channel_id)
            .await
        {
            let logged_out = e.should_force_logout();
            let err = self.ctx.handle_api_error(e);
            if !logged_out {
                self.ctx.store().batch(rollback);
            }
            warn!(error = %err, "Leave channel failed, rolled back");
            return Err(err);
        }

        self.ctx
            .store()
            .dispatch(Action::LeaveChannel(ChannelData { channel }));
        info!(channel_id = %channel_id, "Left channel");
        Ok(())
    }

    /// Mark every message of a channel as read
    ///
    /// The channel's unread messages and mentions are subtracted from its
    /// team's totals in the same update. Nothing is sent to the server.
    #[instrument(skip(self))]
    pub fn mark_channel_as_read(&self, channel_id: &str) -> ActionResult<()> {
        self.ctx.store().dispatch_with(|state| {
            let channel = state
                .channels
                .channel(channel_id)
                .ok_or_else(|| DomainError::ChannelNotFound(channel_id.to_string()))?;
            let member = state
                .channels
                .my_member(channel_id)
                .ok_or_else(|| DomainError::ChannelMemberNotFound(channel_id.to_string()))?;

            let unread = member.unread_count(channel.total_msg_count);
            let mentions = member.mention_count;
            debug!(unread, mentions, "Marking channel read");

            let counts = |amount| UnreadCountData {
                team_id: channel.team_id.clone(),
                channel_id: channel_id.to_string(),
                amount,
            };
            let mut actions = Vec::with_capacity(2);
            if unread > 0 {
                actions.push(Action::DecrementUnreadMsgCount(counts(unread)));
            }
            if mentions > 0 {
                actions.push(Action::DecrementUnreadMentionCount(counts(mentions)));
            }
            Ok::<_, DomainError>((actions, ()))
        })?;
        Ok(())
    }

    /// Fetch member and pinned post counts
    #[instrument(skip(self))]
    pub async fn get_channel_stats(&self, channel_id: &str) -> ActionResult<ChannelStats> {
        let stats = self
            .ctx
            .channel_client()
            .get_channel_stats(channel_id)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;

        self.ctx
            .store()
            .dispatch(Action::ReceivedChannelStats(ChannelStatsData {
                stats: stats.clone(),
            }));
        Ok(stats)
    }
}
