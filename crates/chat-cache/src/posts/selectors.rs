//! Read-side helpers over the posts slice

use std::collections::HashMap;

use chat_core::{Post, PostOrderBlock, Reaction};

use super::state::PostsState;

impl PostsState {
    pub fn post(&self, post_id: &str) -> Option<&Post> {
        self.posts.get(post_id)
    }

    pub fn posts(&self) -> &HashMap<String, Post> {
        &self.posts
    }

    /// Every cached block of a channel, newest first
    pub fn blocks(&self, channel_id: &str) -> &[PostOrderBlock] {
        self.posts_in_channel
            .get(channel_id)
            .map_or(&[][..], Vec::as_slice)
    }

    /// A channel counts as loaded once any page of it has been merged
    pub fn is_channel_loaded(&self, channel_id: &str) -> bool {
        self.posts_in_channel.contains_key(channel_id)
    }

    pub fn recent_block(&self, channel_id: &str) -> Option<&PostOrderBlock> {
        self.blocks(channel_id).iter().find(|b| b.recent)
    }

    pub fn block_containing(&self, channel_id: &str, post_id: &str) -> Option<&PostOrderBlock> {
        self.blocks(channel_id).iter().find(|b| b.contains(post_id))
    }

    /// Posts of the recent block, newest first
    pub fn recent_posts(&self, channel_id: &str) -> Vec<&Post> {
        self.recent_block(channel_id)
            .map(|block| block.order.iter().filter_map(|id| self.posts.get(id)).collect())
            .unwrap_or_default()
    }

    /// Up to `limit` cached ids older than `post_id`, nearest first
    pub fn posts_before(&self, channel_id: &str, post_id: &str, limit: usize) -> &[String] {
        self.window(channel_id, post_id)
            .map_or(&[][..], |(order, index)| {
                let start = (index + 1).min(order.len());
                let end = (start + limit).min(order.len());
                &order[start..end]
            })
    }

    /// Up to `limit` cached ids newer than `post_id`, newest first
    pub fn posts_after(&self, channel_id: &str, post_id: &str, limit: usize) -> &[String] {
        self.window(channel_id, post_id)
            .map_or(&[][..], |(order, index)| &order[index.saturating_sub(limit)..index])
    }

    /// `post_id` with up to `after` newer and `before` older cached ids around it
    pub fn posts_around(
        &self,
        channel_id: &str,
        post_id: &str,
        before: usize,
        after: usize,
    ) -> &[String] {
        self.window(channel_id, post_id)
            .map_or(&[][..], |(order, index)| {
                let start = index.saturating_sub(after);
                let end = (index + before + 1).min(order.len());
                &order[start..end]
            })
    }

    fn window(&self, channel_id: &str, post_id: &str) -> Option<(&[String], usize)> {
        let block = self.block_containing(channel_id, post_id)?;
        let index = block.order.iter().position(|id| id == post_id)?;
        Some((block.order.as_slice(), index))
    }

    /// Reply ids of a root, in arrival order
    pub fn thread_replies(&self, root_id: &str) -> &[String] {
        self.posts_in_thread
            .get(root_id)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Whether the thread index has an entry for this root at all
    pub fn has_thread_entry(&self, root_id: &str) -> bool {
        self.posts_in_thread.contains_key(root_id)
    }

    /// Client-maintained reply count of a root
    pub fn reply_count(&self, root_id: &str) -> Option<i64> {
        self.posts_replies.get(root_id).copied()
    }

    pub fn pending_post_ids(&self) -> &[String] {
        &self.pending_post_ids
    }

    pub fn is_pending(&self, post_id: &str) -> bool {
        self.pending_post_ids.iter().any(|id| id == post_id)
    }

    /// Reactions on a post keyed `{user_id}-{emoji_name}`
    pub fn reactions_for(&self, post_id: &str) -> Option<&HashMap<String, Reaction>> {
        self.reactions.get(post_id)
    }
}
