//! Posts slice - flat post map, per-channel blocks, thread and reply indexes

use std::collections::{HashMap, HashSet};

use chat_core::{Action, Post, PostList, PostOrderBlock, Reaction};

use super::merge::{merge_post_blocks, remove_non_recent_empty_blocks, sort_order};

/// How a fetched page relates to what is already cached
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostAnchor {
    /// A page fetched without an anchor post: the first page, the unread
    /// page, or a combined around page
    Page { recent: bool, oldest: bool },
    /// Posts older than `post_id`
    Before { post_id: String, oldest: bool },
    /// Posts newer than `post_id`
    After { post_id: String, recent: bool },
    /// Catch-up set; nothing is placed in any block
    Since,
}

impl PostAnchor {
    /// First page of a channel: always touches the present
    pub fn initial(oldest: bool) -> Self {
        Self::Page {
            recent: true,
            oldest,
        }
    }
}

/// Normalized post state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostsState {
    pub(super) posts: HashMap<String, Post>,
    pub(super) posts_in_channel: HashMap<String, Vec<PostOrderBlock>>,
    pub(super) posts_in_thread: HashMap<String, Vec<String>>,
    pub(super) posts_replies: HashMap<String, i64>,
    pub(super) pending_post_ids: Vec<String>,
    pub(super) reactions: HashMap<String, HashMap<String, Reaction>>,
}

impl PostsState {
    /// Apply one action to the slice
    pub fn apply(&mut self, action: &Action) {
        match action {
            Action::ReceivedPost(data) => self.receive_post(&data.post),
            Action::ReceivedNewPost(data) => {
                self.receive_new_post(&data.post, data.collapsed_threads);
            }
            Action::ReceivedPosts(data) => self.receive_posts(&data.posts),
            Action::ReceivedPostsInChannel(data) => {
                self.receive_posts(&data.posts);
                self.merge_posts(
                    &data.channel_id,
                    &data.posts.order,
                    &PostAnchor::Page {
                        recent: data.recent,
                        oldest: data.oldest,
                    },
                );
            }
            Action::ReceivedPostsBefore(data) => {
                self.receive_posts(&data.posts);
                self.merge_posts(
                    &data.channel_id,
                    &data.posts.order,
                    &PostAnchor::Before {
                        post_id: data.before_post_id.clone(),
                        oldest: data.oldest,
                    },
                );
            }
            Action::ReceivedPostsAfter(data) => {
                self.receive_posts(&data.posts);
                self.merge_posts(
                    &data.channel_id,
                    &data.posts.order,
                    &PostAnchor::After {
                        post_id: data.after_post_id.clone(),
                        recent: data.recent,
                    },
                );
            }
            Action::ReceivedPostsSince(data) => {
                self.receive_posts(&data.posts);
                self.merge_posts(&data.channel_id, &data.posts.order, &PostAnchor::Since);
            }
            Action::ReceivedPostsInThread(data) => self.receive_thread(&data.root_id, &data.posts),
            Action::PostDeleted(data) => self.mark_deleted(&data.post),
            Action::PostRemoved(data) => self.remove_post(&data.post),
            Action::ReceivedReaction(data) => {
                let reaction = &data.reaction;
                self.reactions
                    .entry(reaction.post_id.clone())
                    .or_default()
                    .insert(reaction.key(), reaction.clone());
            }
            Action::ReceivedReactions(data) => {
                let reactions = data
                    .reactions
                    .iter()
                    .map(|r| (r.key(), r.clone()))
                    .collect();
                self.reactions.insert(data.post_id.clone(), reactions);
            }
            Action::ReactionDeleted(data) => self.delete_reaction(&data.reaction),
            Action::LeaveChannel(data) => self.remove_channel(&data.channel.id),
            Action::LogoutSuccess => *self = Self::default(),
            _ => {}
        }
    }

    /// Place a fetched order into the channel's blocks
    ///
    /// Only ids whose posts are in the map are placed, so every block stays
    /// sortable. Blocks the new range overlaps are coalesced with it; others
    /// are left alone.
    pub fn merge_posts(&mut self, channel_id: &str, order: &[String], anchor: &PostAnchor) {
        let known: Vec<String> = order
            .iter()
            .filter(|id| self.posts.contains_key(id.as_str()))
            .cloned()
            .collect();

        match anchor {
            PostAnchor::Since => return,
            PostAnchor::Page { recent, oldest } => {
                if known.is_empty() && self.posts_in_channel.contains_key(channel_id) {
                    return;
                }

                let mut incoming = PostOrderBlock::new(known, *recent, *oldest);
                sort_order(&mut incoming.order, &self.posts);

                let blocks = self
                    .posts_in_channel
                    .entry(channel_id.to_string())
                    .or_default();
                if *recent {
                    if let Some(current) = blocks.iter_mut().find(|b| b.recent) {
                        if current.same_extent(&incoming) {
                            current.oldest |= incoming.oldest;
                            return;
                        }
                        current.recent = false;
                    }
                }
                blocks.push(incoming);
            }
            PostAnchor::Before { post_id, oldest } => {
                if known.is_empty() {
                    if *oldest {
                        self.set_block_flag(channel_id, post_id, |block| block.oldest = true);
                    }
                    return;
                }

                let mut block_order = Vec::with_capacity(known.len() + 1);
                if self.posts.contains_key(post_id) {
                    block_order.push(post_id.clone());
                }
                block_order.extend(known);

                self.posts_in_channel
                    .entry(channel_id.to_string())
                    .or_default()
                    .push(PostOrderBlock::new(block_order, false, *oldest));
            }
            PostAnchor::After { post_id, recent } => {
                if known.is_empty() {
                    if *recent && self.block_containing(channel_id, post_id).is_some() {
                        self.unmark_recent(channel_id);
                        self.set_block_flag(channel_id, post_id, |block| block.recent = true);
                    }
                    return;
                }

                let mut block_order = known;
                if self.posts.contains_key(post_id) {
                    block_order.push(post_id.clone());
                }
                if *recent {
                    self.unmark_recent(channel_id);
                }

                self.posts_in_channel
                    .entry(channel_id.to_string())
                    .or_default()
                    .push(PostOrderBlock::new(block_order, *recent, false));
            }
        }

        let blocks = self.posts_in_channel.remove(channel_id).unwrap_or_default();
        let merged = merge_post_blocks(blocks, &self.posts);
        self.posts_in_channel.insert(channel_id.to_string(), merged);
    }

    fn set_block_flag(&mut self, channel_id: &str, post_id: &str, set: impl FnOnce(&mut PostOrderBlock)) {
        if let Some(block) = self
            .posts_in_channel
            .get_mut(channel_id)
            .and_then(|blocks| blocks.iter_mut().find(|b| b.contains(post_id)))
        {
            set(block);
        }
    }

    fn unmark_recent(&mut self, channel_id: &str) {
        if let Some(blocks) = self.posts_in_channel.get_mut(channel_id) {
            for block in blocks.iter_mut() {
                block.recent = false;
            }
        }
    }

    // ========================================================================
    // Post map
    // ========================================================================

    /// Insert or update a live post in the flat map
    ///
    /// Returns false when the incoming copy is not newer than the stored one.
    /// Deleted copies go through [`Self::receive_deleted`] instead.
    fn store_post(&mut self, post: &Post) -> bool {
        let mut post = post.clone();
        if let Some(existing) = self.posts.get(&post.id) {
            if existing.update_at >= post.update_at {
                return false;
            }
            if post.is_following.is_none() {
                post.is_following = existing.is_following;
            }
        }

        self.take_embedded_reactions(&mut post);

        if post.is_reply() && post.reply_count > 0 {
            if let Some(root) = self.posts.get_mut(&post.root_id) {
                root.reply_count = post.reply_count;
            }
        }

        self.posts.insert(post.id.clone(), post);
        true
    }

    /// Move reactions from post metadata into the reaction index
    fn take_embedded_reactions(&mut self, post: &mut Post) {
        let Some(metadata) = post.metadata.take() else {
            return;
        };

        let reactions: HashMap<String, Reaction> = metadata
            .reactions
            .into_iter()
            .map(|r| (r.key(), r))
            .collect();
        if reactions.is_empty() {
            self.reactions.remove(&post.id);
        } else {
            self.reactions.insert(post.id.clone(), reactions);
        }
    }

    /// The real post has arrived; drop its placeholder everywhere
    fn replace_pending(&mut self, post: &Post) {
        let pending_id = &post.pending_post_id;
        if pending_id.is_empty() || *pending_id == post.id {
            return;
        }

        self.posts.remove(pending_id);
        self.pending_post_ids.retain(|id| id != pending_id);

        if let Some(block) = self
            .posts_in_channel
            .get_mut(&post.channel_id)
            .and_then(|blocks| blocks.iter_mut().find(|b| b.recent))
        {
            if let Some(index) = block.order.iter().position(|id| id == pending_id) {
                if self.posts.contains_key(&post.id) && !block.contains(&post.id) {
                    block.order[index] = post.id.clone();
                } else {
                    block.order.remove(index);
                }
                sort_order(&mut block.order, &self.posts);
            }
        }

        if post.is_reply() {
            if let Some(thread) = self.posts_in_thread.get_mut(&post.root_id) {
                thread.retain(|id| id != pending_id);
            }
        }
    }

    /// Append a reply to its root's thread entry, once
    fn index_reply(&mut self, post: &Post) {
        if !post.is_reply() || !self.posts.contains_key(&post.id) {
            return;
        }
        let thread = self.posts_in_thread.entry(post.root_id.clone()).or_default();
        if !thread.contains(&post.id) {
            thread.push(post.id.clone());
        }
    }

    /// A server copy with `delete_at` set: the same soft delete as
    /// `PostDeleted`, for posts already stored
    fn receive_deleted(&mut self, post: &Post) {
        if self.posts.contains_key(&post.id) {
            self.mark_deleted(post);
        }
    }

    fn receive_post(&mut self, post: &Post) {
        if post.delete_at > 0 {
            self.receive_deleted(post);
            return;
        }
        self.store_post(post);
        self.replace_pending(post);
        // Settled either way: created, or kept as a failed placeholder
        if !post.pending_post_id.is_empty() {
            self.pending_post_ids.retain(|id| *id != post.pending_post_id);
        }
        self.index_reply(post);
        if post.is_reply() && post.reply_count > 0 {
            self.posts_replies.insert(post.root_id.clone(), post.reply_count);
        }
    }

    fn receive_new_post(&mut self, post: &Post, collapsed_threads: bool) {
        if post.delete_at > 0 {
            self.receive_deleted(post);
            return;
        }
        // A reply seen for the first time adds one to its root, unless it
        // takes over a placeholder that was already counted
        let adds_reply = post.is_reply()
            && !self.posts.contains_key(&post.id)
            && (post.pending_post_id.is_empty()
                || post.pending_post_id == post.id
                || !self.posts.contains_key(&post.pending_post_id));

        self.store_post(post);
        self.replace_pending(post);
        self.index_reply(post);
        if post.is_reply() && post.reply_count > 0 {
            self.posts_replies.insert(post.root_id.clone(), post.reply_count);
        } else if adds_reply {
            if let Some(count) = self.posts_replies.get_mut(&post.root_id) {
                *count += 1;
            }
        }

        if !post.pending_post_id.is_empty()
            && post.pending_post_id == post.id
            && !self.pending_post_ids.contains(&post.id)
        {
            self.pending_post_ids.push(post.id.clone());
        }

        if collapsed_threads && post.is_reply() {
            return;
        }
        if !self.posts.contains_key(&post.id) {
            return;
        }

        // Posts are only placed once the channel has been loaded
        let Some(blocks) = self.posts_in_channel.get_mut(&post.channel_id) else {
            return;
        };
        let index = match blocks.iter().position(|b| b.recent) {
            Some(index) => index,
            None => {
                blocks.push(PostOrderBlock::new(Vec::new(), true, false));
                blocks.len() - 1
            }
        };
        let block = &mut blocks[index];
        if !block.contains(&post.id) {
            block.order.insert(0, post.id.clone());
            sort_order(&mut block.order, &self.posts);
        }
    }

    /// Store a page of posts and index its replies, oldest first
    fn receive_posts(&mut self, list: &PostList) {
        let mut incoming: Vec<&Post> = list.posts.values().collect();
        incoming.sort_by(|a, b| a.create_at.cmp(&b.create_at).then_with(|| a.id.cmp(&b.id)));

        for post in incoming {
            if post.delete_at > 0 {
                self.receive_deleted(post);
                continue;
            }
            self.store_post(post);
            self.index_reply(post);
            if post.is_reply() {
                self.posts_replies.insert(post.root_id.clone(), post.reply_count);
            } else {
                self.posts_replies.insert(post.id.clone(), post.reply_count);
            }
        }
    }

    fn receive_thread(&mut self, root_id: &str, list: &PostList) {
        self.receive_posts(list);
        self.posts_in_thread.entry(root_id.to_string()).or_default();
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    fn replies_of(&self, root_id: &str) -> HashSet<String> {
        self.posts
            .values()
            .filter(|p| p.root_id == root_id)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Stored and not yet soft deleted, so counted by its root
    fn is_live(&self, post_id: &str) -> bool {
        self.posts.get(post_id).is_some_and(|p| !p.is_deleted())
    }

    /// A root loses its entry; a reply lowers its root's count only when it
    /// was still counted
    fn decrement_reply_count(&mut self, post: &Post, was_live: bool) {
        if post.is_reply() {
            if !was_live {
                return;
            }
            if let Some(count) = self.posts_replies.get_mut(&post.root_id) {
                if *count > 0 {
                    *count -= 1;
                }
            }
        } else {
            self.posts_replies.remove(&post.id);
        }
    }

    fn drop_from_blocks(&mut self, channel_id: &str, ids: &HashSet<String>) {
        if let Some(blocks) = self.posts_in_channel.get_mut(channel_id) {
            for block in blocks.iter_mut() {
                block.order.retain(|id| !ids.contains(id));
            }
            remove_non_recent_empty_blocks(blocks);
        }
    }

    /// Soft delete: the post stays in place as a placeholder; its replies go
    fn mark_deleted(&mut self, post: &Post) {
        let was_live = self.is_live(&post.id);
        let replies = self.replies_of(&post.id);

        if let Some(stored) = self.posts.get_mut(&post.id) {
            stored.mark_deleted();
            stored.delete_at = stored.delete_at.max(post.delete_at);
            stored.update_at = stored.update_at.max(post.update_at);
        }
        for id in &replies {
            self.posts.remove(id);
            self.reactions.remove(id);
        }
        self.drop_from_blocks(&post.channel_id, &replies);

        self.posts_in_thread.remove(&post.id);
        self.reactions.remove(&post.id);
        self.decrement_reply_count(post, was_live);
    }

    /// Hard delete of a post and, for a root, all of its replies
    fn remove_post(&mut self, post: &Post) {
        let was_live = self.is_live(&post.id);
        let mut removed = self.replies_of(&post.id);
        removed.insert(post.id.clone());

        for id in &removed {
            self.posts.remove(id);
            self.reactions.remove(id);
        }
        self.drop_from_blocks(&post.channel_id, &removed);

        if post.is_reply() {
            if let Some(thread) = self.posts_in_thread.get_mut(&post.root_id) {
                thread.retain(|id| id != &post.id);
            }
        } else {
            self.posts_in_thread.remove(&post.id);
        }
        self.pending_post_ids.retain(|id| !removed.contains(id));
        self.decrement_reply_count(post, was_live);
    }

    fn delete_reaction(&mut self, reaction: &Reaction) {
        if let Some(reactions) = self.reactions.get_mut(&reaction.post_id) {
            reactions.remove(&reaction.key());
            if reactions.is_empty() {
                self.reactions.remove(&reaction.post_id);
            }
        }
    }

    /// Forget every post of a channel the user no longer sees
    fn remove_channel(&mut self, channel_id: &str) {
        let removed: HashSet<String> = self
            .posts
            .values()
            .filter(|p| p.channel_id == channel_id)
            .map(|p| p.id.clone())
            .collect();
        if removed.is_empty() && !self.posts_in_channel.contains_key(channel_id) {
            return;
        }

        self.posts.retain(|id, _| !removed.contains(id));
        self.posts_in_channel.remove(channel_id);
        self.posts_in_thread.retain(|root, _| !removed.contains(root));
        self.posts_replies.retain(|root, _| !removed.contains(root));
        self.reactions.retain(|post_id, _| !removed.contains(post_id));
        self.pending_post_ids.retain(|id| !removed.contains(id));
    }
}
