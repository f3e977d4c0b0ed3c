//! Post actions
//!
//! Fetch pages of posts and merge them into the Post Ordering Cache; create,
//! edit, delete, pin and react to posts.

use chat_cache::combine_around;
use chat_core::events::{
    ChannelIdData, NewPostData, PostUnreadData, PostsAfterData, PostsBeforeData,
    PostsInChannelData, PostsInThreadData, PostsSinceData, ReactionData, ReactionsData,
};
use chat_core::{Action, DomainError, Post, PostList, Reaction};
use chrono::Utc;
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

use crate::dto::{CreatePostRequest, EditPostRequest};

use super::context::ActionContext;
use super::error::ActionResult;

/// Server errors after which a post will never be accepted; its placeholder
/// is dropped instead of kept for a retry
const DISMISSED_POST_ERRORS: [&str; 3] = [
    "api.post.create_post.root_id.app_error",
    "api.post.create_post.town_square_read_only",
    "plugin.message_will_be_posted.dismiss_post",
];

/// Post actions
pub struct PostActions<'a> {
    ctx: &'a ActionContext,
}

impl<'a> PostActions<'a> {
    /// Create a new PostActions
    pub fn new(ctx: &'a ActionContext) -> Self {
        Self { ctx }
    }

    // ========================================================================
    // Single posts
    // ========================================================================

    /// Fetch one post into the cache
    #[instrument(skip(self))]
    pub async fn get_post(&self, post_id: &str) -> ActionResult<Post> {
        let post = self
            .ctx
            .post_client()
            .get_post(post_id)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;

        self.ctx.store().dispatch(Action::received_post(post.clone()));
        self.ctx.queue_statuses([post.user_id.clone()]);
        Ok(post)
    }

    /// Create a post, showing a pending placeholder until the server answers
    ///
    /// Setting `pending_post_id` to the id of a failed placeholder sends it
    /// again. Returns `None` without a request while that placeholder is
    /// still being sent. When the request fails the placeholder stays in
    /// place marked `failed`, unless the server rejected the post for good.
    #[instrument(skip(self, request))]
    pub async fn create_post(&self, request: CreatePostRequest) -> ActionResult<Option<Post>> {
        request.validate()?;
        let user_id = self.ctx.current_user_id()?;
        let collapsed_threads = self.ctx.posts_config().collapsed_threads;

        let mut pending = Post::new_pending(
            &user_id,
            &request.channel_id,
            &request.root_id,
            &request.message,
        );
        if !request.pending_post_id.is_empty() {
            pending.id.clone_from(&request.pending_post_id);
            pending.pending_post_id.clone_from(&request.pending_post_id);
        }

        let (sending, previous) = self.ctx.store().select(|state| {
            (
                state.posts.is_pending(&pending.id),
                state.posts.post(&pending.id).map(|p| (p.create_at, p.update_at)),
            )
        });
        if sending {
            debug!(pending_post_id = %pending.id, "Post is already being sent");
            return Ok(None);
        }
        // A retry keeps its place in the channel
        if let Some((create_at, update_at)) = previous {
            pending.create_at = create_at;
            pending.update_at = pending.update_at.max(update_at + 1);
        }

        self.ctx.store().dispatch(Action::ReceivedNewPost(NewPostData {
            post: pending.clone(),
            collapsed_threads,
        }));

        // The server assigns the id and the creation time
        let outgoing = Post {
            id: String::new(),
            create_at: 0,
            ..pending.clone()
        };
        match self.ctx.post_client().create_post(&outgoing).await {
            Ok(mut created) => {
                if created.pending_post_id.is_empty() {
                    created.pending_post_id.clone_from(&pending.id);
                }
                self.ctx.store().dispatch(Action::ReceivedNewPost(NewPostData {
                    post: created.clone(),
                    collapsed_threads,
                }));
                info!(post_id = %created.id, channel_id = %created.channel_id, "Post created");
                Ok(Some(created))
            }
            Err(e) => {
                let logged_out = e.should_force_logout();
                let dismissed = DISMISSED_POST_ERRORS.contains(&e.server_error_id.as_str());
                let err = self.ctx.handle_api_error(e);
                warn!(
                    pending_post_id = %pending.id,
                    dismissed,
                    error = %err,
                    "Post creation failed"
                );

                // A forced logout already cleared the store
                if logged_out {
                    return Err(err);
                }
                if dismissed {
                    self.ctx.store().dispatch(Action::post_removed(pending));
                } else {
                    let update_at = Utc::now().timestamp_millis().max(pending.update_at + 1);
                    self.ctx.store().dispatch(Action::received_post(Post {
                        failed: true,
                        update_at,
                        ..pending
                    }));
                }
                Err(err)
            }
        }
    }

    /// Replace the message of a post
    #[instrument(skip(self, request))]
    pub async fn edit_post(&self, post_id: &str, request: EditPostRequest) -> ActionResult<Post> {
        request.validate()?;
        let mut post = self.stored_post(post_id)?;
        post.message = request.message;

        let updated = self
            .ctx
            .post_client()
            .patch_post(&post)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;

        self.ctx.store().dispatch(Action::received_post(updated.clone()));
        info!(post_id = %post_id, "Post edited");
        Ok(updated)
    }

    /// Delete a post on the server, then leave a "message deleted" placeholder
    ///
    /// A combined activity post deletes each post it aggregates.
    #[instrument(skip(self))]
    pub async fn delete_post(&self, post_id: &str) -> ActionResult<()> {
        let post = self.stored_post(post_id)?;
        for post in self.constituents(&post) {
            self.ctx
                .post_client()
                .delete_post(&post.id)
                .await
                .map_err(|e| self.ctx.handle_api_error(e))?;

            let mut actions = vec![Action::post_deleted(post.clone())];
            if post.is_pinned {
                actions.push(Action::DecrementPinnedPostCount(ChannelIdData {
                    channel_id: post.channel_id.clone(),
                }));
            }
            self.ctx.store().batch(actions);
            info!(post_id = %post.id, "Post deleted");
        }
        Ok(())
    }

    /// Drop a post and its replies from the cache without calling the server
    #[instrument(skip(self, post), fields(post_id = %post.id))]
    pub fn remove_post(&self, post: &Post) {
        let targets = self.constituents(post);
        let mut actions = Vec::with_capacity(targets.len());
        for target in targets {
            if target.is_pinned {
                actions.push(Action::DecrementPinnedPostCount(ChannelIdData {
                    channel_id: target.channel_id.clone(),
                }));
            }
            actions.push(Action::post_removed(target));
        }
        self.ctx.store().batch(actions);
    }

    #[instrument(skip(self))]
    pub async fn pin_post(&self, post_id: &str) -> ActionResult<()> {
        self.set_pinned(post_id, true).await
    }

    #[instrument(skip(self))]
    pub async fn unpin_post(&self, post_id: &str) -> ActionResult<()> {
        self.set_pinned(post_id, false).await
    }

    async fn set_pinned(&self, post_id: &str, pinned: bool) -> ActionResult<()> {
        let mut post = self.stored_post(post_id)?;
        let client = self.ctx.post_client();
        let result = if pinned {
            client.pin_post(post_id).await
        } else {
            client.unpin_post(post_id).await
        };
        result.map_err(|e| self.ctx.handle_api_error(e))?;

        let channel = ChannelIdData {
            channel_id: post.channel_id.clone(),
        };
        post.is_pinned = pinned;
        post.update_at = Utc::now().timestamp_millis().max(post.update_at + 1);

        self.ctx.store().batch(vec![
            Action::received_post(post),
            if pinned {
                Action::IncrementPinnedPostCount(channel)
            } else {
                Action::DecrementPinnedPostCount(channel)
            },
        ]);
        Ok(())
    }

    // ========================================================================
    // Read state
    // ========================================================================

    /// Mark the post's channel unread from this post onwards
    ///
    /// Combined activity posts are skipped without a request.
    #[instrument(skip(self))]
    pub async fn set_unread_post(&self, post_id: &str) -> ActionResult<()> {
        let user_id = self.ctx.current_user_id()?;
        let post = self.stored_post(post_id)?;
        if post.is_combined_activity() {
            return Ok(());
        }

        let unread = self
            .ctx
            .post_client()
            .set_post_unread(&user_id, post_id)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;

        let data = self.ctx.store().select(|state| {
            let (delta_msgs, delta_mentions) = state
                .channels
                .my_member(&unread.channel_id)
                .map_or((0, 0), |member| {
                    (
                        member.msg_count - unread.msg_count,
                        unread.mention_count - member.mention_count,
                    )
                });
            PostUnreadData {
                team_id: unread.team_id.clone(),
                channel_id: unread.channel_id.clone(),
                msg_count: unread.msg_count,
                mention_count: unread.mention_count,
                last_viewed_at: unread.last_viewed_at,
                delta_msgs,
                delta_mentions,
            }
        });
        self.ctx.store().dispatch(Action::PostUnreadSuccess(data));
        info!(post_id = %post_id, channel_id = %unread.channel_id, "Channel marked unread");
        Ok(())
    }

    // ========================================================================
    // Reactions
    // ========================================================================

    #[instrument(skip(self))]
    pub async fn add_reaction(&self, post_id: &str, emoji_name: &str) -> ActionResult<Reaction> {
        let user_id = self.ctx.current_user_id()?;
        let reaction = self
            .ctx
            .post_client()
            .add_reaction(&user_id, post_id, emoji_name)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;

        self.ctx.store().dispatch(Action::ReceivedReaction(ReactionData {
            reaction: reaction.clone(),
        }));
        Ok(reaction)
    }

    #[instrument(skip(self))]
    pub async fn remove_reaction(&self, post_id: &str, emoji_name: &str) -> ActionResult<()> {
        let user_id = self.ctx.current_user_id()?;
        self.ctx
            .post_client()
            .remove_reaction(&user_id, post_id, emoji_name)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;

        self.ctx.store().dispatch(Action::ReactionDeleted(ReactionData {
            reaction: Reaction::new(user_id, post_id, emoji_name),
        }));
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn get_reactions_for_post(&self, post_id: &str) -> ActionResult<Vec<Reaction>> {
        let reactions = self
            .ctx
            .post_client()
            .get_reactions_for_post(post_id)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;

        self.ctx.store().dispatch(Action::ReceivedReactions(ReactionsData {
            post_id: post_id.to_string(),
            reactions: reactions.clone(),
        }));
        Ok(reactions)
    }

    // ========================================================================
    // Pages
    // ========================================================================

    /// Fetch a root post and all of its replies
    #[instrument(skip(self))]
    pub async fn get_post_thread(&self, root_id: &str) -> ActionResult<PostList> {
        let list = self
            .ctx
            .post_client()
            .get_post_thread(root_id)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;

        self.queue_authors(&list);
        self.ctx
            .store()
            .dispatch(Action::ReceivedPostsInThread(PostsInThreadData {
                root_id: root_id.to_string(),
                posts: list.clone(),
            }));
        Ok(list)
    }

    /// Fetch page `page` of a channel; page 0 touches the present
    #[instrument(skip(self))]
    pub async fn get_posts(&self, channel_id: &str, page: u32, per_page: u32) -> ActionResult<PostList> {
        let list = self
            .ctx
            .post_client()
            .get_posts(channel_id, page, per_page)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;

        debug!(count = list.order.len(), "Received channel page");
        self.queue_authors(&list);
        self.ctx
            .store()
            .dispatch(Action::ReceivedPostsInChannel(PostsInChannelData {
                channel_id: channel_id.to_string(),
                recent: page == 0,
                oldest: list.reached_oldest(),
                posts: list.clone(),
            }));
        Ok(list)
    }

    /// Fetch the page around the user's unread line
    #[instrument(skip(self))]
    pub async fn get_posts_unread(&self, channel_id: &str) -> ActionResult<PostList> {
        let user_id = self.ctx.current_user_id()?;
        let config = self.ctx.posts_config();
        let list = self
            .ctx
            .post_client()
            .get_posts_unread(channel_id, &user_id, config.limit_before, config.limit_after)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;

        self.queue_authors(&list);
        self.ctx
            .store()
            .dispatch(Action::ReceivedPostsInChannel(PostsInChannelData {
                channel_id: channel_id.to_string(),
                recent: list.reached_newest(),
                oldest: list.reached_oldest(),
                posts: list.clone(),
            }));
        Ok(list)
    }

    /// Fetch everything created or changed since `since`
    ///
    /// Only the post map is updated; channel order is left to the paged fetches.
    #[instrument(skip(self))]
    pub async fn get_posts_since(&self, channel_id: &str, since: i64) -> ActionResult<PostList> {
        let list = self
            .ctx
            .post_client()
            .get_posts_since(channel_id, since)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;

        self.queue_authors(&list);
        self.ctx
            .store()
            .dispatch(Action::ReceivedPostsSince(PostsSinceData {
                channel_id: channel_id.to_string(),
                posts: list.clone(),
            }));
        Ok(list)
    }

    #[instrument(skip(self))]
    pub async fn get_posts_before(
        &self,
        channel_id: &str,
        post_id: &str,
        page: u32,
        per_page: u32,
    ) -> ActionResult<PostList> {
        let list = self
            .ctx
            .post_client()
            .get_posts_before(channel_id, post_id, page, per_page)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;

        self.queue_authors(&list);
        self.ctx
            .store()
            .dispatch(Action::ReceivedPostsBefore(PostsBeforeData {
                channel_id: channel_id.to_string(),
                before_post_id: post_id.to_string(),
                oldest: list.reached_oldest(),
                posts: list.clone(),
            }));
        Ok(list)
    }

    #[instrument(skip(self))]
    pub async fn get_posts_after(
        &self,
        channel_id: &str,
        post_id: &str,
        page: u32,
        per_page: u32,
    ) -> ActionResult<PostList> {
        let list = self
            .ctx
            .post_client()
            .get_posts_after(channel_id, post_id, page, per_page)
            .await
            .map_err(|e| self.ctx.handle_api_error(e))?;

        self.queue_authors(&list);
        self.ctx
            .store()
            .dispatch(Action::ReceivedPostsAfter(PostsAfterData {
                channel_id: channel_id.to_string(),
                after_post_id: post_id.to_string(),
                recent: list.reached_newest(),
                posts: list.clone(),
            }));
        Ok(list)
    }

    /// Jump to a post: fetch newer posts, its thread and older posts together
    /// and merge them as one page
    #[instrument(skip(self))]
    pub async fn get_posts_around(
        &self,
        channel_id: &str,
        post_id: &str,
        per_page: u32,
    ) -> ActionResult<PostList> {
        let half = (per_page / 2).max(1);
        let client = self.ctx.post_client();
        let (after, thread, before) = futures::try_join!(
            client.get_posts_after(channel_id, post_id, 0, half),
            client.get_post_thread(post_id),
            client.get_posts_before(channel_id, post_id, 0, half),
        )
        .map_err(|e| self.ctx.handle_api_error(e))?;

        let list = combine_around(after, thread, before, post_id);
        self.queue_authors(&list);
        self.ctx
            .store()
            .dispatch(Action::ReceivedPostsInChannel(PostsInChannelData {
                channel_id: channel_id.to_string(),
                recent: list.reached_newest(),
                oldest: list.reached_oldest(),
                posts: list.clone(),
            }));
        Ok(list)
    }

    /// Fetch the threads of replies whose root is not cached
    ///
    /// Each root is fetched once, even across concurrent calls. Returns the
    /// number of threads fetched; the first failure is returned after every
    /// fetch has settled.
    #[instrument(skip(self, posts), fields(count = posts.len()))]
    pub async fn get_threads_for_posts(&self, posts: &[Post]) -> ActionResult<usize> {
        let missing: Vec<String> = self.ctx.store().select(|state| {
            let mut roots: Vec<String> = Vec::new();
            for post in posts {
                if post.is_reply()
                    && state.posts.post(&post.root_id).is_none()
                    && !roots.contains(&post.root_id)
                {
                    roots.push(post.root_id.clone());
                }
            }
            roots
        });

        let in_flight = self.ctx.threads_in_flight();
        let roots: Vec<String> = missing
            .into_iter()
            .filter(|root| in_flight.insert(root.clone()))
            .collect();
        if roots.is_empty() {
            return Ok(0);
        }

        let results = join_all(roots.iter().map(|root| self.get_post_thread(root))).await;
        for root in &roots {
            in_flight.remove(root);
        }

        let fetched = results.iter().filter(|r| r.is_ok()).count();
        if let Some(err) = results.into_iter().find_map(Result::err) {
            return Err(err);
        }
        Ok(fetched)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn stored_post(&self, post_id: &str) -> ActionResult<Post> {
        self.ctx
            .store()
            .select(|state| state.posts.post(post_id).cloned())
            .ok_or_else(|| DomainError::PostNotFound(post_id.to_string()).into())
    }

    /// The post itself, or for a combined activity post each cached post it aggregates
    fn constituents(&self, post: &Post) -> Vec<Post> {
        if !post.is_combined_activity() {
            return vec![post.clone()];
        }
        self.ctx.store().select(|state| {
            post.system_post_ids
                .iter()
                .filter_map(|id| state.posts.post(id).cloned())
                .collect()
        })
    }

    fn queue_authors(&self, list: &PostList) {
        self.ctx
            .queue_statuses(list.posts.values().map(|p| p.user_id.clone()));
    }
}
