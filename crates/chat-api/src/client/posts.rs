//! Posts and reactions

use async_trait::async_trait;
use chat_core::{ApiResult, ChannelUnread, Post, PostClient, PostList, Reaction};
use serde_json::json;

use super::RestClient;

fn paging(page: u32, per_page: u32) -> [(&'static str, String); 2] {
    [("page", page.to_string()), ("per_page", per_page.to_string())]
}

#[async_trait]
impl PostClient for RestClient {
    async fn get_post(&self, post_id: &str) -> ApiResult<Post> {
        self.get(&self.routes.post(post_id)).await
    }

    async fn create_post(&self, post: &Post) -> ApiResult<Post> {
        let url = self.routes.posts();
        self.send_json(self.http.post(&url).json(post), &url).await
    }

    async fn patch_post(&self, post: &Post) -> ApiResult<Post> {
        let url = self.routes.post_patch(&post.id);
        let body = json!({ "message": post.message });
        self.send_json(self.http.put(&url).json(&body), &url).await
    }

    async fn delete_post(&self, post_id: &str) -> ApiResult<()> {
        let url = self.routes.post(post_id);
        self.send_empty(self.http.delete(&url), &url).await
    }

    async fn get_post_thread(&self, root_id: &str) -> ApiResult<PostList> {
        self.get(&self.routes.post_thread(root_id)).await
    }

    async fn get_posts(&self, channel_id: &str, page: u32, per_page: u32) -> ApiResult<PostList> {
        self.get_query(&self.routes.channel_posts(channel_id), &paging(page, per_page))
            .await
    }

    async fn get_posts_unread(
        &self,
        channel_id: &str,
        user_id: &str,
        limit_before: u32,
        limit_after: u32,
    ) -> ApiResult<PostList> {
        self.get_query(
            &self.routes.channel_posts_unread(user_id, channel_id),
            &[
                ("limit_before", limit_before.to_string()),
                ("limit_after", limit_after.to_string()),
            ],
        )
        .await
    }

    async fn get_posts_since(&self, channel_id: &str, since: i64) -> ApiResult<PostList> {
        self.get_query(
            &self.routes.channel_posts(channel_id),
            &[("since", since.to_string())],
        )
        .await
    }

    async fn get_posts_before(
        &self,
        channel_id: &str,
        post_id: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<PostList> {
        let [page, per_page] = paging(page, per_page);
        self.get_query(
            &self.routes.channel_posts(channel_id),
            &[("before", post_id.to_string()), page, per_page],
        )
        .await
    }

    async fn get_posts_after(
        &self,
        channel_id: &str,
        post_id: &str,
        page: u32,
        per_page: u32,
    ) -> ApiResult<PostList> {
        let [page, per_page] = paging(page, per_page);
        self.get_query(
            &self.routes.channel_posts(channel_id),
            &[("after", post_id.to_string()), page, per_page],
        )
        .await
    }

    async fn pin_post(&self, post_id: &str) -> ApiResult<()> {
        let url = self.routes.post_pin(post_id);
        self.send_empty(self.http.post(&url), &url).await
    }

    async fn unpin_post(&self, post_id: &str) -> ApiResult<()> {
        let url = self.routes.post_unpin(post_id);
        self.send_empty(self.http.post(&url), &url).await
    }

    async fn add_reaction(
        &self,
        user_id: &str,
        post_id: &str,
        emoji_name: &str,
    ) -> ApiResult<Reaction> {
        let url = self.routes.reactions();
        let body = json!({
            "user_id": user_id,
            "post_id": post_id,
            "emoji_name": emoji_name,
        });
        self.send_json(self.http.post(&url).json(&body), &url).await
    }

    async fn remove_reaction(&self, user_id: &str, post_id: &str, emoji_name: &str) -> ApiResult<()> {
        let url = self.routes.user_reaction(user_id, post_id, emoji_name);
        self.send_empty(self.http.delete(&url), &url).await
    }

    async fn get_reactions_for_post(&self, post_id: &str) -> ApiResult<Vec<Reaction>> {
        // The server answers null for a post without reactions
        let reactions: Option<Vec<Reaction>> =
            self.get(&self.routes.post_reactions(post_id)).await?;
        Ok(reactions.unwrap_or_default())
    }

    async fn set_post_unread(&self, user_id: &str, post_id: &str) -> ApiResult<ChannelUnread> {
        let url = self.routes.post_set_unread(user_id, post_id);
        let body = json!({ "collapsed_threads_supported": true });
        self.send_json(self.http.post(&url).json(&body), &url).await
    }
}
