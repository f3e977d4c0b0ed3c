//! Channels and membership

use async_trait::async_trait;
use chat_core::{ApiResult, Channel, ChannelClient, ChannelMembership, ChannelStats};
use serde_json::json;

use super::RestClient;

#[async_trait]
impl ChannelClient for RestClient {
    async fn get_channel(&self, channel_id: &str) -> ApiResult<Channel> {
        self.get(&self.routes.channel(channel_id)).await
    }

    async fn add_to_channel(&self, user_id: &str, channel_id: &str) -> ApiResult<ChannelMembership> {
        let url = self.routes.channel_members(channel_id);
        let body = json!({ "user_id": user_id });
        self.send_json(self.http.post(&url).json(&body), &url).await
    }

    async fn remove_from_channel(&self, user_id: &str, channel_id: &str) -> ApiResult<()> {
        let url = self.routes.channel_member(channel_id, user_id);
        self.send_empty(self.http.delete(&url), &url).await
    }

    async fn get_channel_stats(&self, channel_id: &str) -> ApiResult<ChannelStats> {
        self.get(&self.routes.channel_stats(channel_id)).await
    }
}
