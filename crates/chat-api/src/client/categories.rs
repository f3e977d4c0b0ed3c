//! Sidebar categories

use async_trait::async_trait;
use chat_core::{ApiResult, CategoryClient, ChannelCategory, OrderedChannelCategories};

use super::RestClient;

#[async_trait]
impl CategoryClient for RestClient {
    async fn get_channel_categories(
        &self,
        user_id: &str,
        team_id: &str,
    ) -> ApiResult<OrderedChannelCategories> {
        self.get(&self.routes.categories(user_id, team_id)).await
    }

    async fn create_channel_category(
        &self,
        user_id: &str,
        team_id: &str,
        category: &ChannelCategory,
    ) -> ApiResult<ChannelCategory> {
        let url = self.routes.categories(user_id, team_id);
        self.send_json(self.http.post(&url).json(category), &url)
            .await
    }

    async fn update_channel_categories(
        &self,
        user_id: &str,
        team_id: &str,
        categories: &[ChannelCategory],
    ) -> ApiResult<Vec<ChannelCategory>> {
        let url = self.routes.categories(user_id, team_id);
        self.send_json(self.http.put(&url).json(categories), &url)
            .await
    }

    async fn update_channel_category_order(
        &self,
        user_id: &str,
        team_id: &str,
        order: &[String],
    ) -> ApiResult<Vec<String>> {
        let url = self.routes.category_order(user_id, team_id);
        self.send_json(self.http.put(&url).json(order), &url).await
    }

    async fn delete_channel_category(
        &self,
        user_id: &str,
        team_id: &str,
        category_id: &str,
    ) -> ApiResult<()> {
        let url = self.routes.category(user_id, team_id, category_id);
        self.send_empty(self.http.delete(&url), &url).await
    }
}
