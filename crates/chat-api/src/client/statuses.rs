use async_trait::async_trait;
use chat_core::{ApiResult, StatusClient, UserStatus};

use super::RestClient;

#[async_trait]
impl StatusClient for RestClient {
    async fn get_statuses_by_ids(&self, user_ids: &[String]) -> ApiResult<Vec<UserStatus>> {
        let url = self.routes.statuses_by_ids();
        self.send_json(self.http.post(&url).json(user_ids), &url)
            .await
    }
}
