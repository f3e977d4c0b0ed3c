//! User preferences

use async_trait::async_trait;
use chat_core::{ApiResult, Preference, PreferenceClient};

use super::RestClient;

#[async_trait]
impl PreferenceClient for RestClient {
    async fn save_preferences(&self, user_id: &str, preferences: &[Preference]) -> ApiResult<()> {
        let url = self.routes.preferences(user_id);
        self.send_empty(self.http.put(&url).json(preferences), &url)
            .await
    }
}
