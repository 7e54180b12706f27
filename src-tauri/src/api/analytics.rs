use super::ApiClient;
use crate::models::{Analytics, ApiResponse};

#[derive(Debug, Clone)]
pub struct AnalyticsApi {
    api: ApiClient,
}

impl AnalyticsApi {
    pub fn new(api: ApiClient) -> Self {
        AnalyticsApi { api }
    }

    pub async fn get(&self) -> ApiResponse<Analytics> {
        self.api.get("/analytics").await
    }
}
