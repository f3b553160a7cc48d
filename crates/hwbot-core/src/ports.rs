use async_trait::async_trait;

use crate::Result;

/// Source of homework statuses (the Practicum API in production).
///
/// Implementations return the decoded JSON payload untouched; shape checks
/// belong to [`crate::response::check_response`].
#[async_trait]
pub trait HomeworkApi: Send + Sync {
    async fn homework_statuses(&self, from_date: i64) -> Result<serde_json::Value>;
}
