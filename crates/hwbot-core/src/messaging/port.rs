use async_trait::async_trait;

use crate::Result;

/// Outbound messenger bound to a single destination chat.
///
/// Telegram is the only implementation; tests use in-memory fakes.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    /// Deliver plain text (no markup) to the configured destination.
    async fn send_text(&self, text: &str) -> Result<()>;
}
