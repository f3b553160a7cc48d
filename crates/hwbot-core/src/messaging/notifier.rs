use std::sync::Arc;

use crate::messaging::port::MessagingPort;

/// Best-effort sender: delivery failures are logged and swallowed so a flaky
/// messenger never stops the poll loop.
#[derive(Clone)]
pub struct Notifier {
    messenger: Arc<dyn MessagingPort>,
}

impl Notifier {
    pub fn new(messenger: Arc<dyn MessagingPort>) -> Self {
        Self { messenger }
    }

    /// Returns whether the message was delivered.
    pub async fn send(&self, text: &str) -> bool {
        match self.messenger.send_text(text).await {
            Ok(()) => {
                tracing::info!("message sent to chat");
                true
            }
            Err(e) => {
                tracing::error!("failed to send message: {e}");
                false
            }
        }
    }
}
