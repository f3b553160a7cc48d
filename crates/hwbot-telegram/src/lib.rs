//! Telegram adapter (teloxide).
//!
//! Implements the `hwbot-core` MessagingPort over the Telegram Bot API.

use async_trait::async_trait;

use teloxide::{
    prelude::*,
    types::{ChatId, Recipient},
};

use hwbot_core::{config::Config, errors::Error, messaging::port::MessagingPort, Result};

#[derive(Clone)]
pub struct TelegramMessenger {
    bot: Bot,
    chat: Recipient,
}

impl TelegramMessenger {
    pub fn new(bot: Bot, chat_id: &str) -> Self {
        Self {
            bot,
            chat: recipient(chat_id),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(Bot::new(cfg.telegram_token.clone()), &cfg.telegram_chat_id)
    }

    fn map_err(e: teloxide::RequestError) -> Error {
        Error::Delivery(format!("telegram error: {e}"))
    }
}

#[async_trait]
impl MessagingPort for TelegramMessenger {
    async fn send_text(&self, text: &str) -> Result<()> {
        self.bot
            .send_message(self.chat.clone(), text.to_string())
            .await
            .map_err(Self::map_err)?;
        Ok(())
    }
}

/// Numeric ids address users, groups and channels directly; anything else is
/// taken as a public `@channel` username.
fn recipient(chat_id: &str) -> Recipient {
    let chat_id = chat_id.trim();
    match chat_id.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) if chat_id.starts_with('@') => Recipient::ChannelUsername(chat_id.to_string()),
        Err(_) => Recipient::ChannelUsername(format!("@{chat_id}")),
    }
}
