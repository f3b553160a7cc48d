use std::{env, path::PathBuf, time::Duration};

use crate::{errors::Error, Result};

pub const PRACTICUM_ENDPOINT: &str = "https://practicum.yandex.ru/api/user_api/homework_statuses/";
pub const RETRY_INTERVAL: Duration = Duration::from_secs(600);
pub const DEFAULT_LOG_FILE: &str = "homework_bot.log";

/// Typed configuration, loaded once at startup and immutable afterwards.
#[derive(Clone)]
pub struct Config {
    // Credentials
    pub practicum_token: String,
    pub telegram_token: String,
    pub telegram_chat_id: String,

    // Polling
    pub endpoint: String,
    pub retry_interval: Duration,

    // Logging
    pub log_file: PathBuf,
}

impl Config {
    /// Load from the process environment. A `.env` file in the working
    /// directory is honoured but never overrides variables already set.
    pub fn load() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key).and_then(non_empty).ok_or_else(|| {
                Error::Config(format!("{key} environment variable is required"))
            })
        };

        let practicum_token = required("YP_TOKEN")?;
        let telegram_token = required("TG_TOKEN")?;
        let telegram_chat_id = required("CHAT_ID")?;

        let log_file = lookup("LOG_FILE")
            .and_then(non_empty)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));

        Ok(Self {
            practicum_token,
            telegram_token,
            telegram_chat_id,
            endpoint: PRACTICUM_ENDPOINT.to_string(),
            retry_interval: RETRY_INTERVAL,
            log_file,
        })
    }
}

// Tokens must never end up in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("telegram_chat_id", &self.telegram_chat_id)
            .field("endpoint", &self.endpoint)
            .field("retry_interval", &self.retry_interval)
            .field("log_file", &self.log_file)
            .finish_non_exhaustive()
    }
}

fn non_empty(s: String) -> Option<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
