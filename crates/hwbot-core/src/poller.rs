//! The polling loop: fetch, validate, detect a status change, notify.
//!
//! All steps of one iteration are awaited in sequence; nothing overlaps. Any
//! failure is turned into a single chat message, deduplicated against the last
//! one sent, and the loop carries on after the usual interval.

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use serde_json::Value;
use tokio::time::sleep;

use crate::{
    config::Config,
    errors::Error,
    homework::parse_status,
    messaging::{notifier::Notifier, port::MessagingPort},
    ports::HomeworkApi,
    response::{check_response, current_date},
    Result,
};

pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// What has already been told to the chat.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoopState {
    pub last_status: String,
    pub last_error_message: String,
}

pub struct Poller {
    api: Arc<dyn HomeworkApi>,
    notifier: Notifier,
    interval: Duration,
    cursor: i64,
    state: LoopState,
}

impl Poller {
    pub fn new(cfg: &Config, api: Arc<dyn HomeworkApi>, messenger: Arc<dyn MessagingPort>) -> Self {
        Self {
            api,
            notifier: Notifier::new(messenger),
            interval: cfg.retry_interval,
            cursor: Utc::now().timestamp(),
            state: LoopState::default(),
        }
    }

    pub fn with_cursor(mut self, cursor: i64) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn state(&self) -> &LoopState {
        &self.state
    }

    /// Poll forever. Only process termination stops it.
    pub async fn run(mut self) {
        tracing::info!(
            "polling homework statuses every {}s starting from {}",
            self.interval.as_secs(),
            self.cursor
        );
        loop {
            let _ = self.tick().await;
            sleep(self.interval).await;
        }
    }

    /// One loop iteration without the trailing sleep.
    ///
    /// Failures are reported to the chat before being handed back.
    pub async fn tick(&mut self) -> Result<()> {
        match self.check_updates().await {
            Ok(()) => Ok(()),
            Err(e) => {
                self.report_failure(&e).await;
                Err(e)
            }
        }
    }

    async fn check_updates(&mut self) -> Result<()> {
        let response = self.api.homework_statuses(self.from_date()).await?;
        let homework = &check_response(&response)?[0];

        let status = homework.get("status").and_then(Value::as_str);
        if status != Some(self.state.last_status.as_str()) {
            let message = parse_status(homework)?;
            self.notifier.send(&message).await;
            self.state.last_status = status.unwrap_or_default().to_string();
        } else {
            tracing::debug!("homework status unchanged");
        }

        if let Some(date) = current_date(&response) {
            self.cursor = date;
        }
        Ok(())
    }

    async fn report_failure(&mut self, error: &Error) {
        let message = format!("{FAILURE_PREFIX}: {error}");
        tracing::error!("{message}");

        if message != self.state.last_error_message {
            self.notifier.send(&message).await;
            self.state.last_error_message = message;
        }
    }

    fn from_date(&self) -> i64 {
        if self.cursor == 0 {
            Utc::now().timestamp()
        } else {
            self.cursor
        }
    }
}
