use std::sync::Arc;

use anyhow::Context;

use hwbot_core::{config::Config, poller::Poller};
use hwbot_practicum::PracticumClient;
use hwbot_telegram::TelegramMessenger;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cfg = Config::load().context("missing required configuration")?;
    hwbot_core::logging::init("hwbot", &cfg.log_file)
        .with_context(|| format!("cannot open log file {}", cfg.log_file.display()))?;
    tracing::info!("environment variables checked");
    tracing::debug!("{cfg:?}");

    let api = Arc::new(PracticumClient::new(&cfg)?);
    let messenger = Arc::new(TelegramMessenger::from_config(&cfg));

    Poller::new(&cfg, api, messenger).run().await;

    Ok(())
}
