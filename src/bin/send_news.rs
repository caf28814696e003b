// src/bin/send_news.rs
use anyhow::Context;
use dotenv::dotenv;
use log::{error, info};
use news_notifier::config::Config;
use news_notifier::services::notifier::NewsNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().context("invalid configuration")?;
    let notifier = NewsNotifier::from_config(&config)?;

    info!("Sending morning news once via {}", notifier.provider_name());
    match notifier.send_news().await {
        Ok(message) => {
            info!("SUCCESS: message sent");
            println!("{}", message.text);
            Ok(())
        }
        Err(e) => {
            error!("ERROR: failed to send morning news: {:#}", e);
            Err(e)
        }
    }
}
