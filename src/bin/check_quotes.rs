// src/bin/check_quotes.rs
use anyhow::Context;
use dotenv::dotenv;
use log::info;
use news_notifier::config::Config;
use news_notifier::models::QuoteOutcome;
use news_notifier::services::notifier::NewsNotifier;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env().context("invalid configuration")?;
    let notifier = NewsNotifier::from_config(&config)?;

    info!("Testing {} quote fetching...", notifier.provider_name());
    let quotes = notifier.fetch_quotes().await;

    for (label, outcome) in [("USD/JPY", &quotes.usd_jpy), ("S&P 500", &quotes.sp500)] {
        match outcome {
            QuoteOutcome::Fetched(value) => println!("{:<8} {}", label, value),
            QuoteOutcome::Failed(reason) => println!("{:<8} FAILED: {}", label, reason),
        }
    }

    Ok(())
}
