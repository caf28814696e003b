// src/services/quote_provider.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;

use crate::config::{Config, ProviderKind};
use crate::models::QuoteValue;

use super::alpha_vantage::AlphaVantage;
use super::finnhub::Finnhub;

/// An upstream market-data API able to supply both figures of the morning message.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch_usd_jpy_rate(&self) -> Result<QuoteValue>;
    async fn fetch_index_price(&self) -> Result<QuoteValue>;
}

pub fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(concat!("news_notifier/", env!("CARGO_PKG_VERSION")))
        .timeout(timeout)
        .build()
        .context("failed to build HTTP client")
}

pub fn build_provider(config: &Config, client: Client) -> Arc<dyn QuoteProvider> {
    info!("Using quote provider: {}", config.provider);
    match config.provider {
        ProviderKind::AlphaVantage => Arc::new(AlphaVantage::new(
            client,
            &config.alpha_vantage_base_url,
            &config.quote_api_key,
        )),
        ProviderKind::Finnhub => Arc::new(Finnhub::new(
            client,
            &config.finnhub_base_url,
            &config.quote_api_key,
        )),
    }
}
