// src/services/notifier.rs
use anyhow::{Context, Result};
use chrono::Utc;
use log::{error, info};
use std::sync::Arc;

use crate::config::Config;
use crate::models::{NotificationMessage, QuoteOutcome, QuoteResult};

use super::line::{LinePushClient, PushClient};
use super::quote_provider::{build_provider, http_client, QuoteProvider};

/// Fetches both quotes, formats the morning message and pushes it to one recipient.
pub struct NewsNotifier {
    provider: Arc<dyn QuoteProvider>,
    push: Arc<dyn PushClient>,
    recipient_id: String,
}

impl NewsNotifier {
    pub fn new(
        provider: Arc<dyn QuoteProvider>,
        push: Arc<dyn PushClient>,
        recipient_id: impl Into<String>,
    ) -> Self {
        NewsNotifier {
            provider,
            push,
            recipient_id: recipient_id.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let client = http_client(config.http_timeout)?;
        let provider = build_provider(config, client.clone());
        let push = Arc::new(LinePushClient::new(
            client,
            &config.line_api_base_url,
            &config.channel_access_token,
        ));
        Ok(Self::new(provider, push, config.recipient_id.clone()))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Both requests are in flight together; a failure in one never affects the other.
    pub async fn fetch_quotes(&self) -> QuoteResult {
        let (usd_jpy, sp500) = tokio::join!(
            self.provider.fetch_usd_jpy_rate(),
            self.provider.fetch_index_price()
        );

        let usd_jpy = QuoteOutcome::from_result(usd_jpy);
        if let QuoteOutcome::Failed(reason) = &usd_jpy {
            error!("Error fetching USD/JPY rate from {}: {}", self.provider_name(), reason);
        }
        let sp500 = QuoteOutcome::from_result(sp500);
        if let QuoteOutcome::Failed(reason) = &sp500 {
            error!("Error fetching S&P 500 data from {}: {}", self.provider_name(), reason);
        }

        QuoteResult { usd_jpy, sp500 }
    }

    pub async fn send_news(&self) -> Result<NotificationMessage> {
        info!("Preparing morning news at {}", Utc::now().to_rfc3339());

        let quotes = self.fetch_quotes().await;
        let message = NotificationMessage::from_quotes(&quotes);

        self.push
            .push_text(&self.recipient_id, &message.text)
            .await
            .context("failed to push message")?;

        info!("Morning news sent: USD/JPY {}, S&P 500 {}", quotes.usd_jpy, quotes.sp500);
        Ok(message)
    }
}
