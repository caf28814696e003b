// src/services/finnhub.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::models::QuoteValue;

use super::quote_provider::QuoteProvider;

pub const INDEX_SYMBOL: &str = "^GSPC";

/// Finnhub's free plan has no forex quotes, so the rate is a fixed stand-in.
pub const USD_JPY_PLACEHOLDER: f64 = 150.25;

#[derive(Debug, Deserialize)]
pub struct QuoteResponse {
    #[serde(rename = "c")]
    pub current_price: Option<f64>,
    #[serde(rename = "d")]
    pub change: Option<f64>,
    #[serde(rename = "dp")]
    pub percent_change: Option<f64>,
}

pub struct Finnhub {
    client: Client,
    base_url: String,
    api_key: String,
}

impl Finnhub {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        Finnhub {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub async fn quote(&self, symbol: &str) -> Result<QuoteResponse> {
        let url = format!("{}/quote", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("token", self.api_key.as_str())])
            .send()
            .await
            .context("request to Finnhub failed")?;

        info!("GET {}/quote?symbol={}: {}", self.base_url, symbol, response.status());

        let quote = response
            .error_for_status()?
            .json::<QuoteResponse>()
            .await
            .context("Finnhub returned an unexpected quote body")?;
        Ok(quote)
    }
}

#[async_trait]
impl QuoteProvider for Finnhub {
    fn name(&self) -> &'static str {
        "Finnhub"
    }

    async fn fetch_usd_jpy_rate(&self) -> Result<QuoteValue> {
        debug!("Finnhub has no USD/JPY feed, using placeholder {}", USD_JPY_PLACEHOLDER);
        Ok(QuoteValue::raw(USD_JPY_PLACEHOLDER))
    }

    async fn fetch_index_price(&self) -> Result<QuoteValue> {
        let quote = self.quote(INDEX_SYMBOL).await?;
        let price = current_price(&quote)?;
        if let (Some(change), Some(percent)) = (quote.change, quote.percent_change) {
            info!("{} at {} ({:+} / {:+.2}%)", INDEX_SYMBOL, price, change, percent);
        }
        Ok(QuoteValue::raw(price))
    }
}

// Unknown symbols come back as an all-zero quote rather than an error status.
fn current_price(quote: &QuoteResponse) -> Result<f64> {
    match quote.current_price {
        Some(price) if price > 0.0 => Ok(price),
        Some(_) => {
            warn!("Finnhub returned a zero price for {}", INDEX_SYMBOL);
            Err(anyhow!("no current price for {}", INDEX_SYMBOL))
        }
        None => Err(anyhow!("missing 'c' in Finnhub quote for {}", INDEX_SYMBOL)),
    }
}
