// src/services/alpha_vantage.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::Client;
use serde_json::Value;

use crate::models::QuoteValue;

use super::quote_provider::QuoteProvider;

/// S&P 500 tracking ETF; the free tier has no direct index quote.
pub const INDEX_PROXY_SYMBOL: &str = "SPY";

const RATE_SECTION: &str = "Realtime Currency Exchange Rate";
const RATE_FIELD: &str = "5. Exchange Rate";
const QUOTE_SECTION: &str = "Global Quote";
const PRICE_FIELD: &str = "05. price";

// Alpha Vantage answers throttling and bad keys with HTTP 200 and one of these instead of data.
const NOTICE_FIELDS: [&str; 3] = ["Note", "Information", "Error Message"];

pub struct AlphaVantage {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantage {
    pub fn new(client: Client, base_url: &str, api_key: &str) -> Self {
        AlphaVantage {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    async fn query(&self, params: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}/query", self.base_url);
        let body = self
            .client
            .get(&url)
            .query(params)
            .query(&[("apikey", self.api_key.as_str())])
            .send()
            .await
            .context("request to Alpha Vantage failed")?
            .error_for_status()?
            .json::<Value>()
            .await
            .context("Alpha Vantage returned invalid JSON")?;
        Ok(body)
    }
}

#[async_trait]
impl QuoteProvider for AlphaVantage {
    fn name(&self) -> &'static str {
        "Alpha Vantage"
    }

    async fn fetch_usd_jpy_rate(&self) -> Result<QuoteValue> {
        info!("Fetching USD/JPY rate from Alpha Vantage");
        let body = self
            .query(&[
                ("function", "CURRENCY_EXCHANGE_RATE"),
                ("from_currency", "USD"),
                ("to_currency", "JPY"),
            ])
            .await?;
        let rate = extract_decimal(&body, RATE_SECTION, RATE_FIELD).map_err(|e| {
            error!("Alpha Vantage API response for Forex: {}", body);
            e
        })?;
        debug!("USD/JPY rate: {}", rate);
        Ok(QuoteValue::fixed(rate, 2))
    }

    async fn fetch_index_price(&self) -> Result<QuoteValue> {
        info!("Fetching {} quote from Alpha Vantage", INDEX_PROXY_SYMBOL);
        let body = self
            .query(&[("function", "GLOBAL_QUOTE"), ("symbol", INDEX_PROXY_SYMBOL)])
            .await?;
        let price = extract_decimal(&body, QUOTE_SECTION, PRICE_FIELD).map_err(|e| {
            error!("Alpha Vantage API response for S&P500: {}", body);
            e
        })?;
        debug!("{} price: {}", INDEX_PROXY_SYMBOL, price);
        Ok(QuoteValue::fixed(price, 2))
    }
}

/// Reads `body[section][field]`, which Alpha Vantage encodes as a decimal string.
fn extract_decimal(body: &Value, section: &str, field: &str) -> Result<f64> {
    let raw = match body.get(section).and_then(|s| s.get(field)) {
        Some(Value::String(raw)) => raw,
        Some(other) => return Err(anyhow!("'{}' is not a string: {}", field, other)),
        None => {
            return Err(match upstream_notice(body) {
                Some(notice) => anyhow!("Alpha Vantage: {}", notice),
                None => anyhow!("missing '{}' -> '{}' in response", section, field),
            })
        }
    };
    raw.trim()
        .parse::<f64>()
        .with_context(|| format!("'{}' is not a number: '{}'", field, raw))
}

fn upstream_notice(body: &Value) -> Option<&str> {
    NOTICE_FIELDS
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
}
