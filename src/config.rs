// src/config.rs
use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use log::{info, warn};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ALPHA_VANTAGE_BASE_URL: &str = "https://www.alphavantage.co";
pub const DEFAULT_FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";
pub const DEFAULT_LINE_API_BASE_URL: &str = "https://api.line.me";
const DEFAULT_PORT: u16 = 3030;
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    AlphaVantage,
    Finnhub,
}

impl ProviderKind {
    fn api_key_var(self) -> &'static str {
        match self {
            ProviderKind::AlphaVantage => "ALPHA_VANTAGE_API_KEY",
            ProviderKind::Finnhub => "FINNHUB_API_KEY",
        }
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alpha_vantage" | "alphavantage" | "alpha-vantage" => Ok(ProviderKind::AlphaVantage),
            "finnhub" => Ok(ProviderKind::Finnhub),
            other => Err(anyhow!("unknown quote provider '{}'", other)),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProviderKind::AlphaVantage => f.write_str("alpha_vantage"),
            ProviderKind::Finnhub => f.write_str("finnhub"),
        }
    }
}

/// Cron trigger for running the notifier inside the server process.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub cron: String,
    pub timezone: Tz,
}

/// Process-wide settings, read once at startup and never mutated.
#[derive(Clone)]
pub struct Config {
    pub channel_access_token: String,
    pub recipient_id: String,
    pub provider: ProviderKind,
    pub quote_api_key: String,
    pub alpha_vantage_base_url: String,
    pub finnhub_base_url: String,
    pub line_api_base_url: String,
    pub http_timeout: Duration,
    pub port: u16,
    pub schedule: Option<Schedule>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any variable source; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| anyhow!("{} must be set", key));

        let provider = match get("QUOTE_PROVIDER") {
            Some(raw) => raw.parse::<ProviderKind>().context("invalid QUOTE_PROVIDER")?,
            None => ProviderKind::AlphaVantage,
        };

        let port = match get("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("PORT must be a number, got '{}'", raw))?,
            None => {
                warn!("$PORT not set, defaulting to {}", DEFAULT_PORT);
                DEFAULT_PORT
            }
        };

        let timeout_secs = match get("HTTP_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("HTTP_TIMEOUT_SECS must be a number, got '{}'", raw))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let schedule = match get("NOTIFY_SCHEDULE") {
            Some(cron) => {
                let tz_name = get("NOTIFY_TIMEZONE").unwrap_or_else(|| DEFAULT_TIMEZONE.to_string());
                let timezone = tz_name
                    .trim()
                    .parse::<Tz>()
                    .map_err(|e| anyhow!("invalid NOTIFY_TIMEZONE '{}': {}", tz_name, e))?;
                Some(Schedule {
                    cron: cron.trim().to_string(),
                    timezone,
                })
            }
            None => None,
        };

        let config = Config {
            channel_access_token: require("LINE_CHANNEL_ACCESS_TOKEN")?,
            recipient_id: require("LINE_USER_ID")?,
            provider,
            quote_api_key: require(provider.api_key_var())?,
            alpha_vantage_base_url: get("ALPHA_VANTAGE_BASE_URL")
                .unwrap_or_else(|| DEFAULT_ALPHA_VANTAGE_BASE_URL.to_string()),
            finnhub_base_url: get("FINNHUB_BASE_URL")
                .unwrap_or_else(|| DEFAULT_FINNHUB_BASE_URL.to_string()),
            line_api_base_url: get("LINE_API_BASE_URL")
                .unwrap_or_else(|| DEFAULT_LINE_API_BASE_URL.to_string()),
            http_timeout: Duration::from_secs(timeout_secs),
            port,
            schedule,
        };

        info!("Configuration loaded: {:?}", config);
        Ok(config)
    }
}

// Credentials never reach the logs.
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Config")
            .field("channel_access_token", &"<redacted>")
            .field("recipient_id", &self.recipient_id)
            .field("provider", &self.provider)
            .field("quote_api_key", &"<redacted>")
            .field("alpha_vantage_base_url", &self.alpha_vantage_base_url)
            .field("finnhub_base_url", &self.finnhub_base_url)
            .field("line_api_base_url", &self.line_api_base_url)
            .field("http_timeout", &self.http_timeout)
            .field("port", &self.port)
            .field("schedule", &self.schedule)
            .finish()
    }
}
