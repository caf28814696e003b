// src/services/line.rs
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::{error, info};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Delivers a text message to one recipient outside any request they made.
#[async_trait]
pub trait PushClient: Send + Sync {
    async fn push_text(&self, to: &str, text: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct TextMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct PushRequest<'a> {
    to: &'a str,
    messages: Vec<TextMessage<'a>>,
}

#[derive(Debug, Deserialize)]
struct LineErrorBody {
    message: String,
}

/// Client for the LINE Messaging API push endpoint.
pub struct LinePushClient {
    client: Client,
    base_url: String,
    channel_access_token: String,
}

impl LinePushClient {
    pub fn new(client: Client, base_url: &str, channel_access_token: &str) -> Self {
        LinePushClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            channel_access_token: channel_access_token.to_string(),
        }
    }
}

#[async_trait]
impl PushClient for LinePushClient {
    async fn push_text(&self, to: &str, text: &str) -> Result<()> {
        let url = format!("{}/v2/bot/message/push", self.base_url);
        let request = PushRequest {
            to,
            messages: vec![TextMessage { kind: "text", text }],
        };

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.channel_access_token)
            .json(&request)
            .send()
            .await
            .context("request to LINE failed")?;

        let status = response.status();
        if status.is_success() {
            info!("Pushed message to {} ({})", to, status);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        error!("LINE push rejected with {}: {}", status, body);
        let reason = serde_json::from_str::<LineErrorBody>(&body)
            .map(|b| b.message)
            .unwrap_or(body);
        Err(anyhow!("LINE push failed with status {}: {}", status, reason))
    }
}
