//! Incoming webhook channel
//!
//! Posts the Block Kit rendering of a message to a Slack-compatible
//! incoming webhook URL.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Channel, ChannelError, ChannelResult, DeliveryStatus};
use crate::composer::ComposedMessage;
use crate::utils::{is_http_url, truncate_text};

/// Webhook channel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookConfig {
    /// Webhook URL endpoint
    pub url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_timeout() -> u64 {
    10
}

impl WebhookConfig {
    /// Create a new webhook configuration
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout_secs: default_timeout(),
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.url.is_empty() {
            return Err("Webhook URL cannot be empty".to_string());
        }

        if !is_http_url(&self.url) {
            return Err("Webhook URL must be an http:// or https:// URL".to_string());
        }

        if self.timeout_secs == 0 {
            return Err("Timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}

/// Incoming webhook channel
pub struct WebhookChannel {
    config: WebhookConfig,
    client: Client,
}

impl WebhookChannel {
    /// Create a new webhook channel
    pub fn new(config: WebhookConfig) -> ChannelResult<Self> {
        config.validate().map_err(ChannelError::InvalidConfig)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ChannelError::Other(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create a simple webhook channel with just a URL
    pub fn from_url(url: impl Into<String>) -> ChannelResult<Self> {
        Self::new(WebhookConfig::new(url))
    }

    /// Get the webhook URL
    pub fn url(&self) -> &str {
        &self.config.url
    }

    async fn post(&self, body: &serde_json::Value) -> ChannelResult<String> {
        let response = self.client.post(&self.config.url).json(body).send().await?;
        let status = response.status();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response body".to_string());

        if status.is_success() {
            Ok(text)
        } else {
            Err(ChannelError::Rejected(format!(
                "HTTP {status}: {}",
                truncate_text(&text, 300)
            )))
        }
    }
}

#[async_trait]
impl Channel for WebhookChannel {
    fn name(&self) -> &str {
        "webhook"
    }

    async fn send(&self, message: &ComposedMessage) -> ChannelResult<DeliveryStatus> {
        tracing::debug!(body = %message.blocks, "Posting message to webhook");

        match self.post(&message.blocks).await {
            Ok(body) => {
                tracing::info!(response = %body, "Webhook delivered");
                Ok(DeliveryStatus::success_with_message(self.name(), body))
            }
            Err(e) => {
                tracing::error!(error = %e, "Error posting message to webhook");
                Ok(DeliveryStatus::failure(self.name(), e.to_string()))
            }
        }
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name(),
            "timeout_secs": self.config.timeout_secs,
        })
    }
}
