//! Zulip messages API channel
//!
//! Credentials come from the configuration (environment) when all three
//! values are present, and from a `zuliprc` file otherwise:
//!
//! ```text
//! [api]
//! email=daily-bot@example.zulipchat.com
//! key=0123456789abcdef
//! site=https://example.zulipchat.com
//! ```

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use super::{Channel, ChannelError, ChannelResult, DeliveryStatus};
use crate::composer::ComposedMessage;
use crate::config::ZulipConfig;
use crate::utils::{is_http_url, truncate_text};

/// Bot credentials for the Zulip API
#[derive(Clone, Serialize, Deserialize)]
pub struct ZulipCredentials {
    pub email: String,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub site: String,
}

impl std::fmt::Debug for ZulipCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZulipCredentials")
            .field("email", &self.email)
            .field("api_key", &"<redacted>")
            .field("site", &self.site)
            .finish()
    }
}

impl ZulipCredentials {
    /// Build from explicit values, if all are set
    pub fn from_values(
        email: Option<&str>,
        api_key: Option<&str>,
        site: Option<&str>,
    ) -> Option<Self> {
        Some(Self {
            email: email?.to_string(),
            api_key: api_key?.to_string(),
            site: site?.trim_end_matches('/').to_string(),
        })
    }

    /// Parse the `[api]` section of zuliprc content
    pub fn parse_zuliprc(content: &str) -> ChannelResult<Self> {
        let mut in_api = false;
        let (mut email, mut key, mut site) = (None, None, None);

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if line.starts_with('[') && line.ends_with(']') {
                in_api = line[1..line.len() - 1].trim().eq_ignore_ascii_case("api");
                continue;
            }
            if !in_api {
                continue;
            }
            if let Some((name, value)) = line.split_once('=') {
                let value = value.trim().to_string();
                match name.trim() {
                    "email" => email = Some(value),
                    "key" => key = Some(value),
                    "site" => site = Some(value),
                    _ => {}
                }
            }
        }

        Self::from_values(email.as_deref(), key.as_deref(), site.as_deref()).ok_or_else(|| {
            ChannelError::Credentials("zuliprc [api] section needs email, key and site".to_string())
        })
    }

    /// Read a zuliprc file
    pub fn from_zuliprc(path: &Path) -> ChannelResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ChannelError::Credentials(format!("{}: {e}", path.display())))?;
        Self::parse_zuliprc(&content)
    }

    /// Resolve credentials from configuration, then the zuliprc file
    ///
    /// Returns `Ok(None)` when neither source provides credentials.
    pub fn resolve(config: &ZulipConfig) -> ChannelResult<Option<Self>> {
        if let Some(credentials) = Self::from_values(
            config.email.as_deref(),
            config.api_key.as_deref(),
            config.site.as_deref(),
        ) {
            return Ok(Some(credentials));
        }

        if config.zuliprc.exists() {
            return Self::from_zuliprc(&config.zuliprc).map(Some);
        }

        Ok(None)
    }
}

/// Where the message goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recipient {
    /// Topic in a stream
    Stream { stream: String, topic: String },
    /// Direct message to one user
    Direct { user_id: u64 },
}

impl Recipient {
    /// Direct message when a user id is configured, stream post otherwise
    pub fn from_config(config: &ZulipConfig) -> Self {
        match config.user_id {
            Some(user_id) => Self::Direct { user_id },
            None => Self::Stream {
                stream: config.stream.clone(),
                topic: config.topic.clone(),
            },
        }
    }

    /// Form fields for the messages endpoint, without `content`
    fn form_fields(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Stream { stream, topic } => vec![
                ("type", "stream".to_string()),
                ("to", stream.clone()),
                ("topic", topic.clone()),
            ],
            Self::Direct { user_id } => vec![
                ("type", "direct".to_string()),
                ("to", format!("[{user_id}]")),
            ],
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    result: String,
    #[serde(default)]
    msg: String,
}

/// Zulip channel
pub struct ZulipChannel {
    credentials: ZulipCredentials,
    recipient: Recipient,
    client: Client,
}

impl ZulipChannel {
    /// Create a new Zulip channel
    pub fn new(
        credentials: ZulipCredentials,
        recipient: Recipient,
        timeout: Duration,
    ) -> ChannelResult<Self> {
        if !is_http_url(&credentials.site) {
            return Err(ChannelError::InvalidConfig(format!(
                "Zulip site must be an http(s) URL: {}",
                credentials.site
            )));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChannelError::Other(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            credentials,
            recipient,
            client,
        })
    }

    /// Messages endpoint URL
    pub fn endpoint(&self) -> String {
        format!("{}/api/v1/messages", self.credentials.site)
    }

    /// Recipient of every message
    pub fn recipient(&self) -> &Recipient {
        &self.recipient
    }

    async fn post(&self, content: &str) -> ChannelResult<String> {
        let mut form = self.recipient.form_fields();
        form.push(("content", content.to_string()));

        let response = self
            .client
            .post(self.endpoint())
            .basic_auth(&self.credentials.email, Some(&self.credentials.api_key))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        let parsed: Option<ApiResponse> = serde_json::from_str(&body).ok();
        match parsed {
            Some(api) if status.is_success() && api.result == "success" => Ok(body),
            Some(api) => Err(ChannelError::Rejected(format!(
                "HTTP {status}: {} {}",
                api.result, api.msg
            ))),
            None => Err(ChannelError::Rejected(format!(
                "HTTP {status}: {}",
                truncate_text(&body, 300)
            ))),
        }
    }
}

#[async_trait]
impl Channel for ZulipChannel {
    fn name(&self) -> &str {
        "zulip"
    }

    async fn send(&self, message: &ComposedMessage) -> ChannelResult<DeliveryStatus> {
        tracing::debug!(content = %message.markdown, "Sending Zulip message");

        match self.post(&message.markdown).await {
            Ok(body) => {
                tracing::info!(response = %body, "Zulip message sent");
                Ok(DeliveryStatus::success_with_message(self.name(), body))
            }
            Err(e) => {
                tracing::error!(error = %e, "Error sending Zulip message");
                Ok(DeliveryStatus::failure(self.name(), e.to_string()))
            }
        }
    }

    fn config(&self) -> serde_json::Value {
        serde_json::json!({
            "name": self.name(),
            "site": self.credentials.site,
            "email": self.credentials.email,
            "recipient": self.recipient,
        })
    }
}
