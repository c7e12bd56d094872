//! Delivery fan-out across registered channels

use futures::future::join_all;

use super::channels::webhook::{WebhookChannel, WebhookConfig};
use super::channels::zulip::{Recipient, ZulipChannel, ZulipCredentials};
use super::channels::{Channel, ChannelError, ChannelResult, DeliveryStatus};
use crate::composer::ComposedMessage;
use crate::config::Config;

/// Sends every composed message to each registered destination
#[derive(Default)]
pub struct Notifier {
    /// Registered delivery channels
    channels: Vec<Box<dyn Channel + Send + Sync>>,
}

impl Notifier {
    /// Create a notifier with no channels
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Register the destinations the configuration enables
    ///
    /// Zulip is registered when credentials resolve, the webhook only when
    /// a URL is configured. Having neither is a configuration error.
    pub fn from_config(config: &Config) -> ChannelResult<Self> {
        let mut notifier = Self::new();
        let timeout = config.request_timeout();

        match ZulipCredentials::resolve(&config.zulip)? {
            Some(credentials) => {
                let recipient = Recipient::from_config(&config.zulip);
                tracing::info!(site = %credentials.site, ?recipient, "Zulip delivery enabled");
                notifier.add_channel(Box::new(ZulipChannel::new(credentials, recipient, timeout)?));
            }
            None => tracing::warn!(
                zuliprc = %config.zulip.zuliprc.display(),
                "No Zulip credentials found, Zulip delivery disabled"
            ),
        }

        if let Some(url) = &config.slack.webhook_url {
            let webhook = WebhookConfig::new(url.clone()).with_timeout(timeout.as_secs().max(1));
            notifier.add_channel(Box::new(WebhookChannel::new(webhook)?));
            tracing::info!("Slack webhook delivery enabled");
        }

        if notifier.is_empty() {
            return Err(ChannelError::InvalidConfig(
                "no destination configured: set Zulip credentials or a Slack webhook URL"
                    .to_string(),
            ));
        }

        Ok(notifier)
    }

    /// Add a delivery channel
    pub fn add_channel(&mut self, channel: Box<dyn Channel + Send + Sync>) {
        tracing::debug!(channel = channel.name(), config = %channel.config(), "Registered delivery channel");
        self.channels.push(channel);
    }

    /// Names of the registered channels, in registration order
    pub fn channel_names(&self) -> Vec<&str> {
        self.channels.iter().map(|c| c.name()).collect()
    }

    /// Number of registered channels
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Whether no channel is registered
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Send to all channels concurrently
    ///
    /// A failing channel yields a failed status and never affects the
    /// others. Statuses are returned in registration order.
    pub async fn deliver(&self, message: &ComposedMessage) -> Vec<DeliveryStatus> {
        let sends = self.channels.iter().map(|channel| async move {
            match channel.send(message).await {
                Ok(status) => status,
                Err(e) => {
                    tracing::error!(channel = channel.name(), error = %e, "Failed to deliver message");
                    DeliveryStatus::failure(channel.name(), e.to_string())
                }
            }
        });

        let statuses = join_all(sends).await;
        for status in statuses.iter().filter(|s| !s.success) {
            tracing::warn!(%status, "Delivery failed");
        }
        statuses
    }
}
