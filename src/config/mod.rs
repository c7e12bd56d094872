//! Configuration management for the daily bot
//!
//! Configuration is loaded once, either from `DLB_*` environment variables
//! or from a TOML file, validated, and then passed explicitly to every
//! component.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::scheduler::TriggerConfig;
use crate::sources::advent::DEFAULT_ADVENT_URL;
use crate::sources::leetcode::DEFAULT_GRAPHQL_URL;
use crate::utils::{is_http_url, split_command};

/// Browser user agent sent to LeetCode
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Trigger schedule
    pub schedule: ScheduleConfig,

    /// LeetCode question of the day source
    pub leetcode: LeetCodeConfig,

    /// Advent of Code source
    pub advent: AdventConfig,

    /// Practice table
    pub practice: PracticeConfig,

    /// Zulip destination
    pub zulip: ZulipConfig,

    /// Slack webhook destination
    pub slack: SlackConfig,

    /// HTTP and run timeouts
    pub http: HttpConfig,

    /// Status server
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Trigger schedule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Cron expression (5, 6 or 7 fields)
    pub cron: String,

    /// IANA timezone the expression and date label are evaluated in
    pub timezone: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron: String::from("0 0 * * *"),
            timezone: String::from("Etc/UTC"),
        }
    }
}

/// LeetCode source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeetCodeConfig {
    /// GraphQL endpoint
    pub graphql_url: String,

    /// User agent string
    pub user_agent: String,

    /// Helper command run when the API soft-blocks (empty disables it)
    pub fallback_command: Vec<String>,
}

impl Default for LeetCodeConfig {
    fn default() -> Self {
        Self {
            graphql_url: String::from(DEFAULT_GRAPHQL_URL),
            user_agent: String::from(DEFAULT_USER_AGENT),
            fallback_command: Vec::new(),
        }
    }
}

/// Advent of Code source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdventConfig {
    /// Site base URL
    pub base_url: String,

    /// Whether the seasonal step runs at all
    pub enabled: bool,
}

impl Default for AdventConfig {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_ADVENT_URL),
            enabled: true,
        }
    }
}

/// Practice table configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticeConfig {
    /// JSON table path; the bundled table is used when unset
    pub table_path: Option<PathBuf>,
}

/// Zulip destination configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZulipConfig {
    /// Bot email
    pub email: Option<String>,

    /// Bot API key
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Realm URL
    pub site: Option<String>,

    /// zuliprc file consulted when the credentials above are incomplete
    pub zuliprc: PathBuf,

    /// Send a direct message to this user instead of posting to the stream
    pub user_id: Option<u64>,

    /// Stream name
    pub stream: String,

    /// Stream topic
    pub topic: String,
}

impl Default for ZulipConfig {
    fn default() -> Self {
        Self {
            email: None,
            api_key: None,
            site: None,
            zuliprc: PathBuf::from("zuliprc"),
            user_id: None,
            stream: String::from("Daily LeetCode"),
            topic: String::from("Daily Leetcode Problem"),
        }
    }
}

/// Slack destination configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    /// Incoming webhook URL; Slack delivery is skipped when unset
    #[serde(skip_serializing)]
    pub webhook_url: Option<String>,
}

/// Timeout configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,

    /// Whole-run timeout in seconds
    pub run_timeout_secs: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            run_timeout_secs: 300,
        }
    }
}

/// Status server configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on; the server is disabled when unset
    pub port: Option<u16>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    env_string(key)
        .map(|v| v.parse::<T>().with_context(|| format!("Invalid value for {key}: {v}")))
        .transpose()
}

fn env_bool(key: &str) -> Option<bool> {
    env_string(key).map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables keep their defaults. Numeric variables that are set
    /// but unparseable are an error.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(cron) = env_string("DLB_CRON_SCHEDULE") {
            config.schedule.cron = cron;
        }
        if let Some(timezone) = env_string("DLB_TIMEZONE") {
            config.schedule.timezone = timezone;
        }

        if let Some(agent) = env_string("DLB_USER_AGENT") {
            config.leetcode.user_agent = agent;
        }
        if let Some(command) = env_string("DLB_FALLBACK_COMMAND") {
            config.leetcode.fallback_command = split_command(&command);
        }

        if let Some(enabled) = env_bool("DLB_ADVENT_ENABLED") {
            config.advent.enabled = enabled;
        }

        config.practice.table_path = env_string("DLB_PRACTICE_SET").map(PathBuf::from);

        config.zulip.email = env_string("ZULIP_USERNAME");
        config.zulip.api_key = env_string("ZULIP_API_KEY");
        config.zulip.site = env_string("ZULIP_REALM");
        if let Some(path) = env_string("DLB_ZULIPRC") {
            config.zulip.zuliprc = PathBuf::from(path);
        }
        config.zulip.user_id = env_parse("DLB_USER_ID")?;
        if let Some(stream) = env_string("DLB_STREAM") {
            config.zulip.stream = stream;
        }
        if let Some(topic) = env_string("DLB_TOPIC") {
            config.zulip.topic = topic;
        }

        config.slack.webhook_url = env_string("DLB_SLACK_WEBHOOK");

        if let Some(secs) = env_parse("DLB_REQUEST_TIMEOUT")? {
            config.http.request_timeout_secs = secs;
        }
        if let Some(secs) = env_parse("DLB_RUN_TIMEOUT")? {
            config.http.run_timeout_secs = secs;
        }

        config.server.port = env_parse("DLB_PORT")?;

        if let Some(level) = env_string("DLB_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(format) = env_string("DLB_LOG_FORMAT") {
            config.logging.format = format;
        }

        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.trigger_config()
            .validate()
            .context("Invalid schedule configuration")?;

        if self.http.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.http.run_timeout_secs == 0 {
            anyhow::bail!("run_timeout_secs must be greater than 0");
        }

        if let Some(url) = &self.slack.webhook_url {
            if !is_http_url(url) {
                anyhow::bail!("Slack webhook URL must be an http(s) URL: {url}");
            }
        }

        if !is_http_url(&self.leetcode.graphql_url) {
            anyhow::bail!("LeetCode GraphQL URL must be an http(s) URL");
        }

        if self.advent.enabled && !is_http_url(&self.advent.base_url) {
            anyhow::bail!("Advent base URL must be an http(s) URL");
        }

        if self.zulip.stream.is_empty() && self.zulip.user_id.is_none() {
            anyhow::bail!("Zulip stream must not be empty when no user id is set");
        }

        Ok(())
    }

    /// Trigger configuration derived from the schedule section
    #[must_use]
    pub fn trigger_config(&self) -> TriggerConfig {
        TriggerConfig::new(&self.schedule.cron, &self.schedule.timezone)
    }

    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.request_timeout_secs)
    }

    /// Get whole-run timeout as Duration
    #[must_use]
    pub fn run_timeout(&self) -> Duration {
        Duration::from_secs(self.http.run_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.schedule.cron, "0 0 * * *");
        assert_eq!(config.schedule.timezone, "Etc/UTC");
        assert_eq!(config.zulip.stream, "Daily LeetCode");
        assert_eq!(config.zulip.topic, "Daily Leetcode Problem");
        assert!(config.advent.enabled);
        assert!(config.slack.webhook_url.is_none());
    }

    #[test]
    fn test_invalid_timeouts() {
        let mut config = Config::default();
        config.http.request_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.http.run_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_schedule() {
        let mut config = Config::default();
        config.schedule.cron = "every day".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.schedule.timezone = "Mars/Olympus".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_webhook() {
        let mut config = Config::default();
        config.slack.webhook_url = Some("hooks.slack.com/x".to_string());
        assert!(config.validate().is_err());

        config.slack.webhook_url = Some("https://hooks.slack.com/services/T/B/X".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_timeout_conversion() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.run_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn test_toml_sections_default() {
        let config: Config = toml::from_str(
            r#"
            [schedule]
            cron = "0 30 9 * * Mon-Fri"

            [zulip]
            user_id = 42
            "#,
        )
        .unwrap();

        assert_eq!(config.schedule.cron, "0 30 9 * * Mon-Fri");
        assert_eq!(config.schedule.timezone, "Etc/UTC");
        assert_eq!(config.zulip.user_id, Some(42));
        assert_eq!(config.zulip.stream, "Daily LeetCode");
        assert_eq!(config.http.run_timeout_secs, 300);
    }

    #[test]
    fn test_serialized_config_hides_secrets() {
        let mut config = Config::default();
        config.zulip.api_key = Some("secret-key".to_string());
        config.slack.webhook_url = Some("https://hooks.slack.com/services/T/B/secret-hook".to_string());

        let rendered = toml::to_string(&config).unwrap();
        assert!(!rendered.contains("secret-key"));
        assert!(!rendered.contains("secret-hook"));
    }
}
