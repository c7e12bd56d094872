//! Tests for configuration loading

use daily_leetcode_bot::config::Config;
use serial_test::serial;
use std::io::Write;
use std::path::Path;

const VARS: &[&str] = &[
    "DLB_CRON_SCHEDULE",
    "DLB_TIMEZONE",
    "DLB_USER_ID",
    "DLB_STREAM",
    "DLB_TOPIC",
    "DLB_SLACK_WEBHOOK",
    "ZULIP_USERNAME",
    "ZULIP_API_KEY",
    "ZULIP_REALM",
    "DLB_ZULIPRC",
    "DLB_FALLBACK_COMMAND",
    "DLB_PRACTICE_SET",
    "DLB_ADVENT_ENABLED",
    "DLB_REQUEST_TIMEOUT",
    "DLB_RUN_TIMEOUT",
    "DLB_PORT",
    "DLB_LOG_LEVEL",
    "DLB_LOG_FORMAT",
];

fn clear_env() {
    for var in VARS {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_from_env_defaults() {
    clear_env();

    let config = Config::from_env().unwrap();
    assert_eq!(config.schedule.cron, "0 0 * * *");
    assert_eq!(config.schedule.timezone, "Etc/UTC");
    assert_eq!(config.zulip.stream, "Daily LeetCode");
    assert_eq!(config.zulip.topic, "Daily Leetcode Problem");
    assert!(config.zulip.user_id.is_none());
    assert!(config.slack.webhook_url.is_none());
    assert!(config.leetcode.fallback_command.is_empty());
    assert!(config.advent.enabled);
    assert!(config.server.port.is_none());
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_env();
    std::env::set_var("DLB_CRON_SCHEDULE", "0 9 * * Mon-Fri");
    std::env::set_var("DLB_TIMEZONE", "America/New_York");
    std::env::set_var("DLB_USER_ID", "123456");
    std::env::set_var("DLB_SLACK_WEBHOOK", "https://hooks.slack.com/services/T/B/X");
    std::env::set_var("DLB_FALLBACK_COMMAND", "python3 get_daily_question.py");
    std::env::set_var("DLB_ADVENT_ENABLED", "false");
    std::env::set_var("DLB_RUN_TIMEOUT", "60");
    std::env::set_var("DLB_PORT", "8080");

    let config = Config::from_env().unwrap();
    clear_env();

    assert_eq!(config.schedule.cron, "0 9 * * Mon-Fri");
    assert_eq!(config.schedule.timezone, "America/New_York");
    assert_eq!(config.zulip.user_id, Some(123456));
    assert_eq!(
        config.leetcode.fallback_command,
        vec!["python3".to_string(), "get_daily_question.py".to_string()]
    );
    assert!(!config.advent.enabled);
    assert_eq!(config.http.run_timeout_secs, 60);
    assert_eq!(config.server.port, Some(8080));
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_rejects_non_numeric_user_id() {
    clear_env();
    std::env::set_var("DLB_USER_ID", "not-a-number");

    let result = Config::from_env();
    clear_env();

    assert!(result.is_err());
}

#[test]
#[serial]
fn test_from_env_invalid_timezone_fails_validation() {
    clear_env();
    std::env::set_var("DLB_TIMEZONE", "Nowhere/Special");

    let config = Config::from_env().unwrap();
    clear_env();

    assert!(config.validate().is_err());
}

#[test]
fn test_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"
[schedule]
cron = "0 30 8 * * *"
timezone = "Europe/Berlin"

[slack]
webhook_url = "https://hooks.slack.com/services/T/B/X"
"#,
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.schedule.timezone, "Europe/Berlin");
    assert_eq!(
        config.slack.webhook_url.as_deref(),
        Some("https://hooks.slack.com/services/T/B/X")
    );
    assert_eq!(config.zulip.stream, "Daily LeetCode");
    assert!(config.validate().is_ok());
}

#[test]
fn test_example_config_is_valid() {
    let config = Config::from_file(Path::new("config.example.toml")).unwrap();
    assert!(config.validate().is_ok());
    assert_eq!(config.leetcode.fallback_command.len(), 2);
    // The example points at the helper shipped with the crate
    assert!(Path::new(&config.leetcode.fallback_command[1]).is_file());
}

#[test]
fn test_from_file_missing() {
    assert!(Config::from_file(Path::new("/nonexistent/config.toml")).is_err());
}
