//! Common test utilities

#![allow(dead_code)]

use daily_leetcode_bot::config::Config;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::{json, Value};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use wiremock::MockServer;

/// GraphQL answer for a daily question
pub fn daily_response(title: &str, difficulty: &str, link: &str) -> Value {
    json!({
        "data": {
            "activeDailyCodingChallengeQuestion": {
                "date": "2022-12-17",
                "link": link,
                "question": {
                    "title": title,
                    "difficulty": difficulty,
                    "titleSlug": "two-sum",
                    "topicTags": [
                        { "name": "Array", "id": "VG9waWNUYWdOb2RlOjU=", "slug": "array" }
                    ]
                }
            }
        }
    })
}

/// Advent of Code puzzle page with the given title heading
pub fn puzzle_html(title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en-us">
<head><title>Day 17 - Advent of Code 2022</title></head>
<body>
<main>
<article class="day-desc"><h2>--- {title} ---</h2><p>The cave is shaped like a tall, narrow chamber.</p></article>
</main>
</body>
</html>"#
    )
}

/// Zulip success response
pub fn zulip_success() -> Value {
    json!({ "id": 42, "msg": "", "result": "success" })
}

/// Configuration with every upstream and destination on the mock server
pub fn mock_config(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.leetcode.graphql_url = format!("{}/graphql", server.uri());
    config.advent.base_url = server.uri();
    config.zulip.email = Some("daily-bot@example.zulipchat.com".to_string());
    config.zulip.api_key = Some("test-key".to_string());
    config.zulip.site = Some(server.uri());
    config.zulip.zuliprc = "/nonexistent/zuliprc".into();
    config.slack.webhook_url = Some(format!("{}/slack/webhook", server.uri()));
    config.http.request_timeout_secs = 5;
    config
}

/// Deterministic random source
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// In-memory log sink for asserting on emitted events
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's log events into a buffer until the guard drops
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
