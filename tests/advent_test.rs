//! Integration tests for the Advent of Code source using wiremock

mod common;

use chrono::{TimeZone, Utc};
use daily_leetcode_bot::config::AdventConfig;
use daily_leetcode_bot::error::{FetchError, ParseError, SeasonalError};
use daily_leetcode_bot::models::Availability;
use daily_leetcode_bot::sources::AdventSource;
use std::time::Duration;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn source_for(server: &MockServer, enabled: bool) -> AdventSource {
    let config = AdventConfig {
        base_url: server.uri(),
        enabled,
    };
    AdventSource::new(&config, Duration::from_secs(5)).unwrap()
}

/// Test that outside the window no request is made
#[tokio::test]
async fn test_outside_window_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let source = source_for(&server, true);
    for now in [
        Utc.with_ymd_and_hms(2022, 11, 30, 12, 0, 0).unwrap(),
        // 00:00 Dec 26 at UTC-05:00
        Utc.with_ymd_and_hms(2022, 12, 26, 5, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2023, 7, 4, 12, 0, 0).unwrap(),
    ] {
        let puzzle = source.fetch_for(&now).await.unwrap();
        assert!(matches!(puzzle, Availability::Absent));
    }
}

/// Test that a disabled source behaves as outside the window
#[tokio::test]
async fn test_disabled_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let now = Utc.with_ymd_and_hms(2022, 12, 17, 12, 0, 0).unwrap();
    let puzzle = source_for(&server, false).fetch_for(&now).await.unwrap();
    assert!(matches!(puzzle, Availability::Absent));
}

/// Test fetching and title extraction inside the window
#[tokio::test]
async fn test_fetch_puzzle_in_window() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2022/day/17"))
        .respond_with(ResponseTemplate::new(200).set_body_string(common::puzzle_html("Day 17: Pyroclastic Flow")))
        .expect(1)
        .mount(&server)
        .await;

    let now = Utc.with_ymd_and_hms(2022, 12, 17, 12, 0, 0).unwrap();
    let puzzle = source_for(&server, true).fetch_for(&now).await.unwrap();

    let puzzle = puzzle.as_present().expect("puzzle should be present");
    assert_eq!(puzzle.title, "Day 17: Pyroclastic Flow");
    assert_eq!((puzzle.year, puzzle.day), (2022, 17));
    assert_eq!(puzzle.link, format!("{}/2022/day/17", server.uri()));
}

/// Test that the day comes from the anchor offset, not UTC
#[tokio::test]
async fn test_day_follows_anchor_offset() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2022/day/24"))
        .respond_with(ResponseTemplate::new(200).set_body_string(common::puzzle_html("Day 24: Blizzard Basin")))
        .expect(1)
        .mount(&server)
        .await;

    // Already Dec 25 in UTC, still Dec 24 at UTC-05:00
    let now = Utc.with_ymd_and_hms(2022, 12, 25, 2, 0, 0).unwrap();
    let puzzle = source_for(&server, true).fetch_for(&now).await.unwrap();
    assert_eq!(puzzle.as_present().map(|p| p.day), Some(24));
}

/// Test that a page without a title heading is an error
#[tokio::test]
async fn test_missing_title_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2022/day/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body><p>Please log in</p></body></html>"))
        .mount(&server)
        .await;

    let now = Utc.with_ymd_and_hms(2022, 12, 1, 12, 0, 0).unwrap();
    let result = source_for(&server, true).fetch_for(&now).await;
    assert!(matches!(
        result,
        Err(SeasonalError::Parse(ParseError::TitleNotFound))
    ));
}

/// Test that an unavailable page is an error
#[tokio::test]
async fn test_unavailable_page_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2022/day/25"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let now = Utc.with_ymd_and_hms(2022, 12, 25, 12, 0, 0).unwrap();
    let result = source_for(&server, true).fetch_for(&now).await;
    assert!(matches!(
        result,
        Err(SeasonalError::Fetch(FetchError::ServerError(404)))
    ));
}
