//! Upstream content sources
//!
//! - [`leetcode`] - LeetCode question of the day (GraphQL)
//! - [`fallback`] - External helper used when the GraphQL API blocks us
//! - [`advent`] - Advent of Code puzzle of the day (HTML, December only)

pub mod advent;
pub mod fallback;
pub mod leetcode;

pub use advent::{extract_title, AdventSource, SeasonWindow, SeasonalError};
pub use fallback::FallbackFetcher;
pub use leetcode::{parse_daily_response, LeetCodeSource};
