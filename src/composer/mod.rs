//! Message composition
//!
//! Turns a [`NotificationPayload`] into the two formats the destinations
//! understand:
//!
//! - [`markdown`] - Zulip flavoured markdown text
//! - [`blocks`] - Slack Block Kit JSON
//!
//! Composition is pure: the only input besides the payload is the random
//! source used to pick the decorative seasonal marker.

pub mod blocks;
pub mod markdown;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::models::NotificationPayload;

/// Apology shown in place of the daily question when it is unavailable
pub const DAILY_UNAVAILABLE: &str = "There was a problem accessing the LeetCode API.";

/// LeetCode problem list, linked when the daily question is unavailable
pub const PROBLEMSET_URL: &str = "https://leetcode.com/problemset/";

/// LeetCode landing link for the daily question heading
pub const PROBLEMSET_ALL_URL: &str = "https://leetcode.com/problemset/all/";

/// Grind75 landing link for the practice heading
pub const GRIND75_URL: &str = "https://www.techinterviewhandbook.org/grind75?mode=all&grouping=topics";

/// Advent of Code landing link for the puzzle heading
pub const ADVENT_URL: &str = "https://adventofcode.com/";

/// Both renderings of one notification
#[derive(Debug, Clone, Serialize)]
pub struct ComposedMessage {
    /// Zulip markdown content
    pub markdown: String,
    /// Slack webhook body (`{"blocks": [...]}`)
    pub blocks: serde_json::Value,
}

/// Render a payload in both formats
pub fn compose<R: Rng + ?Sized>(payload: &NotificationPayload, rng: &mut R) -> ComposedMessage {
    ComposedMessage {
        markdown: markdown::render(payload, rng),
        blocks: blocks::render(payload, rng),
    }
}

/// Pick a marker name from a fixed, non-empty set
pub(crate) fn pick_marker<R: Rng + ?Sized>(markers: &'static [&'static str], rng: &mut R) -> &'static str {
    markers.choose(rng).copied().unwrap_or(markers[0])
}
