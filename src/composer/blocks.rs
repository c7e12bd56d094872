//! Slack Block Kit rendering
//!
//! Layout:
//!
//! ```text
//! header      date
//! context     `Daily Question` source link
//! rich_text   ordered list: (difficulty) <title link>  | apology + problemset link
//! context     `Grind75` source link + topic
//! rich_text   ordered list: one item per tier
//! context     `Daily Puzzle` source link          (seasonal only)
//! section     :marker:. <link|title>               (seasonal only)
//! ```

use rand::Rng;
use serde_json::{json, Value};

use super::{pick_marker, ADVENT_URL, DAILY_UNAVAILABLE, GRIND75_URL, PROBLEMSET_ALL_URL, PROBLEMSET_URL};
use crate::models::{Availability, NotificationPayload};

/// Slack emoji names used for the seasonal line
pub const MARKERS: &[&str] = &["snowflake", "snowman", "christmas_tree", "santa", "gift"];

/// Escape text for a mrkdwn field
fn escape_mrkdwn(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

fn context(text: String) -> Value {
    json!({
        "type": "context",
        "elements": [ { "type": "mrkdwn", "text": text } ]
    })
}

fn list_item(label: String, url: String, link_text: String) -> Value {
    json!({
        "type": "rich_text_section",
        "elements": [
            { "type": "text", "text": label },
            { "type": "link", "url": url, "text": link_text }
        ]
    })
}

fn ordered_list(items: Vec<Value>) -> Value {
    json!({
        "type": "rich_text",
        "elements": [
            { "type": "rich_text_list", "style": "ordered", "elements": items }
        ]
    })
}

/// Render the Slack webhook body
pub fn render<R: Rng + ?Sized>(payload: &NotificationPayload, rng: &mut R) -> Value {
    let daily_item = match &payload.daily {
        Availability::Present(problem) => list_item(
            format!("({}) ", problem.difficulty),
            problem.url(),
            problem.title.clone(),
        ),
        Availability::Absent => list_item(
            format!("{DAILY_UNAVAILABLE}\n"),
            PROBLEMSET_URL.to_string(),
            "Find the daily problem on the calendar here".to_string(),
        ),
    };

    let practice_items = payload
        .practice
        .entries
        .iter()
        .map(|(difficulty, problem)| {
            list_item(
                format!("({difficulty}) "),
                problem.link.clone(),
                problem.title.clone(),
            )
        })
        .collect();

    let mut blocks = vec![
        json!({
            "type": "header",
            "text": { "type": "plain_text", "text": payload.date_label }
        }),
        context(format!(
            "`Daily Question` at <{PROBLEMSET_ALL_URL}|leetcode.com>"
        )),
        ordered_list(vec![daily_item]),
        context(format!(
            "`Grind75` at <{GRIND75_URL}|techinterviewhandbook.org>\n   Topic is: {}",
            escape_mrkdwn(&payload.practice.topic_label())
        )),
        ordered_list(practice_items),
    ];

    if let Availability::Present(puzzle) = &payload.seasonal {
        let marker = pick_marker(MARKERS, rng);
        blocks.push(context(format!(
            "`Daily Puzzle` at <{}|adventofcode.com>",
            ADVENT_URL.trim_end_matches('/')
        )));
        blocks.push(json!({
            "type": "section",
            "text": {
                "type": "mrkdwn",
                "text": format!(":{marker}:. <{}|{}>", puzzle.link, escape_mrkdwn(&puzzle.title))
            }
        }));
    }

    json!({ "blocks": blocks })
}
