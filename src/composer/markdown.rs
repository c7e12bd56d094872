//! Zulip markdown rendering

use rand::Rng;

use super::{pick_marker, ADVENT_URL, DAILY_UNAVAILABLE, GRIND75_URL, PROBLEMSET_ALL_URL, PROBLEMSET_URL};
use crate::models::{Availability, NotificationPayload};

/// Zulip emoji names used for the seasonal line
pub const MARKERS: &[&str] = &[
    "snowflake",
    "snowman",
    "holiday_tree",
    "santa",
    "cabin-with-snow",
    "gift",
];

/// Render the Zulip message body
pub fn render<R: Rng + ?Sized>(payload: &NotificationPayload, rng: &mut R) -> String {
    let mut message = String::new();

    message.push_str(&format!("{}\n", payload.date_label));
    message.push_str(&format!(
        "`Daily Question` at [leetcode.com]({PROBLEMSET_ALL_URL})\n"
    ));

    match &payload.daily {
        Availability::Present(problem) => {
            message.push_str(&format!(
                "1. ({}) [{}]({})\n",
                problem.difficulty,
                problem.title,
                problem.url()
            ));
        }
        Availability::Absent => {
            message.push_str(&format!("> {DAILY_UNAVAILABLE}\n"));
            message.push_str(&format!(
                "> Find the daily problem on the calendar [here]({PROBLEMSET_URL}).\n"
            ));
        }
    }

    message.push('\n');
    message.push_str(&format!(
        "`Grind75` at [techinterviewhandbook.org]({GRIND75_URL})\n"
    ));
    message.push_str(&format!("Topic is: {}\n", payload.practice.topic_label()));
    for (difficulty, problem) in &payload.practice.entries {
        message.push_str(&format!(
            "1. ({difficulty}) [{}]({})\n",
            problem.title, problem.link
        ));
    }

    if let Availability::Present(puzzle) = &payload.seasonal {
        let marker = pick_marker(MARKERS, rng);
        message.push('\n');
        message.push_str(&format!("`Daily Puzzle` at [adventofcode.com]({ADVENT_URL})\n"));
        message.push_str(&format!(":{marker}:. [{}]({})\n", puzzle.title, puzzle.link));
    }

    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::tests::sample_payload;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(5)
    }

    #[test]
    fn test_render_daily_line() {
        let text = render(&sample_payload(true, false), &mut rng());
        assert!(text.starts_with("Saturday, Dec 17\n"));
        assert!(text.contains("(Easy) [Two Sum](https://leetcode.com/problems/two-sum/)"));
        assert!(!text.contains(DAILY_UNAVAILABLE));
    }

    #[test]
    fn test_render_absent_daily() {
        let text = render(&sample_payload(false, false), &mut rng());
        assert!(text.contains(&format!("> {DAILY_UNAVAILABLE}")));
        assert!(text.contains("[here](https://leetcode.com/problemset/)"));
        assert!(!text.contains("Two Sum"));
    }

    #[test]
    fn test_render_practice_in_tier_order() {
        let text = render(&sample_payload(true, false), &mut rng());
        assert!(text.contains("Topic is: binary search\n"));

        let easy = text
            .find("1. (Easy) [Binary Search](https://leetcode.com/problems/binary-search/)")
            .unwrap();
        let medium = text.find("1. (Medium) [Search in Rotated Sorted Array]").unwrap();
        assert!(easy < medium);
    }

    #[test]
    fn test_render_seasonal_only_when_present() {
        let without = render(&sample_payload(true, false), &mut rng());
        assert!(!without.contains("Daily Puzzle"));

        let with = render(&sample_payload(true, true), &mut rng());
        assert!(with.contains("`Daily Puzzle` at [adventofcode.com](https://adventofcode.com/)"));

        let line = with
            .lines()
            .find(|l| l.contains("[Day 17: Pyroclastic Flow](https://adventofcode.com/2022/day/17)"))
            .unwrap();
        assert!(MARKERS.iter().any(|m| line.starts_with(&format!(":{m}:. "))));
    }
}
