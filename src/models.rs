//! Core data structures shared by the sources, composer and notifier

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::utils::error::ParseError;

/// Base URL for LeetCode problem links
pub const LEETCODE_BASE_URL: &str = "https://leetcode.com";

/// Difficulty tier of a problem
///
/// Ordering is `Easy < Medium < Hard`, which is also the rendering order of
/// practice entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Get all tiers in rendering order
    pub fn all() -> [Self; 3] {
        [Self::Easy, Self::Medium, Self::Hard]
    }

    /// Get string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Self::Easy),
            "medium" => Ok(Self::Medium),
            "hard" => Ok(Self::Hard),
            _ => Err(ParseError::UnknownDifficulty(s.to_string())),
        }
    }
}

/// Topic tag attached to the daily problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicTag {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// The LeetCode question of the day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyProblem {
    pub title: String,
    pub difficulty: Difficulty,
    /// Path as returned by the API, e.g. `/problems/two-sum/`
    pub link: String,
    pub topic_tags: Vec<TopicTag>,
}

impl DailyProblem {
    /// Absolute URL of the problem
    pub fn url(&self) -> String {
        if self.link.starts_with("http://") || self.link.starts_with("https://") {
            self.link.clone()
        } else {
            format!("{LEETCODE_BASE_URL}{}", self.link)
        }
    }

    /// Comma separated tag names
    pub fn tag_names(&self) -> String {
        self.topic_tags
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// One entry of the curated practice table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeProblem {
    pub title: String,
    pub link: String,
}

/// Practice problems chosen for a run: one per difficulty tier of one topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PracticeSet {
    pub topic: String,
    pub entries: BTreeMap<Difficulty, PracticeProblem>,
}

impl PracticeSet {
    /// Topic with `_` and `-` separators shown as spaces
    pub fn topic_label(&self) -> String {
        self.topic.replace(['_', '-'], " ")
    }
}

/// Advent of Code puzzle of the day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonalPuzzle {
    pub title: String,
    pub year: i32,
    pub day: u32,
    pub link: String,
}

/// Outcome of an optional upstream lookup
///
/// Either the fully populated value or nothing; partial values are never
/// passed downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "lowercase")]
pub enum Availability<T> {
    Present(T),
    Absent,
}

impl<T> Availability<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn as_present(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent => None,
        }
    }
}

impl<T> From<Option<T>> for Availability<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Self::Present(v),
            None => Self::Absent,
        }
    }
}

/// Everything a run needs to render its messages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationPayload {
    /// Human readable date, e.g. `Saturday, Dec 17`
    pub date_label: String,
    pub daily: Availability<DailyProblem>,
    pub practice: PracticeSet,
    pub seasonal: Availability<SeasonalPuzzle>,
}
