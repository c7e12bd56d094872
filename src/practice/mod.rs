//! Grind75 practice set selection
//!
//! The curated table maps a topic to a mapping of difficulty tier to a list
//! of problems. Each run picks one topic uniformly at random and then one
//! problem per tier of that topic.
//!
//! ```text
//! {
//!   "//comment": "...",          <- reserved, never selected
//!   "premium": { ... },          <- reserved, never selected
//!   "array": {
//!     "Easy":   [ { "title": "Two Sum", "link": "https://..." }, ... ],
//!     "Medium": [ ... ]
//!   }
//! }
//! ```

use rand::Rng;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::models::{Difficulty, PracticeProblem, PracticeSet};

/// Table bundled with the binary
const BUILTIN_TABLE: &str = include_str!("../../data/grind75.json");

/// Top-level keys that are never offered as topics
pub const RESERVED_KEYS: &[&str] = &["//comment", "premium"];

/// Errors raised while loading a practice table
///
/// These are configuration errors: a table that fails validation is
/// rejected at startup rather than at run time.
#[derive(Error, Debug)]
pub enum PracticeError {
    #[error("Failed to read practice table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid practice table JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Practice table has no selectable topics")]
    Empty,

    #[error("Topic '{topic}' is invalid: {reason}")]
    InvalidTopic { topic: String, reason: String },
}

type TopicTiers = BTreeMap<Difficulty, Vec<PracticeProblem>>;

/// Validated practice table
#[derive(Debug, Clone)]
pub struct PracticeTable {
    /// Sorted by topic name
    topics: Vec<(String, TopicTiers)>,
}

impl PracticeTable {
    /// Load the bundled Grind75 table
    pub fn builtin() -> Result<Self, PracticeError> {
        Self::from_json(BUILTIN_TABLE)
    }

    /// Load a table from a JSON file
    pub fn from_path(path: &Path) -> Result<Self, PracticeError> {
        let content = std::fs::read_to_string(path).map_err(|source| PracticeError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate a table, dropping reserved keys
    pub fn from_json(content: &str) -> Result<Self, PracticeError> {
        let raw: BTreeMap<String, serde_json::Value> = serde_json::from_str(content)?;

        let mut topics = Vec::new();
        for (topic, value) in raw {
            if is_reserved(&topic) {
                continue;
            }

            let named: BTreeMap<String, Vec<PracticeProblem>> = serde_json::from_value(value)
                .map_err(|e| PracticeError::InvalidTopic {
                    topic: topic.clone(),
                    reason: e.to_string(),
                })?;

            let mut tiers = TopicTiers::new();
            for (name, problems) in named {
                let difficulty = name.parse::<Difficulty>().map_err(|e| {
                    PracticeError::InvalidTopic {
                        topic: topic.clone(),
                        reason: e.to_string(),
                    }
                })?;
                tiers.insert(difficulty, problems);
            }

            if tiers.is_empty() {
                return Err(PracticeError::InvalidTopic {
                    topic,
                    reason: "no difficulty tiers".to_string(),
                });
            }

            if let Some((difficulty, _)) = tiers.iter().find(|(_, problems)| problems.is_empty()) {
                return Err(PracticeError::InvalidTopic {
                    reason: format!("tier {difficulty} has no problems"),
                    topic,
                });
            }

            topics.push((topic, tiers));
        }

        if topics.is_empty() {
            return Err(PracticeError::Empty);
        }

        Ok(Self { topics })
    }

    /// Selectable topic names
    pub fn topics(&self) -> impl Iterator<Item = &str> {
        self.topics.iter().map(|(name, _)| name.as_str())
    }

    /// Tiers defined for a topic
    pub fn tiers(&self, topic: &str) -> Option<Vec<Difficulty>> {
        self.topics
            .iter()
            .find(|(name, _)| name == topic)
            .map(|(_, tiers)| tiers.keys().copied().collect())
    }

    /// Number of selectable topics
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Pick a topic and one problem per tier
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> PracticeSet {
        // Non-empty by construction
        let (topic, tiers) = &self.topics[rng.gen_range(0..self.topics.len())];

        let entries = tiers
            .iter()
            .map(|(difficulty, problems)| {
                let choice = rng.gen_range(0..problems.len());
                (*difficulty, problems[choice].clone())
            })
            .collect();

        tracing::debug!(topic = %topic, "Picked practice topic");

        PracticeSet {
            topic: topic.clone(),
            entries,
        }
    }
}

fn is_reserved(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const SMALL_TABLE: &str = r#"{
        "//comment": "not a topic",
        "premium": { "Easy": [ { "title": "Meeting Rooms", "link": "https://leetcode.com/problems/meeting-rooms/" } ] },
        "array": {
            "Easy": [
                { "title": "Two Sum", "link": "https://leetcode.com/problems/two-sum/" },
                { "title": "Contains Duplicate", "link": "https://leetcode.com/problems/contains-duplicate/" }
            ],
            "Medium": [ { "title": "3Sum", "link": "https://leetcode.com/problems/3sum/" } ]
        },
        "trie": {
            "Medium": [ { "title": "Word Search", "link": "https://leetcode.com/problems/word-search/" } ]
        }
    }"#;

    #[test]
    fn test_builtin_table_loads() {
        let table = PracticeTable::builtin().unwrap();
        assert!(table.len() > 5);
        assert!(table.topics().all(|t| !RESERVED_KEYS.contains(&t)));
    }

    #[test]
    fn test_reserved_keys_excluded() {
        let table = PracticeTable::from_json(SMALL_TABLE).unwrap();
        let topics: Vec<_> = table.topics().collect();
        assert_eq!(topics, vec!["array", "trie"]);
    }

    #[test]
    fn test_only_reserved_keys_is_empty() {
        let result = PracticeTable::from_json(r#"{ "//comment": "x", "premium": {} }"#);
        assert!(matches!(result, Err(PracticeError::Empty)));
    }

    #[test]
    fn test_empty_tier_rejected() {
        let result = PracticeTable::from_json(r#"{ "array": { "Easy": [] } }"#);
        assert!(matches!(result, Err(PracticeError::InvalidTopic { .. })));
    }

    #[test]
    fn test_unknown_tier_rejected() {
        let result = PracticeTable::from_json(
            r#"{ "array": { "Trivial": [ { "title": "a", "link": "b" } ] } }"#,
        );
        assert!(matches!(result, Err(PracticeError::InvalidTopic { .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = PracticeTable::from_path(Path::new("/nonexistent/grind75.json"));
        assert!(matches!(result, Err(PracticeError::Io { .. })));
    }

    #[test]
    fn test_pick_is_deterministic_with_seed() {
        let table = PracticeTable::builtin().unwrap();
        let first = table.pick(&mut ChaCha8Rng::seed_from_u64(42));
        let second = table.pick(&mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(first, second);
    }

    #[test]
    fn test_pick_one_entry_per_tier() {
        let table = PracticeTable::from_json(SMALL_TABLE).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for _ in 0..50 {
            let set = table.pick(&mut rng);
            let expected = table.tiers(&set.topic).unwrap();
            let actual: Vec<_> = set.entries.keys().copied().collect();
            assert_eq!(actual, expected);
        }
    }

    proptest! {
        #[test]
        fn prop_never_picks_reserved_topic(seed in any::<u64>()) {
            let table = PracticeTable::builtin().unwrap();
            let set = table.pick(&mut ChaCha8Rng::seed_from_u64(seed));
            prop_assert!(!RESERVED_KEYS.contains(&set.topic.as_str()));
        }

        #[test]
        fn prop_entries_match_topic_tiers(seed in any::<u64>()) {
            let table = PracticeTable::builtin().unwrap();
            let set = table.pick(&mut ChaCha8Rng::seed_from_u64(seed));
            let tiers = table.tiers(&set.topic).unwrap();
            prop_assert_eq!(set.entries.len(), tiers.len());
            for tier in tiers {
                prop_assert!(set.entries.contains_key(&tier));
            }
        }
    }
}
