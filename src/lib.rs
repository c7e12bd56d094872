//! daily-leetcode-bot - Scheduled daily coding practice notifications
//!
//! On every trigger the bot gathers the LeetCode question of the day, a
//! random Grind75 practice set and, in December, the Advent of Code puzzle,
//! then posts the result to Zulip and optionally a Slack webhook.
//!
//! # Architecture
//!
//! - [`config`] - Configuration management and settings
//! - [`sources`] - LeetCode, fallback helper and Advent of Code adapters
//! - [`practice`] - Grind75 practice table and picker
//! - [`composer`] - Markdown and Block Kit rendering
//! - [`notifications`] - Delivery channels and fan-out
//! - [`pipeline`] - One run, end to end
//! - [`scheduler`] - Cron trigger
//! - [`server`] - Status endpoint
//! - [`models`] - Core data structures and types
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use daily_leetcode_bot::config::Config;
//! use daily_leetcode_bot::pipeline::DailyBot;
//! use rand::SeedableRng;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     config.validate()?;
//!
//!     let bot = DailyBot::without_delivery(&config)?;
//!     let mut rng = rand_chacha::ChaCha8Rng::from_entropy();
//!     let message = bot.preview(chrono::Utc::now(), &mut rng).await?;
//!     println!("{}", message.markdown);
//!     Ok(())
//! }
//! ```

pub mod composer;
pub mod config;
pub mod error;
pub mod models;
pub mod notifications;
pub mod pipeline;
pub mod practice;
pub mod scheduler;
pub mod server;
pub mod sources;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::composer::{compose, ComposedMessage};
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::models::{
        Availability, DailyProblem, Difficulty, NotificationPayload, PracticeSet, SeasonalPuzzle,
    };
    pub use crate::notifications::{Channel, DeliveryStatus, Notifier};
    pub use crate::pipeline::{DailyBot, RunReport};
    pub use crate::practice::PracticeTable;
    pub use crate::scheduler::{ScheduleTrigger, TriggerConfig};
}

// Direct re-exports for convenience
pub use models::{Availability, DailyProblem, Difficulty, NotificationPayload};
