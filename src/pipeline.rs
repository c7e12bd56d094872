//! One run of the daily bot
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐   ┌──────────┐   ┌──────────┐
//! │ Daily        │──▶│ Practice     │──▶│ Seasonal     │──▶│ Compose  │──▶│ Deliver  │
//! │ question     │   │ set pick     │   │ puzzle       │   │          │   │          │
//! └──────────────┘   └──────────────┘   └──────────────┘   └──────────┘   └──────────┘
//!   degrades to        infallible         fails the run      pure           per-channel
//!   Absent                                on error                          isolation
//! ```
//!
//! A run owns its payload; nothing is carried over between runs.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rand::Rng;
use serde::Serialize;

use crate::composer::{compose, ComposedMessage};
use crate::config::Config;
use crate::error::Result;
use crate::models::NotificationPayload;
use crate::notifications::{DeliveryStatus, Notifier};
use crate::practice::PracticeTable;
use crate::sources::{AdventSource, LeetCodeSource};

/// Day label shown at the top of every message, e.g. `Saturday, Dec 17`
pub fn date_label(now: &DateTime<Utc>, timezone: Tz) -> String {
    now.with_timezone(&timezone).format("%A, %b %-d").to_string()
}

/// Outcome of one run
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Instant the run was evaluated at
    pub at: DateTime<Utc>,
    /// Day label used in the message
    pub date_label: String,
    /// Whether the daily question was available
    pub daily_present: bool,
    /// Practice topic picked for the run
    pub practice_topic: String,
    /// Whether a seasonal puzzle was included
    pub seasonal_present: bool,
    /// Rendered message
    pub message: ComposedMessage,
    /// One status per destination; empty on a dry run
    pub deliveries: Vec<DeliveryStatus>,
}

impl RunReport {
    /// Number of destinations that accepted the message
    pub fn delivered_count(&self) -> usize {
        self.deliveries.iter().filter(|d| d.success).count()
    }
}

/// The daily bot: sources, practice table and destinations
pub struct DailyBot {
    leetcode: LeetCodeSource,
    practice: PracticeTable,
    advent: AdventSource,
    notifier: Notifier,
    timezone: Tz,
}

impl DailyBot {
    /// Assemble a bot from already-built parts
    pub fn new(
        leetcode: LeetCodeSource,
        practice: PracticeTable,
        advent: AdventSource,
        notifier: Notifier,
        timezone: Tz,
    ) -> Self {
        Self {
            leetcode,
            practice,
            advent,
            notifier,
            timezone,
        }
    }

    /// Build every component from configuration
    ///
    /// # Errors
    ///
    /// Fails on an unreadable or invalid practice table, an invalid
    /// timezone, or when no destination is configured.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut bot = Self::without_delivery(config)?;
        bot.notifier = Notifier::from_config(config)?;
        Ok(bot)
    }

    /// Build the sources only; used for previews that never deliver
    pub fn without_delivery(config: &Config) -> Result<Self> {
        let timeout = config.request_timeout();
        let timezone = config.trigger_config().parse_timezone()?;

        let practice = match &config.practice.table_path {
            Some(path) => PracticeTable::from_path(path)?,
            None => PracticeTable::builtin()?,
        };
        tracing::debug!(topics = practice.len(), "Practice table loaded");

        Ok(Self {
            leetcode: LeetCodeSource::new(&config.leetcode, timeout)?,
            practice,
            advent: AdventSource::new(&config.advent, timeout)?,
            notifier: Notifier::new(),
            timezone,
        })
    }

    /// Registered destinations
    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    /// Timezone for the date label
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Gather everything a message needs for the instant `now`
    ///
    /// Only the seasonal step can fail; the daily question degrades to
    /// `Absent` on its own.
    pub async fn build_payload<R: Rng + Send>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<NotificationPayload> {
        let date_label = date_label(&now, self.timezone);
        tracing::info!(date = %date_label, "Building daily notification");

        let daily = self.leetcode.fetch_daily().await;

        let practice = self.practice.pick(rng);
        tracing::info!(
            topic = %practice.topic,
            problems = practice.entries.len(),
            "Picked practice set"
        );

        let seasonal = self.advent.fetch_for(&now).await?;
        if let Some(puzzle) = seasonal.as_present() {
            tracing::info!(title = %puzzle.title, year = puzzle.year, day = puzzle.day, "Fetched seasonal puzzle");
        }

        Ok(NotificationPayload {
            date_label,
            daily,
            practice,
            seasonal,
        })
    }

    /// Compose the message for `now` without delivering it
    pub async fn preview<R: Rng + Send>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<ComposedMessage> {
        let payload = self.build_payload(now, rng).await?;
        Ok(compose(&payload, rng))
    }

    /// Execute one full run at the instant `now`
    ///
    /// With `dry_run` the message is composed but not delivered.
    pub async fn run_at<R: Rng + Send>(
        &self,
        now: DateTime<Utc>,
        rng: &mut R,
        dry_run: bool,
    ) -> Result<RunReport> {
        let payload = match self.build_payload(now, rng).await {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(
                    category = e.category().description(),
                    recoverable = e.is_recoverable(),
                    error = %e,
                    "Run aborted before delivery"
                );
                return Err(e);
            }
        };
        let message = compose(&payload, rng);

        tracing::debug!(markdown = %message.markdown, "Composed markdown message");
        tracing::debug!(blocks = %message.blocks, "Composed block message");

        let deliveries = if dry_run {
            tracing::info!("Dry run, skipping delivery");
            Vec::new()
        } else {
            self.notifier.deliver(&message).await
        };

        let report = RunReport {
            at: now,
            date_label: payload.date_label,
            daily_present: payload.daily.is_present(),
            practice_topic: payload.practice.topic,
            seasonal_present: payload.seasonal.is_present(),
            message,
            deliveries,
        };

        tracing::info!(
            date = %report.date_label,
            daily = report.daily_present,
            seasonal = report.seasonal_present,
            delivered = report.delivered_count(),
            destinations = report.deliveries.len(),
            "Run complete"
        );

        Ok(report)
    }
}
