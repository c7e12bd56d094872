//! Cron trigger
//!
//! Fires a job at every instant matched by a cron expression evaluated in
//! an IANA timezone. Each fire spawns the job as its own task under a
//! timeout; the loop computes the next fire time right away, so a slow run
//! never delays the following trigger.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::error::{SchedulerError, SchedulerResult};

// ============================================================================
// Trigger Configuration
// ============================================================================

/// Configuration for the schedule trigger
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Cron expression; 5-field classic form or the 6/7-field form with seconds
    pub cron: String,

    /// Timezone for the trigger (e.g., "America/New_York")
    pub timezone: String,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            cron: "0 0 * * *".to_string(),
            timezone: "Etc/UTC".to_string(),
        }
    }
}

impl TriggerConfig {
    /// Create a config from an expression and timezone name
    pub fn new(cron: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            cron: cron.into(),
            timezone: timezone.into(),
        }
    }

    /// Expression in the 6/7-field form with a leading seconds field
    ///
    /// The classic 5-field form numbers weekdays 0-7 with Sunday at both 0
    /// and 7, while the `cron` crate counts 1-7 from Sunday. Numeric
    /// weekdays of a 5-field expression are rewritten to day names.
    pub fn normalized_expression(&self) -> SchedulerResult<String> {
        let fields: Vec<&str> = self.cron.split_whitespace().collect();
        match fields.len() {
            5 => {
                let weekdays = classic_weekdays(fields[4])
                    .map_err(|reason| SchedulerError::invalid_cron(&self.cron, reason))?;
                Ok(format!("0 {} {weekdays}", fields[..4].join(" ")))
            }
            6 | 7 => Ok(fields.join(" ")),
            n => Err(SchedulerError::invalid_cron(
                &self.cron,
                format!("expected 5 to 7 fields, found {n}"),
            )),
        }
    }

    /// Parse the cron expression
    pub fn parse_schedule(&self) -> SchedulerResult<Schedule> {
        let expression = self.normalized_expression()?;
        Schedule::from_str(&expression)
            .map_err(|e| SchedulerError::invalid_cron(&self.cron, e.to_string()))
    }

    /// Parse the timezone
    pub fn parse_timezone(&self) -> SchedulerResult<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| SchedulerError::invalid_timezone(&self.timezone))
    }

    /// Validate the configuration
    pub fn validate(&self) -> SchedulerResult<()> {
        self.parse_schedule()?;
        self.parse_timezone()?;
        Ok(())
    }
}

const WEEKDAY_NAMES: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

/// Rewrite a classic day-of-week field into a list of day names
///
/// Fields without digits (`*`, `?`, `MON-FRI`) are already read the same
/// way by both dialects and pass through unchanged.
fn classic_weekdays(field: &str) -> Result<String, String> {
    if !field.bytes().any(|b| b.is_ascii_digit()) {
        return Ok(field.to_string());
    }

    let mut days = BTreeSet::new();
    for item in field.split(',') {
        let (base, step) = match item.split_once('/') {
            Some((base, step)) => {
                let step: u32 = step
                    .parse()
                    .map_err(|_| format!("invalid day-of-week step in '{item}'"))?;
                if step == 0 {
                    return Err(format!("day-of-week step must be positive in '{item}'"));
                }
                (base, Some(step))
            }
            None => (item, None),
        };

        let (first, last) = match base {
            "*" => (0, 6),
            _ => match base.split_once('-') {
                Some((from, to)) => (classic_weekday(from)?, classic_weekday(to)?),
                None => {
                    let day = classic_weekday(base)?;
                    (day, if step.is_some() { 6 } else { day })
                }
            },
        };
        if first > last {
            return Err(format!("day-of-week range '{base}' runs backwards"));
        }

        let step = step.unwrap_or(1) as usize;
        days.extend((first..=last).step_by(step).map(|day| day % 7));
    }

    Ok(days
        .into_iter()
        .map(|day| WEEKDAY_NAMES[day as usize])
        .collect::<Vec<_>>()
        .join(","))
}

/// Classic weekday number (0-7) or three-letter name
fn classic_weekday(token: &str) -> Result<u32, String> {
    if let Ok(day) = token.parse::<u32>() {
        return if day <= 7 {
            Ok(day)
        } else {
            Err(format!("day-of-week {day} is out of range 0-7"))
        };
    }

    WEEKDAY_NAMES
        .iter()
        .position(|name| name.eq_ignore_ascii_case(token))
        .map(|day| day as u32)
        .ok_or_else(|| format!("unknown day-of-week '{token}'"))
}

/// Run a future under a timeout, folding its error into [`SchedulerError`]
pub async fn run_with_timeout<T, E, Fut>(timeout: Duration, run: Fut) -> SchedulerResult<T>
where
    E: fmt::Display,
    Fut: Future<Output = Result<T, E>>,
{
    match tokio::time::timeout(timeout, run).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(e)) => Err(SchedulerError::run_failed(e.to_string())),
        Err(_) => Err(SchedulerError::RunTimedOut {
            secs: timeout.as_secs(),
        }),
    }
}

// ============================================================================
// Schedule Trigger
// ============================================================================

/// Cron-driven trigger loop
pub struct ScheduleTrigger {
    config: TriggerConfig,
    schedule: Schedule,
    timezone: Tz,
    run_timeout: Duration,
    shutdown: watch::Sender<bool>,
    is_running: Arc<AtomicBool>,
}

impl ScheduleTrigger {
    /// Create a new schedule trigger
    pub fn new(config: TriggerConfig, run_timeout: Duration) -> SchedulerResult<Self> {
        let schedule = config.parse_schedule()?;
        let timezone = config.parse_timezone()?;
        let (shutdown, _) = watch::channel(false);

        Ok(Self {
            config,
            schedule,
            timezone,
            run_timeout,
            shutdown,
            is_running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Configured timezone
    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Configured expression as given
    pub fn expression(&self) -> &str {
        &self.config.cron
    }

    /// First fire time strictly after `after`
    pub fn next_run_after(&self, after: &DateTime<Utc>) -> Option<DateTime<Utc>> {
        let local = after.with_timezone(&self.timezone);
        self.schedule
            .after(&local)
            .next()
            .map(|next| next.with_timezone(&Utc))
    }

    /// Next fire time from now
    pub fn next_run(&self) -> Option<DateTime<Utc>> {
        self.next_run_after(&Utc::now())
    }

    /// Calculate duration until the next fire time
    pub fn duration_until_next_run(&self) -> SchedulerResult<Duration> {
        let now = Utc::now();
        let next = self
            .next_run_after(&now)
            .ok_or_else(|| SchedulerError::NoUpcomingRun {
                expression: self.config.cron.clone(),
            })?;
        Ok((next - now).to_std().unwrap_or(Duration::ZERO))
    }

    /// Start the trigger loop (runs until stopped)
    ///
    /// `job` receives the scheduled fire instant.
    pub async fn start<F, Fut, E>(&self, job: F) -> SchedulerResult<()>
    where
        F: Fn(DateTime<Utc>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        if self.is_running.swap(true, Ordering::SeqCst) {
            return Err(SchedulerError::AlreadyRunning);
        }

        let job = Arc::new(job);
        let mut shutdown = self.shutdown.subscribe();
        let mut cursor = Utc::now();

        tracing::info!(
            cron = %self.config.cron,
            timezone = %self.timezone,
            "Trigger started"
        );

        let result = loop {
            if *shutdown.borrow_and_update() {
                break Ok(());
            }

            let Some(next) = self.next_run_after(&cursor) else {
                break Err(SchedulerError::NoUpcomingRun {
                    expression: self.config.cron.clone(),
                });
            };

            let wait = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);
            tracing::info!(
                next_run = %next.with_timezone(&self.timezone),
                wait_secs = wait.as_secs(),
                "Waiting for next run"
            );

            tokio::select! {
                _ = tokio::time::sleep(wait) => {
                    self.spawn_run(Arc::clone(&job), next);
                    cursor = next.max(Utc::now());
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break Ok(());
                    }
                }
            }
        };

        self.is_running.store(false, Ordering::SeqCst);
        tracing::info!("Trigger stopped");
        result
    }

    /// Stop the trigger loop
    ///
    /// Runs already in flight are left to finish.
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }

    /// Check if trigger is running
    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::SeqCst)
    }

    /// Get trigger status
    pub fn status(&self) -> TriggerStatus {
        TriggerStatus {
            is_running: self.is_running(),
            config: self.config.clone(),
            next_run: self.next_run(),
        }
    }

    fn spawn_run<F, Fut, E>(&self, job: Arc<F>, scheduled: DateTime<Utc>) -> JoinHandle<()>
    where
        F: Fn(DateTime<Utc>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: fmt::Display + Send + 'static,
    {
        let timeout = self.run_timeout;
        tokio::spawn(async move {
            tracing::info!(scheduled = %scheduled, "Run triggered");
            match run_with_timeout(timeout, job(scheduled)).await {
                Ok(()) => tracing::info!(scheduled = %scheduled, "Run finished"),
                Err(e) => tracing::error!(scheduled = %scheduled, error = %e, "Run did not complete"),
            }
        })
    }
}

/// Trigger status information
#[derive(Debug, Clone, Serialize)]
pub struct TriggerStatus {
    pub is_running: bool,
    pub config: TriggerConfig,
    pub next_run: Option<DateTime<Utc>>,
}

// ============================================================================
// Tests
// ============================================================================
