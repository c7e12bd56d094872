//! Advent of Code puzzle adapter
//!
//! Active only between Dec 1 and Dec 25 in US Eastern standard time, when a
//! new puzzle unlocks at midnight. Outside that window no request is made.

use chrono::{DateTime, Datelike, FixedOffset, TimeZone, Utc};
use reqwest::Client;
use scraper::{Html, Selector};
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

use crate::config::AdventConfig;
use crate::models::{Availability, SeasonalPuzzle};
use crate::utils::error::{FetchError, ParseError};
use crate::utils::normalize_whitespace;

/// Default puzzle site
pub const DEFAULT_ADVENT_URL: &str = "https://adventofcode.com";

/// Seconds west of UTC of the offset puzzles unlock in (UTC-05:00)
const UNLOCK_OFFSET_WEST_SECS: i32 = 5 * 3600;

/// Errors from the seasonal step; fatal to the current run only
#[derive(Error, Debug)]
pub enum SeasonalError {
    #[error("Failed to fetch puzzle page: {0}")]
    Fetch(#[from] FetchError),

    #[error("Failed to extract puzzle title: {0}")]
    Parse(#[from] ParseError),
}

/// Yearly date window in which the seasonal step runs
///
/// `start` is inclusive and `end_exclusive` exclusive, both `(month, day)`
/// within the same calendar year, evaluated at `offset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonWindow {
    pub start: (u32, u32),
    pub end_exclusive: (u32, u32),
    pub offset: FixedOffset,
}

impl Default for SeasonWindow {
    fn default() -> Self {
        Self {
            start: (12, 1),
            end_exclusive: (12, 26),
            offset: FixedOffset::west_opt(UNLOCK_OFFSET_WEST_SECS).expect("Invalid unlock offset"),
        }
    }
}

impl SeasonWindow {
    /// Year and day-of-month at the window's offset, if `now` is inside
    pub fn day_of<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Option<(i32, u32)> {
        let local = now.with_timezone(&self.offset);
        let month_day = (local.month(), local.day());

        if month_day >= self.start && month_day < self.end_exclusive {
            Some((local.year(), local.day()))
        } else {
            None
        }
    }
}

/// Extract the puzzle title from a puzzle page
///
/// Takes the first `<h2>`, strips the `---` decoration and collapses
/// whitespace.
///
/// # Errors
///
/// Returns `ParseError::TitleNotFound` when there is no heading or it is
/// empty once decoration is removed.
pub fn extract_title(html: &str) -> Result<String, ParseError> {
    static HEADING: OnceLock<Selector> = OnceLock::new();
    let selector = HEADING.get_or_init(|| Selector::parse("h2").expect("Invalid CSS selector: h2"));

    let document = Html::parse_document(html);
    let heading = document
        .select(selector)
        .next()
        .ok_or(ParseError::TitleNotFound)?;

    let raw: String = heading.text().collect();
    let title = normalize_whitespace(&raw.replace("---", ""));

    if title.is_empty() {
        return Err(ParseError::TitleNotFound);
    }

    Ok(title)
}

/// Advent of Code source
pub struct AdventSource {
    client: Client,
    base_url: String,
    window: SeasonWindow,
    enabled: bool,
}

impl AdventSource {
    /// Create a source from configuration
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &AdventConfig, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).gzip(true).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            window: SeasonWindow::default(),
            enabled: config.enabled,
        })
    }

    /// Override the date window
    pub fn with_window(mut self, window: SeasonWindow) -> Self {
        self.window = window;
        self
    }

    /// Puzzle URL for a given year and day
    pub fn puzzle_url(&self, year: i32, day: u32) -> String {
        format!("{}/{year}/day/{day}", self.base_url)
    }

    /// Fetch the puzzle for `now`, or `Absent` outside the window
    ///
    /// # Errors
    ///
    /// Returns `SeasonalError` if the page cannot be fetched or carries no
    /// title. Callers treat this as a failure of the current run.
    pub async fn fetch_for(
        &self,
        now: &DateTime<Utc>,
    ) -> Result<Availability<SeasonalPuzzle>, SeasonalError> {
        if !self.enabled {
            return Ok(Availability::Absent);
        }

        let Some((year, day)) = self.window.day_of(now) else {
            tracing::debug!("Outside the seasonal window, skipping puzzle lookup");
            return Ok(Availability::Absent);
        };

        let link = self.puzzle_url(year, day);
        tracing::info!(year, day, url = %link, "Fetching seasonal puzzle");

        let response = self.client.get(&link).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::ServerError(status.as_u16()).into());
        }

        let html = response.text().await.map_err(FetchError::Http)?;
        let title = extract_title(&html)?;

        Ok(Availability::Present(SeasonalPuzzle {
            title,
            year,
            day,
            link,
        }))
    }
}
