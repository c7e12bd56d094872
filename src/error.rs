//! Unified error handling for the daily bot
//!
//! This module gathers the domain-specific errors into a single `Error`
//! enum, while the domain errors stay usable on their own.
//!
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! ```rust,ignore
//! use daily_leetcode_bot::error::Error;
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         tracing::warn!(category = ?err.category(), "Run failed, waiting for next trigger: {err}");
//!     } else {
//!         tracing::error!(category = ?err.category(), "Run failed: {err}");
//!     }
//! }
//! ```

use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::notifications::ChannelError;
pub use crate::practice::PracticeError;
pub use crate::scheduler::error::SchedulerError;
pub use crate::sources::SeasonalError;
pub use crate::utils::error::{FetchError, ParseError};

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout)
    Network,
    /// Parsing and data extraction errors
    Parsing,
    /// Delivery errors
    Delivery,
    /// Configuration and validation errors
    Config,
    /// Scheduler and timing errors
    Scheduler,
}

impl ErrorCategory {
    /// Short description for the category
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "network error",
            Self::Parsing => "parsing error",
            Self::Delivery => "delivery error",
            Self::Config => "configuration error",
            Self::Scheduler => "scheduler error",
        }
    }
}

/// Unified error type for the daily bot
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP client for a source could not be built
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Seasonal puzzle step failed
    #[error("Seasonal puzzle error: {0}")]
    Seasonal(#[from] SeasonalError),

    /// Practice table errors
    #[error("Practice table error: {0}")]
    Practice(#[from] PracticeError),

    /// Scheduler and timing errors
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// Channel construction or delivery errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
}

impl Error {
    /// Check if this error is recoverable (a later run could succeed)
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Seasonal(SeasonalError::Fetch(e)) => e.is_recoverable(),
            Self::Seasonal(SeasonalError::Parse(_)) => false,
            Self::Practice(_) => false,
            Self::Scheduler(e) => e.is_recoverable(),
            Self::Channel(ChannelError::HttpError(_)) => true,
            Self::Channel(_) => false,
        }
    }

    /// Get the error category for handling strategies
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(_) | Self::Seasonal(SeasonalError::Fetch(_)) => ErrorCategory::Network,
            Self::Seasonal(SeasonalError::Parse(_)) => ErrorCategory::Parsing,
            Self::Channel(ChannelError::InvalidConfig(_) | ChannelError::Credentials(_)) => {
                ErrorCategory::Config
            }
            Self::Channel(_) => ErrorCategory::Delivery,
            Self::Practice(_) => ErrorCategory::Config,
            Self::Scheduler(SchedulerError::InvalidCron { .. } | SchedulerError::InvalidTimezone { .. }) => {
                ErrorCategory::Config
            }
            Self::Scheduler(_) => ErrorCategory::Scheduler,
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
