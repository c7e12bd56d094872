//! Error types for the scheduler module

use std::fmt;

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler-specific errors
#[derive(Debug)]
pub enum SchedulerError {
    /// Cron expression could not be parsed
    InvalidCron {
        expression: String,
        reason: String,
    },

    /// Invalid timezone
    InvalidTimezone {
        tz: String,
    },

    /// Expression never fires again
    NoUpcomingRun {
        expression: String,
    },

    /// Run exceeded its timeout
    RunTimedOut {
        secs: u64,
    },

    /// Run finished with an error
    RunFailed {
        reason: String,
    },

    /// Trigger loop is already running
    AlreadyRunning,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidCron { expression, reason } => {
                write!(f, "Invalid cron expression '{}': {}", expression, reason)
            }
            Self::InvalidTimezone { tz } => {
                write!(f, "Invalid timezone: {}", tz)
            }
            Self::NoUpcomingRun { expression } => {
                write!(f, "Cron expression '{}' has no upcoming run", expression)
            }
            Self::RunTimedOut { secs } => {
                write!(f, "Run timed out after {}s", secs)
            }
            Self::RunFailed { reason } => {
                write!(f, "Run failed: {}", reason)
            }
            Self::AlreadyRunning => {
                write!(f, "Trigger is already running")
            }
        }
    }
}

impl std::error::Error for SchedulerError {}

impl SchedulerError {
    /// Create an invalid cron error
    pub fn invalid_cron(expression: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCron {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid timezone error
    pub fn invalid_timezone(tz: impl Into<String>) -> Self {
        Self::InvalidTimezone { tz: tz.into() }
    }

    /// Create a run failed error
    pub fn run_failed(reason: impl Into<String>) -> Self {
        Self::RunFailed {
            reason: reason.into(),
        }
    }

    /// Check if the error is recoverable
    ///
    /// Run-level failures only affect that run; the next trigger proceeds.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RunTimedOut { .. } | Self::RunFailed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_cron_error() {
        let err = SchedulerError::invalid_cron("every day", "expected 5 to 7 fields");
        assert!(err.to_string().contains("every day"));
        assert!(err.to_string().contains("5 to 7"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(SchedulerError::RunTimedOut { secs: 300 }.is_recoverable());
        assert!(SchedulerError::run_failed("seasonal fetch").is_recoverable());
        assert!(!SchedulerError::invalid_timezone("Mars/Olympus").is_recoverable());
    }
}
