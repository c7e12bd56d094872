//! Run scheduling
//!
//! - [`trigger`] - cron expression + timezone trigger loop
//! - [`error`] - scheduler errors

pub mod error;
pub mod trigger;

pub use error::{SchedulerError, SchedulerResult};
pub use trigger::{run_with_timeout, ScheduleTrigger, TriggerConfig, TriggerStatus};
