//! Notification delivery
//!
//! ```text
//! ┌────────────────────────────┐
//! │          Notifier          │
//! │  - destination registry    │
//! │  - concurrent fan-out      │
//! │  - per-channel isolation   │
//! └────────────────────────────┘
//!               │
//!         ┌─────┴─────┐
//!         ▼           ▼
//!   ┌─────────┐ ┌─────────┐
//!   │  Zulip  │ │ Webhook │
//!   │ Channel │ │ Channel │
//!   └─────────┘ └─────────┘
//! ```
//!
//! Each channel makes a single attempt per run. Failures are reported as
//! [`DeliveryStatus`] values and logged, never raised.

pub mod channels;
mod manager;

// Re-exports
pub use channels::webhook::WebhookChannel;
pub use channels::zulip::{Recipient, ZulipChannel, ZulipCredentials};
pub use channels::{Channel, ChannelError, ChannelResult, DeliveryStatus};
pub use manager::Notifier;
