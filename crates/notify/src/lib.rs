//! Outbound notification channels.
//!
//! A channel receives a fully formatted [`Message`] and delivers it
//! best-effort. Delivery returns an explicit result so callers can log
//! failures, but nothing downstream of the caller depends on it; a lost
//! notification is lost.

pub mod channel;
pub mod discord;

pub use channel::{Message, MockChannel, NotifyChannel, NotifyError};
pub use discord::DiscordWebhook;
