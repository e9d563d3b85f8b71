//! IDToken Event Bus - In-process event distribution
//!
//! Distributes ledger notifications to observers.
//!
//! - `Transfer` on every successful gated update (mint, burn, transfer)
//! - `Approval` on every explicit approval, never on allowance spends
//! - Async pub/sub with tokio broadcast channel
//! - `EventSubscriber` trait for custom handlers
//! - No retention in bus - late subscribers only see later events

pub mod channel;
pub mod error;
pub mod event;
pub mod subscriber;

pub use channel::EventBus;
pub use error::BusError;
pub use event::TokenEvent;
pub use subscriber::{EventLogger, EventSubscriber};
