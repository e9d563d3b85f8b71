//! Event bus errors

use thiserror::Error;

/// Errors that can occur in the event bus
#[derive(Error, Debug)]
pub enum BusError {
    #[error("Subscriber '{name}' failed: {reason}")]
    SubscriberFailed { name: String, reason: String },

    #[error("Subscriber lagged behind, {0} events dropped")]
    Lagged(u64),
}
