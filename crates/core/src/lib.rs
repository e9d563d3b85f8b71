//! IDToken Core - Domain types
//!
//! This crate contains the fundamental types used across IDToken:
//! - `Address`: Fixed-width 20-byte account identifier (the zero address is the null account)
//! - `Amount`: Unsigned token amount, with `Amount::MAX` doubling as the unlimited allowance
//! - `TokenMetadata`: Immutable display metadata (name, symbol, decimals)

pub mod address;
pub mod amount;
pub mod metadata;

pub use address::{Address, AddressError};
pub use amount::Amount;
pub use metadata::TokenMetadata;
