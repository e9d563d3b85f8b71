//! IDToken CLI - Script runner
//!
//! This crate provides the `idtoken` binary and the script execution it
//! orchestrates.

pub mod commands;
pub mod context;
pub mod script;

pub use context::AppContext;
pub use script::{AccountRef, Fault, Script, Step};
