//! # relay_core
//!
//! Assistant service client and the relay sequence for the assistant relay.

pub mod assistant;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
