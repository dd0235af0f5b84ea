//! Commands module - CLI command implementations.

pub mod lifecycle;
pub mod migrate;
