//! Common utilities shared by the back-office crates.
//!
//! This crate provides:
//! - Unified error handling and the response envelope
//! - Configuration structures

pub mod config;
pub mod envelope;
pub mod error;

pub use config::*;
pub use envelope::Envelope;
pub use error::{AppError, AppResult, OptionExt};
