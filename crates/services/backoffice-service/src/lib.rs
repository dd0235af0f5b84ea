//! Dropshipping back-office service library.
//!
//! Soft-delete lifecycle with role-stamped audit, reference-code generation,
//! the dropshipper catalog views and the account/catalog/ticket services
//! built on top of them.

pub mod cli;
pub mod commands;
pub mod config;
pub mod infra;
pub mod lifecycle;
pub mod operations;
pub mod repository;
pub mod service;

pub use config::BackofficeConfig;
pub use operations::{EntityKind, Operator};
pub use service::Services;
