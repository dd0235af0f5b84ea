//! CLI module - command-line interface definitions.

pub mod args;

pub use args::{Cli, Commands, ListArgs, MigrateAction, MigrateArgs, RecordArgs};
