//! CLI argument definitions.
//!
//! Uses clap derive macros for type-safe argument parsing.

use clap::{Args, Parser, Subcommand};

use domain::ListStatus;

use crate::operations::EntityKind;

/// Dropshipping back-office - migrations and operator lifecycle commands
#[derive(Parser, Debug)]
#[command(name = "backoffice")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Admin id recorded as the actor of lifecycle changes
    #[arg(long, global = true, env = "BACKOFFICE_ADMIN_ID", default_value_t = 1)]
    pub actor: i64,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run database migrations
    Migrate(MigrateArgs),

    /// Soft delete a record and its dependents
    Trash(RecordArgs),

    /// Restore a soft-deleted record and its dependents
    Restore(RecordArgs),

    /// Permanently delete a record
    Purge(RecordArgs),

    /// List records by status
    List(ListArgs),
}

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

/// Migration actions
#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset and re-run all migrations
    Fresh,
}

/// A single record of one entity kind
#[derive(Args, Debug)]
pub struct RecordArgs {
    #[arg(value_enum)]
    pub entity: EntityKind,

    /// Record id
    pub id: i64,
}

/// Arguments for the list command
#[derive(Args, Debug)]
pub struct ListArgs {
    #[arg(value_enum)]
    pub entity: EntityKind,

    /// active, inactive, deleted or notDeleted
    #[arg(short, long, default_value = "notDeleted", value_parser = parse_status)]
    pub status: ListStatus,
}

fn parse_status(value: &str) -> Result<ListStatus, String> {
    ListStatus::parse_optional(Some(value)).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trash_command() {
        let cli = Cli::try_parse_from(["backoffice", "trash", "dropshipper", "7"]).unwrap();
        match cli.command {
            Commands::Trash(args) => {
                assert_eq!(args.entity, EntityKind::Dropshipper);
                assert_eq!(args.id, 7);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(cli.actor, 1);
    }

    #[test]
    fn test_list_status_defaults_to_not_deleted() {
        let cli = Cli::try_parse_from(["backoffice", "list", "bank-account"]).unwrap();
        match cli.command {
            Commands::List(args) => assert_eq!(args.status, ListStatus::NotDeleted),
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let result = Cli::try_parse_from(["backoffice", "list", "product", "--status", "archived"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_migrate_actions() {
        let cli = Cli::try_parse_from(["backoffice", "migrate", "fresh"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Migrate(MigrateArgs {
                action: MigrateAction::Fresh
            })
        ));
    }
}
