//! Database migrations.
//!
//! Each migration is a separate module following SeaORM conventions.
//! Migration names follow the pattern: m{YYYYMMDD}_{NNNNNN}_{description}

use sea_orm_migration::prelude::*;

mod m20240101_000001_create_accounts;
mod m20240101_000002_create_catalog;
mod m20240101_000003_create_tickets;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_accounts::Migration),
            Box::new(m20240101_000002_create_catalog::Migration),
            Box::new(m20240101_000003_create_tickets::Migration),
        ]
    }
}

/// Audit columns carried by every soft-deletable table.
#[derive(Iden)]
enum Audit {
    CreatedAt,
    CreatedBy,
    CreatedByRole,
    UpdatedAt,
    UpdatedBy,
    UpdatedByRole,
    DeletedAt,
    DeletedBy,
    DeletedByRole,
}

/// Append the created/updated/deleted triples to a table definition.
fn add_audit_columns(table: &mut TableCreateStatement) {
    table
        .col(
            ColumnDef::new(Audit::CreatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(Audit::CreatedBy).big_integer().null())
        .col(ColumnDef::new(Audit::CreatedByRole).string_len(20).null())
        .col(
            ColumnDef::new(Audit::UpdatedAt)
                .timestamp_with_time_zone()
                .not_null(),
        )
        .col(ColumnDef::new(Audit::UpdatedBy).big_integer().null())
        .col(ColumnDef::new(Audit::UpdatedByRole).string_len(20).null())
        .col(
            ColumnDef::new(Audit::DeletedAt)
                .timestamp_with_time_zone()
                .null(),
        )
        .col(ColumnDef::new(Audit::DeletedBy).big_integer().null())
        .col(ColumnDef::new(Audit::DeletedByRole).string_len(20).null());
}

/// Index on `deleted_at` for status filtering.
fn deleted_at_index<T: IntoTableRef>(name: &str, table: T) -> IndexCreateStatement {
    Index::create()
        .name(name)
        .table(table)
        .col(Audit::DeletedAt)
        .to_owned()
}
