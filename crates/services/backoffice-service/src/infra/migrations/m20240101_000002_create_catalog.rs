//! Migration: Create the supplier catalog and dropshipper product tables.

use sea_orm_migration::prelude::*;

use super::{add_audit_columns, deleted_at_index};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut products = Table::create();
        products
            .table(Products::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Products::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Products::SupplierId).big_integer().not_null())
            .col(ColumnDef::new(Products::Name).string().not_null())
            .col(ColumnDef::new(Products::Description).text().null())
            .col(ColumnDef::new(Products::Sku).string_len(64).not_null())
            .col(ColumnDef::new(Products::Gallery).text().null())
            .col(
                ColumnDef::new(Products::Status)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_products_supplier")
                    .from(Products::Table, Products::SupplierId)
                    .to(Admins::Table, Admins::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        add_audit_columns(&mut products);
        manager.create_table(products).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_supplier_id")
                    .table(Products::Table)
                    .col(Products::SupplierId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(deleted_at_index("idx_products_deleted_at", Products::Table))
            .await?;

        // Variants are hard-deleted by reconciliation, so no audit trail
        manager
            .create_table(
                Table::create()
                    .table(ProductVariants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ProductVariants::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ProductVariants::ProductId).big_integer().not_null())
                    .col(ColumnDef::new(ProductVariants::Sku).string_len(64).not_null())
                    .col(ColumnDef::new(ProductVariants::Name).string().not_null())
                    .col(ColumnDef::new(ProductVariants::Price).big_integer().not_null())
                    .col(
                        ColumnDef::new(ProductVariants::Stock)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ProductVariants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ProductVariants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_product_variants_product")
                            .from(ProductVariants::Table, ProductVariants::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_product_variants_product_sku")
                    .table(ProductVariants::Table)
                    .col(ProductVariants::ProductId)
                    .col(ProductVariants::Sku)
                    .unique()
                    .to_owned(),
            )
            .await?;

        let mut dropshipper_products = Table::create();
        dropshipper_products
            .table(DropshipperProducts::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(DropshipperProducts::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(DropshipperProducts::DropshipperId)
                    .big_integer()
                    .not_null(),
            )
            .col(ColumnDef::new(DropshipperProducts::ProductId).big_integer().not_null())
            .col(ColumnDef::new(DropshipperProducts::SupplierId).big_integer().not_null())
            .col(
                ColumnDef::new(DropshipperProducts::Status)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_dropshipper_products_dropshipper")
                    .from(DropshipperProducts::Table, DropshipperProducts::DropshipperId)
                    .to(Admins::Table, Admins::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_dropshipper_products_product")
                    .from(DropshipperProducts::Table, DropshipperProducts::ProductId)
                    .to(Products::Table, Products::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        add_audit_columns(&mut dropshipper_products);
        manager.create_table(dropshipper_products).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dropshipper_products_owner_product")
                    .table(DropshipperProducts::Table)
                    .col(DropshipperProducts::DropshipperId)
                    .col(DropshipperProducts::ProductId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(deleted_at_index(
                "idx_dropshipper_products_deleted_at",
                DropshipperProducts::Table,
            ))
            .await?;

        let mut dropshipper_variants = Table::create();
        dropshipper_variants
            .table(DropshipperProductVariants::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(DropshipperProductVariants::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(
                ColumnDef::new(DropshipperProductVariants::DropshipperProductId)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(DropshipperProductVariants::DropshipperId)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(DropshipperProductVariants::ProductVariantId)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(DropshipperProductVariants::Price)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(DropshipperProductVariants::Status)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_dropshipper_product_variants_parent")
                    .from(
                        DropshipperProductVariants::Table,
                        DropshipperProductVariants::DropshipperProductId,
                    )
                    .to(DropshipperProducts::Table, DropshipperProducts::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_dropshipper_product_variants_variant")
                    .from(
                        DropshipperProductVariants::Table,
                        DropshipperProductVariants::ProductVariantId,
                    )
                    .to(ProductVariants::Table, ProductVariants::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        add_audit_columns(&mut dropshipper_variants);
        manager.create_table(dropshipper_variants).await?;

        // Batched competitor price lookup filters on the variant id
        manager
            .create_index(
                Index::create()
                    .name("idx_dropshipper_product_variants_variant")
                    .table(DropshipperProductVariants::Table)
                    .col(DropshipperProductVariants::ProductVariantId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(deleted_at_index(
                "idx_dropshipper_product_variants_deleted_at",
                DropshipperProductVariants::Table,
            ))
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DropshipperProductVariants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(DropshipperProducts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ProductVariants::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Admins {
    Table,
    Id,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    SupplierId,
    Name,
    Description,
    Sku,
    Gallery,
    Status,
}

#[derive(Iden)]
enum ProductVariants {
    Table,
    Id,
    ProductId,
    Sku,
    Name,
    Price,
    Stock,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DropshipperProducts {
    Table,
    Id,
    DropshipperId,
    ProductId,
    SupplierId,
    Status,
}

#[derive(Iden)]
enum DropshipperProductVariants {
    Table,
    Id,
    DropshipperProductId,
    DropshipperId,
    ProductVariantId,
    Price,
    Status,
}
