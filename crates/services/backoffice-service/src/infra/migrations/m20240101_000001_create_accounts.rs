//! Migration: Create account tables (admins, company details, bank accounts, staff).

use sea_orm_migration::prelude::*;

use super::{add_audit_columns, deleted_at_index};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Every actor account; dropshippers carry a DROP-#### code
        let mut admins = Table::create();
        admins
            .table(Admins::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Admins::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Admins::Role).string_len(20).not_null())
            .col(ColumnDef::new(Admins::UniqueCode).string_len(20).null())
            .col(ColumnDef::new(Admins::Name).string().not_null())
            .col(ColumnDef::new(Admins::Email).string().not_null())
            .col(ColumnDef::new(Admins::Phone).string_len(20).null())
            .col(ColumnDef::new(Admins::ShopifyDomain).string().null())
            .col(
                ColumnDef::new(Admins::Status)
                    .boolean()
                    .not_null()
                    .default(true),
            );
        add_audit_columns(&mut admins);
        manager.create_table(admins).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_admins_email")
                    .table(Admins::Table)
                    .col(Admins::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_admins_role_unique_code")
                    .table(Admins::Table)
                    .col(Admins::Role)
                    .col(Admins::UniqueCode)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_admins_shopify_domain")
                    .table(Admins::Table)
                    .col(Admins::ShopifyDomain)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(deleted_at_index("idx_admins_deleted_at", Admins::Table))
            .await?;

        let mut company_details = Table::create();
        company_details
            .table(CompanyDetails::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(CompanyDetails::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(CompanyDetails::AdminId).big_integer().not_null())
            .col(ColumnDef::new(CompanyDetails::LegalName).string().not_null())
            .col(ColumnDef::new(CompanyDetails::Gstin).string_len(15).null())
            .col(ColumnDef::new(CompanyDetails::Pan).string_len(10).null())
            .col(ColumnDef::new(CompanyDetails::BillingAddress).text().null())
            .col(
                ColumnDef::new(CompanyDetails::Status)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_company_details_admin")
                    .from(CompanyDetails::Table, CompanyDetails::AdminId)
                    .to(Admins::Table, Admins::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        add_audit_columns(&mut company_details);
        manager.create_table(company_details).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_company_details_admin_id")
                    .table(CompanyDetails::Table)
                    .col(CompanyDetails::AdminId)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(deleted_at_index(
                "idx_company_details_deleted_at",
                CompanyDetails::Table,
            ))
            .await?;

        let mut bank_accounts = Table::create();
        bank_accounts
            .table(BankAccounts::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(BankAccounts::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(BankAccounts::AdminId).big_integer().not_null())
            .col(ColumnDef::new(BankAccounts::HolderName).string().not_null())
            .col(ColumnDef::new(BankAccounts::AccountNumber).string_len(20).not_null())
            .col(ColumnDef::new(BankAccounts::Ifsc).string_len(11).not_null())
            .col(ColumnDef::new(BankAccounts::BankName).string().not_null())
            .col(
                ColumnDef::new(BankAccounts::IsPrimary)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(
                ColumnDef::new(BankAccounts::KycStatus)
                    .string_len(20)
                    .not_null()
                    .default("pending"),
            )
            .col(ColumnDef::new(BankAccounts::KycRemarks).text().null())
            .col(
                ColumnDef::new(BankAccounts::Status)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_bank_accounts_admin")
                    .from(BankAccounts::Table, BankAccounts::AdminId)
                    .to(Admins::Table, Admins::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        add_audit_columns(&mut bank_accounts);
        manager.create_table(bank_accounts).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bank_accounts_admin_id")
                    .table(BankAccounts::Table)
                    .col(BankAccounts::AdminId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(deleted_at_index(
                "idx_bank_accounts_deleted_at",
                BankAccounts::Table,
            ))
            .await?;

        let mut staff = Table::create();
        staff
            .table(DropshipperStaff::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(DropshipperStaff::Id)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(DropshipperStaff::AdminId).big_integer().not_null())
            .col(ColumnDef::new(DropshipperStaff::Name).string().not_null())
            .col(ColumnDef::new(DropshipperStaff::Email).string().not_null())
            .col(ColumnDef::new(DropshipperStaff::Phone).string_len(20).null())
            .col(
                ColumnDef::new(DropshipperStaff::Permissions)
                    .text()
                    .not_null()
                    .default(""),
            )
            .col(
                ColumnDef::new(DropshipperStaff::Status)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .foreign_key(
                ForeignKey::create()
                    .name("fk_dropshipper_staff_admin")
                    .from(DropshipperStaff::Table, DropshipperStaff::AdminId)
                    .to(Admins::Table, Admins::Id)
                    .on_delete(ForeignKeyAction::Cascade),
            );
        add_audit_columns(&mut staff);
        manager.create_table(staff).await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dropshipper_staff_admin_email")
                    .table(DropshipperStaff::Table)
                    .col(DropshipperStaff::AdminId)
                    .col(DropshipperStaff::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(deleted_at_index(
                "idx_dropshipper_staff_deleted_at",
                DropshipperStaff::Table,
            ))
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DropshipperStaff::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BankAccounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CompanyDetails::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Admins::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Admins {
    Table,
    Id,
    Role,
    UniqueCode,
    Name,
    Email,
    Phone,
    ShopifyDomain,
    Status,
}

#[derive(Iden)]
enum CompanyDetails {
    Table,
    Id,
    AdminId,
    LegalName,
    Gstin,
    Pan,
    BillingAddress,
    Status,
}

#[derive(Iden)]
enum BankAccounts {
    Table,
    Id,
    AdminId,
    HolderName,
    AccountNumber,
    Ifsc,
    BankName,
    IsPrimary,
    KycStatus,
    KycRemarks,
    Status,
}

#[derive(Iden)]
enum DropshipperStaff {
    Table,
    Id,
    AdminId,
    Name,
    Email,
    Phone,
    Permissions,
    Status,
}
