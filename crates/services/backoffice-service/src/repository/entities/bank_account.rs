//! Bank account database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{BankAccount, KycStatus};

use super::AuditedModel;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "bank_accounts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub admin_id: i64,
    pub holder_name: String,
    pub account_number: String,
    pub ifsc: String,
    pub bank_name: String,
    pub is_primary: bool,
    pub kyc_status: String,
    pub kyc_remarks: Option<String>,
    pub status: bool,
    pub created_at: DateTimeUtc,
    pub created_by: Option<i64>,
    pub created_by_role: Option<String>,
    pub updated_at: DateTimeUtc,
    pub updated_by: Option<i64>,
    pub updated_by_role: Option<String>,
    pub deleted_at: Option<DateTimeUtc>,
    pub deleted_by: Option<i64>,
    pub deleted_by_role: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for BankAccount {
    fn from(model: Model) -> Self {
        let audit = model.audit_trail();
        BankAccount {
            id: model.id,
            admin_id: model.admin_id,
            holder_name: model.holder_name,
            account_number: model.account_number,
            ifsc: model.ifsc,
            bank_name: model.bank_name,
            is_primary: model.is_primary,
            // Unknown stored values are treated as not yet reviewed
            kyc_status: model.kyc_status.parse().unwrap_or(KycStatus::Pending),
            kyc_remarks: model.kyc_remarks,
            status: model.status,
            audit,
        }
    }
}
