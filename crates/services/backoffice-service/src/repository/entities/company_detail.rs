//! Company detail database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::CompanyDetail;

use super::AuditedModel;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "company_details")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub admin_id: i64,
    pub legal_name: String,
    pub gstin: Option<String>,
    pub pan: Option<String>,
    pub billing_address: Option<String>,
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

impl From<Model> for CompanyDetail {
    fn from(model: Model) -> Self {
        let audit = model.audit_trail();
        CompanyDetail {
            id: model.id,
            admin_id: model.admin_id,
            legal_name: model.legal_name,
            gstin: model.gstin,
            pan: model.pan,
            billing_address: model.billing_address,
            status: model.status,
            audit,
        }
    }
}
