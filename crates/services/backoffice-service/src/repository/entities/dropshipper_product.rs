//! Dropshipper product database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::DropshipperProduct;

use super::AuditedModel;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dropshipper_products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub dropshipper_id: i64,
    pub product_id: i64,
    pub supplier_id: i64,
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

/// Variants and product are attached by the repository
impl From<Model> for DropshipperProduct {
    fn from(model: Model) -> Self {
        let audit = model.audit_trail();
        DropshipperProduct {
            id: model.id,
            dropshipper_id: model.dropshipper_id,
            product_id: model.product_id,
            supplier_id: model.supplier_id,
            status: model.status,
            audit,
            variants: Vec::new(),
            product: None,
        }
    }
}
