//! Dropshipper variant price database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::DropshipperProductVariant;

use super::AuditedModel;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dropshipper_product_variants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub dropshipper_product_id: i64,
    pub dropshipper_id: i64,
    pub product_variant_id: i64,
    pub price: i64,
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

impl From<Model> for DropshipperProductVariant {
    fn from(model: Model) -> Self {
        let audit = model.audit_trail();
        DropshipperProductVariant {
            id: model.id,
            dropshipper_product_id: model.dropshipper_product_id,
            dropshipper_id: model.dropshipper_id,
            product_variant_id: model.product_variant_id,
            price: model.price,
            status: model.status,
            audit,
        }
    }
}
