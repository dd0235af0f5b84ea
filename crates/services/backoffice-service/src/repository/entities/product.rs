//! Supplier product database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Gallery, Product};

use super::AuditedModel;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub supplier_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    /// Comma-joined image file names
    pub gallery: Option<String>,
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

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        let audit = model.audit_trail();
        Product {
            id: model.id,
            supplier_id: model.supplier_id,
            name: model.name,
            description: model.description,
            sku: model.sku,
            gallery: Gallery::parse(model.gallery.as_deref()).images().to_vec(),
            status: model.status,
            audit,
        }
    }
}
