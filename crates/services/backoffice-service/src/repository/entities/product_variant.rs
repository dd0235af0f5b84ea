//! Supplier variant database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::ProductVariant;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "product_variants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub product_id: i64,
    pub sku: String,
    pub name: String,
    pub price: i64,
    pub stock: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductVariant {
    fn from(model: Model) -> Self {
        ProductVariant {
            id: model.id,
            product_id: model.product_id,
            sku: model.sku,
            name: model.name,
            price: model.price,
            stock: model.stock,
        }
    }
}
