//! Account database entity for SeaORM.
//!
//! Every actor (admin, supplier, dropshipper) is a row here; the dropshipper
//! view filters on `role`.

use sea_orm::entity::prelude::*;

use domain::{ActorRole, Dropshipper};

use super::AuditedModel;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "admins")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub role: String,
    pub unique_code: Option<String>,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: Option<String>,
    #[sea_orm(unique)]
    pub shopify_domain: Option<String>,
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

impl Model {
    pub fn role(&self) -> ActorRole {
        ActorRole::from(self.role.as_str())
    }
}

/// Convert database model to domain entity
impl From<Model> for Dropshipper {
    fn from(model: Model) -> Self {
        let audit = model.audit_trail();
        Dropshipper {
            id: model.id,
            unique_code: model.unique_code.unwrap_or_default(),
            name: model.name,
            email: model.email,
            phone: model.phone,
            shopify_domain: model.shopify_domain,
            status: model.status,
            audit,
        }
    }
}
