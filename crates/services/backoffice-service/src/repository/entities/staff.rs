//! Dropshipper staff database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::staff::split_permissions;
use domain::Staff;

use super::AuditedModel;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "dropshipper_staff")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub admin_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub permissions: String,
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

impl From<Model> for Staff {
    fn from(model: Model) -> Self {
        let audit = model.audit_trail();
        Staff {
            id: model.id,
            admin_id: model.admin_id,
            name: model.name,
            email: model.email,
            phone: model.phone,
            permissions: split_permissions(&model.permissions),
            status: model.status,
            audit,
        }
    }
}
