//! Dropshipper staff repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use common::{AppResult, OptionExt};
use domain::staff::join_permissions;
use domain::{Actor, ChangeStamp, LifecycleChange, ListStatus, NewStaff, Staff, UpdateStaff};

use super::entities::{staff, AuditedActiveModel};
use crate::infra::Persistence;
use crate::lifecycle::{LifecycleManager, SoftDelete};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait StaffRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Staff>>;

    /// Whether the dropshipper already has a staff member with `email`
    async fn email_taken(&self, dropshipper_id: i64, email: &str) -> AppResult<bool>;

    async fn create(&self, dropshipper_id: i64, input: NewStaff, actor: Actor) -> AppResult<Staff>;

    async fn update(&self, id: i64, changes: UpdateStaff, stamp: ChangeStamp) -> AppResult<Staff>;

    async fn set_status(&self, id: i64, status: bool, stamp: ChangeStamp) -> AppResult<Staff>;

    async fn list(&self, owner: Option<i64>, status: ListStatus) -> AppResult<Vec<Staff>>;

    async fn apply_lifecycle(&self, id: i64, change: LifecycleChange) -> AppResult<Staff>;

    async fn permanent_delete(&self, id: i64) -> AppResult<()>;
}

pub struct StaffStore {
    uow: Persistence,
    lifecycle: LifecycleManager<staff::Entity>,
}

impl StaffStore {
    pub fn new(db: DatabaseConnection) -> Self {
        let uow = Persistence::new(db);
        Self {
            lifecycle: LifecycleManager::new(uow.clone()),
            uow,
        }
    }

    async fn live_model(&self, id: i64) -> AppResult<staff::Model> {
        self.lifecycle
            .find_live(id)
            .await?
            .ok_or_not_found(staff::Entity::LABEL)
    }
}

#[async_trait]
impl StaffRepository for StaffStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Staff>> {
        Ok(self.lifecycle.find(id).await?.map(Staff::from))
    }

    async fn email_taken(&self, dropshipper_id: i64, email: &str) -> AppResult<bool> {
        let count = staff::Entity::find()
            .filter(staff::Column::AdminId.eq(dropshipper_id))
            .filter(staff::Column::Email.eq(email))
            .count(self.uow.connection())
            .await?;
        Ok(count > 0)
    }

    async fn create(&self, dropshipper_id: i64, input: NewStaff, actor: Actor) -> AppResult<Staff> {
        let mut active = staff::ActiveModel {
            admin_id: Set(dropshipper_id),
            name: Set(input.name),
            email: Set(input.email),
            phone: Set(input.phone),
            permissions: Set(join_permissions(&input.permissions)),
            status: Set(input.status),
            ..Default::default()
        };
        active.stamp_created(Some(&actor), Utc::now());

        let model = active.insert(self.uow.connection()).await?;
        Ok(Staff::from(model))
    }

    async fn update(&self, id: i64, changes: UpdateStaff, stamp: ChangeStamp) -> AppResult<Staff> {
        let mut active: staff::ActiveModel = self.live_model(id).await?.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(Some(phone));
        }
        if let Some(permissions) = changes.permissions {
            active.permissions = Set(join_permissions(&permissions));
        }
        active.touch(&stamp);

        let model = active.update(self.uow.connection()).await?;
        Ok(Staff::from(model))
    }

    async fn set_status(&self, id: i64, status: bool, stamp: ChangeStamp) -> AppResult<Staff> {
        let mut active: staff::ActiveModel = self.live_model(id).await?.into();
        active.status = Set(status);
        active.touch(&stamp);

        let model = active.update(self.uow.connection()).await?;
        Ok(Staff::from(model))
    }

    async fn list(&self, owner: Option<i64>, status: ListStatus) -> AppResult<Vec<Staff>> {
        let models = self.lifecycle.list_by_status(owner, status).await?;
        Ok(models.into_iter().map(Staff::from).collect())
    }

    async fn apply_lifecycle(&self, id: i64, change: LifecycleChange) -> AppResult<Staff> {
        Ok(Staff::from(self.lifecycle.apply(id, change).await?))
    }

    async fn permanent_delete(&self, id: i64) -> AppResult<()> {
        self.lifecycle.permanent_delete(id).await
    }
}
