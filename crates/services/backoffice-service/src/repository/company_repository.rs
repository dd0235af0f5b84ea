//! Company detail repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use common::{AppError, AppResult};
use domain::{Actor, ChangeStamp, CompanyDetail, CompanyDetailInput, LifecycleChange, ListStatus};

use super::entities::{company_detail, AuditedActiveModel};
use crate::infra::Persistence;
use crate::lifecycle::LifecycleManager;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CompanyDetailRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<CompanyDetail>>;

    /// Company detail of a dropshipper in any state
    async fn find_by_dropshipper(&self, dropshipper_id: i64) -> AppResult<Option<CompanyDetail>>;

    /// Create the detail, or replace the fields of the existing one
    async fn upsert(
        &self,
        dropshipper_id: i64,
        input: CompanyDetailInput,
        actor: Actor,
    ) -> AppResult<CompanyDetail>;

    async fn list(&self, owner: Option<i64>, status: ListStatus) -> AppResult<Vec<CompanyDetail>>;

    async fn apply_lifecycle(&self, id: i64, change: LifecycleChange) -> AppResult<CompanyDetail>;

    async fn permanent_delete(&self, id: i64) -> AppResult<()>;
}

pub struct CompanyDetailStore {
    uow: Persistence,
    lifecycle: LifecycleManager<company_detail::Entity>,
}

impl CompanyDetailStore {
    pub fn new(db: DatabaseConnection) -> Self {
        let uow = Persistence::new(db);
        Self {
            lifecycle: LifecycleManager::new(uow.clone()),
            uow,
        }
    }
}

#[async_trait]
impl CompanyDetailRepository for CompanyDetailStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<CompanyDetail>> {
        Ok(self.lifecycle.find(id).await?.map(CompanyDetail::from))
    }

    async fn find_by_dropshipper(&self, dropshipper_id: i64) -> AppResult<Option<CompanyDetail>> {
        let model = company_detail::Entity::find()
            .filter(company_detail::Column::AdminId.eq(dropshipper_id))
            .one(self.uow.connection())
            .await
            .map_err(AppError::from)?;
        Ok(model.map(CompanyDetail::from))
    }

    async fn upsert(
        &self,
        dropshipper_id: i64,
        input: CompanyDetailInput,
        actor: Actor,
    ) -> AppResult<CompanyDetail> {
        let existing = company_detail::Entity::find()
            .filter(company_detail::Column::AdminId.eq(dropshipper_id))
            .one(self.uow.connection())
            .await?;

        let model = match existing {
            Some(model) => {
                let mut active: company_detail::ActiveModel = model.into();
                active.legal_name = Set(input.legal_name);
                active.gstin = Set(input.gstin);
                active.pan = Set(input.pan);
                active.billing_address = Set(input.billing_address);
                active.touch(&ChangeStamp::now(&actor));
                active.update(self.uow.connection()).await?
            }
            None => {
                let mut active = company_detail::ActiveModel {
                    admin_id: Set(dropshipper_id),
                    legal_name: Set(input.legal_name),
                    gstin: Set(input.gstin),
                    pan: Set(input.pan),
                    billing_address: Set(input.billing_address),
                    status: Set(true),
                    ..Default::default()
                };
                active.stamp_created(Some(&actor), Utc::now());
                active.insert(self.uow.connection()).await?
            }
        };

        Ok(CompanyDetail::from(model))
    }

    async fn list(&self, owner: Option<i64>, status: ListStatus) -> AppResult<Vec<CompanyDetail>> {
        let models = self.lifecycle.list_by_status(owner, status).await?;
        Ok(models.into_iter().map(CompanyDetail::from).collect())
    }

    async fn apply_lifecycle(&self, id: i64, change: LifecycleChange) -> AppResult<CompanyDetail> {
        Ok(CompanyDetail::from(self.lifecycle.apply(id, change).await?))
    }

    async fn permanent_delete(&self, id: i64) -> AppResult<()> {
        self.lifecycle.permanent_delete(id).await
    }
}
