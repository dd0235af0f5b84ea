//! Dropshipper account repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};

use common::{AppError, AppResult, OptionExt};
use domain::{
    Actor, BankAccount, ChangeStamp, CompanyDetail, Dropshipper, DropshipperProfile,
    LifecycleChange, ListStatus, NewDropshipper, UpdateDropshipper, ROLE_DROPSHIPPER,
};

use super::entities::{admin, bank_account, company_detail, AuditedActiveModel};
use crate::infra::Persistence;
use crate::lifecycle::{LifecycleManager, SoftDelete};
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Dropshipper repository trait for dependency injection.
///
/// Lookups by id see trashed accounts too; listings filter by [`ListStatus`].
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DropshipperRepository: Send + Sync {
    /// Find dropshipper by ID in any state
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Dropshipper>>;

    /// Dropshipper with company detail and bank accounts
    async fn find_profile(&self, id: i64) -> AppResult<Option<DropshipperProfile>>;

    /// Whether any account already uses `email`
    async fn email_taken(&self, email: &str) -> AppResult<bool>;

    /// Whether an account other than `except` already linked `domain`
    async fn shopify_domain_taken(&self, domain: &str, except: Option<i64>) -> AppResult<bool>;

    /// Insert the account and its optional company detail in one transaction
    async fn create(
        &self,
        unique_code: String,
        input: NewDropshipper,
        creator: Actor,
    ) -> AppResult<DropshipperProfile>;

    async fn update(
        &self,
        id: i64,
        changes: UpdateDropshipper,
        stamp: ChangeStamp,
    ) -> AppResult<Dropshipper>;

    async fn set_status(&self, id: i64, status: bool, stamp: ChangeStamp)
        -> AppResult<Dropshipper>;

    async fn set_shopify_domain(
        &self,
        id: i64,
        domain: String,
        stamp: ChangeStamp,
    ) -> AppResult<Dropshipper>;

    async fn list(&self, status: ListStatus) -> AppResult<Vec<Dropshipper>>;

    /// Soft delete or restore, cascading to everything the dropshipper owns
    async fn apply_lifecycle(
        &self,
        id: i64,
        change: LifecycleChange,
    ) -> AppResult<DropshipperProfile>;

    async fn permanent_delete(&self, id: i64) -> AppResult<()>;
}

/// SeaORM implementation over the `admins` table.
pub struct DropshipperStore {
    uow: Persistence,
    lifecycle: LifecycleManager<admin::Entity>,
}

impl DropshipperStore {
    pub fn new(db: DatabaseConnection) -> Self {
        let uow = Persistence::new(db);
        Self {
            lifecycle: LifecycleManager::new(uow.clone()),
            uow,
        }
    }

    fn db(&self) -> &DatabaseConnection {
        self.uow.connection()
    }

    async fn live_model(&self, id: i64) -> AppResult<admin::Model> {
        self.lifecycle
            .find_live(id)
            .await?
            .ok_or_not_found(admin::Entity::LABEL)
    }

    async fn profile_of(&self, model: admin::Model) -> AppResult<DropshipperProfile> {
        let company = company_detail::Entity::find()
            .filter(company_detail::Column::AdminId.eq(model.id))
            .one(self.db());
        let accounts = bank_account::Entity::find()
            .filter(bank_account::Column::AdminId.eq(model.id))
            .order_by_asc(bank_account::Column::Id)
            .all(self.db());

        let (company, accounts) = futures::try_join!(company, accounts)?;

        // Trashed children only show on a trashed profile
        let trashed = model.deleted_at.is_some();
        Ok(DropshipperProfile {
            dropshipper: Dropshipper::from(model),
            company_detail: company
                .filter(|c| trashed || c.deleted_at.is_none())
                .map(CompanyDetail::from),
            bank_accounts: accounts
                .into_iter()
                .filter(|a| trashed || a.deleted_at.is_none())
                .map(BankAccount::from)
                .collect(),
        })
    }
}

#[async_trait]
impl DropshipperRepository for DropshipperStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Dropshipper>> {
        Ok(self.lifecycle.find(id).await?.map(Dropshipper::from))
    }

    async fn find_profile(&self, id: i64) -> AppResult<Option<DropshipperProfile>> {
        match self.lifecycle.find(id).await? {
            Some(model) => Ok(Some(self.profile_of(model).await?)),
            None => Ok(None),
        }
    }

    async fn email_taken(&self, email: &str) -> AppResult<bool> {
        let count = admin::Entity::find()
            .filter(admin::Column::Email.eq(email))
            .count(self.db())
            .await?;
        Ok(count > 0)
    }

    async fn shopify_domain_taken(&self, domain: &str, except: Option<i64>) -> AppResult<bool> {
        let mut query = admin::Entity::find().filter(admin::Column::ShopifyDomain.eq(domain));
        if let Some(id) = except {
            query = query.filter(admin::Column::Id.ne(id));
        }
        Ok(query.count(self.db()).await? > 0)
    }

    async fn create(
        &self,
        unique_code: String,
        input: NewDropshipper,
        creator: Actor,
    ) -> AppResult<DropshipperProfile> {
        let now = Utc::now();

        let (account, company) = with_transaction!(self.uow, |ctx| {
            let txn = ctx.conn();

            let mut account = admin::ActiveModel {
                role: Set(ROLE_DROPSHIPPER.to_string()),
                unique_code: Set(Some(unique_code)),
                name: Set(input.name),
                email: Set(input.email),
                phone: Set(input.phone),
                shopify_domain: Set(input.shopify_domain),
                status: Set(input.status),
                ..Default::default()
            };
            account.stamp_created(Some(&creator), now);
            let account = account.insert(txn).await?;

            let company = match input.company {
                Some(details) => {
                    let mut company = company_detail::ActiveModel {
                        admin_id: Set(account.id),
                        legal_name: Set(details.legal_name),
                        gstin: Set(details.gstin),
                        pan: Set(details.pan),
                        billing_address: Set(details.billing_address),
                        status: Set(true),
                        ..Default::default()
                    };
                    company.stamp_created(Some(&creator), now);
                    Some(company.insert(txn).await?)
                }
                None => None,
            };

            Ok((account, company))
        })?;

        Ok(DropshipperProfile {
            dropshipper: Dropshipper::from(account),
            company_detail: company.map(CompanyDetail::from),
            bank_accounts: Vec::new(),
        })
    }

    async fn update(
        &self,
        id: i64,
        changes: UpdateDropshipper,
        stamp: ChangeStamp,
    ) -> AppResult<Dropshipper> {
        let model = self.live_model(id).await?;
        let mut active: admin::ActiveModel = model.into();

        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(phone) = changes.phone {
            active.phone = Set(Some(phone));
        }
        active.touch(&stamp);

        let model = active.update(self.db()).await.map_err(AppError::from)?;
        Ok(Dropshipper::from(model))
    }

    async fn set_status(
        &self,
        id: i64,
        status: bool,
        stamp: ChangeStamp,
    ) -> AppResult<Dropshipper> {
        let model = self.live_model(id).await?;
        let mut active: admin::ActiveModel = model.into();
        active.status = Set(status);
        active.touch(&stamp);

        let model = active.update(self.db()).await.map_err(AppError::from)?;
        Ok(Dropshipper::from(model))
    }

    async fn set_shopify_domain(
        &self,
        id: i64,
        domain: String,
        stamp: ChangeStamp,
    ) -> AppResult<Dropshipper> {
        let model = self.live_model(id).await?;
        let mut active: admin::ActiveModel = model.into();
        active.shopify_domain = Set(Some(domain));
        active.touch(&stamp);

        let model = active.update(self.db()).await.map_err(AppError::from)?;
        Ok(Dropshipper::from(model))
    }

    async fn list(&self, status: ListStatus) -> AppResult<Vec<Dropshipper>> {
        let models = self.lifecycle.list_by_status(None, status).await?;
        Ok(models.into_iter().map(Dropshipper::from).collect())
    }

    async fn apply_lifecycle(
        &self,
        id: i64,
        change: LifecycleChange,
    ) -> AppResult<DropshipperProfile> {
        let model = self.lifecycle.apply(id, change).await?;
        self.profile_of(model).await
    }

    async fn permanent_delete(&self, id: i64) -> AppResult<()> {
        self.lifecycle.permanent_delete(id).await
    }
}
