//! Bank account repository with primary-account and KYC handling.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};

use common::{AppError, AppResult, OptionExt};
use domain::{
    Actor, BankAccount, ChangeStamp, KycDecision, KycStatus, LifecycleChange, ListStatus,
    NewBankAccount,
};

use super::entities::{bank_account, AuditedActiveModel};
use crate::infra::Persistence;
use crate::lifecycle::{LifecycleManager, SoftDelete};
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait BankAccountRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<BankAccount>>;

    /// Number of live accounts of a dropshipper
    async fn count_live(&self, dropshipper_id: i64) -> AppResult<u64>;

    async fn create(
        &self,
        dropshipper_id: i64,
        input: NewBankAccount,
        is_primary: bool,
        actor: Actor,
    ) -> AppResult<BankAccount>;

    /// Make `id` the only primary account of its owner
    async fn set_primary(&self, id: i64, stamp: ChangeStamp) -> AppResult<BankAccount>;

    async fn record_kyc(
        &self,
        id: i64,
        decision: KycDecision,
        stamp: ChangeStamp,
    ) -> AppResult<BankAccount>;

    async fn list(&self, owner: Option<i64>, status: ListStatus) -> AppResult<Vec<BankAccount>>;

    async fn apply_lifecycle(&self, id: i64, change: LifecycleChange) -> AppResult<BankAccount>;

    async fn permanent_delete(&self, id: i64) -> AppResult<()>;
}

pub struct BankAccountStore {
    uow: Persistence,
    lifecycle: LifecycleManager<bank_account::Entity>,
}

impl BankAccountStore {
    pub fn new(db: DatabaseConnection) -> Self {
        let uow = Persistence::new(db);
        Self {
            lifecycle: LifecycleManager::new(uow.clone()),
            uow,
        }
    }
}

#[async_trait]
impl BankAccountRepository for BankAccountStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<BankAccount>> {
        Ok(self.lifecycle.find(id).await?.map(BankAccount::from))
    }

    async fn count_live(&self, dropshipper_id: i64) -> AppResult<u64> {
        bank_account::Entity::find()
            .filter(bank_account::Column::AdminId.eq(dropshipper_id))
            .filter(bank_account::Column::DeletedAt.is_null())
            .count(self.uow.connection())
            .await
            .map_err(AppError::from)
    }

    async fn create(
        &self,
        dropshipper_id: i64,
        input: NewBankAccount,
        is_primary: bool,
        actor: Actor,
    ) -> AppResult<BankAccount> {
        let mut active = bank_account::ActiveModel {
            admin_id: Set(dropshipper_id),
            holder_name: Set(input.holder_name),
            account_number: Set(input.account_number),
            ifsc: Set(input.ifsc.to_ascii_uppercase()),
            bank_name: Set(input.bank_name),
            is_primary: Set(is_primary),
            kyc_status: Set(KycStatus::Pending.as_str().to_string()),
            kyc_remarks: Set(None),
            status: Set(true),
            ..Default::default()
        };
        active.stamp_created(Some(&actor), Utc::now());

        let model = active.insert(self.uow.connection()).await?;
        Ok(BankAccount::from(model))
    }

    async fn set_primary(&self, id: i64, stamp: ChangeStamp) -> AppResult<BankAccount> {
        let model = with_transaction!(self.uow, |ctx| {
            let txn = ctx.conn();

            let account = bank_account::Entity::find_by_id(id)
                .filter(bank_account::Column::DeletedAt.is_null())
                .one(txn)
                .await?
                .ok_or_not_found(bank_account::Entity::LABEL)?;

            bank_account::Entity::update_many()
                .col_expr(bank_account::Column::IsPrimary, Expr::value(false))
                .filter(bank_account::Column::AdminId.eq(account.admin_id))
                .filter(bank_account::Column::Id.ne(id))
                .filter(bank_account::Column::IsPrimary.eq(true))
                .exec(txn)
                .await?;

            let mut active: bank_account::ActiveModel = account.into();
            active.is_primary = Set(true);
            active.touch(&stamp);
            Ok(active.update(txn).await?)
        })?;

        Ok(BankAccount::from(model))
    }

    async fn record_kyc(
        &self,
        id: i64,
        decision: KycDecision,
        stamp: ChangeStamp,
    ) -> AppResult<BankAccount> {
        let model = self
            .lifecycle
            .find_live(id)
            .await?
            .ok_or_not_found(bank_account::Entity::LABEL)?;

        let mut active: bank_account::ActiveModel = model.into();
        active.kyc_status = Set(decision.outcome().as_str().to_string());
        active.kyc_remarks = Set(decision.remarks().map(str::to_string));
        active.touch(&stamp);

        let model = active.update(self.uow.connection()).await?;
        Ok(BankAccount::from(model))
    }

    async fn list(&self, owner: Option<i64>, status: ListStatus) -> AppResult<Vec<BankAccount>> {
        let models = self.lifecycle.list_by_status(owner, status).await?;
        Ok(models.into_iter().map(BankAccount::from).collect())
    }

    async fn apply_lifecycle(&self, id: i64, change: LifecycleChange) -> AppResult<BankAccount> {
        Ok(BankAccount::from(self.lifecycle.apply(id, change).await?))
    }

    async fn permanent_delete(&self, id: i64) -> AppResult<()> {
        self.lifecycle.permanent_delete(id).await
    }
}
