//! Bank account and KYC review service.

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult, OptionExt};
use domain::validation::check;
use domain::{
    Actor, BankAccount, ChangeStamp, KycDecision, KycStatus, LifecycleChange, ListStatus,
    NewBankAccount, SessionContext,
};

use super::{authorize, authorize_admin, authorize_owner, listing_scope};
use crate::repository::BankAccountRepository;

#[async_trait]
pub trait BankAccountService: Send + Sync {
    /// Add a payout account. The first live account becomes primary.
    async fn add_bank_account(
        &self,
        session: &SessionContext,
        dropshipper_id: i64,
        input: NewBankAccount,
    ) -> AppResult<BankAccount>;

    async fn set_primary(&self, session: &SessionContext, id: i64) -> AppResult<BankAccount>;

    /// Record an admin's KYC decision on a pending account
    async fn review_kyc(
        &self,
        session: &SessionContext,
        id: i64,
        decision: KycDecision,
    ) -> AppResult<BankAccount>;

    async fn list_bank_accounts(
        &self,
        session: &SessionContext,
        status: ListStatus,
    ) -> AppResult<Vec<BankAccount>>;

    async fn soft_delete(&self, session: &SessionContext, id: i64) -> AppResult<BankAccount>;

    async fn restore(&self, session: &SessionContext, id: i64) -> AppResult<BankAccount>;

    async fn permanent_delete(&self, session: &SessionContext, id: i64) -> AppResult<()>;
}

pub struct BankAccountManager {
    repo: Arc<dyn BankAccountRepository>,
}

impl BankAccountManager {
    pub fn new(repo: Arc<dyn BankAccountRepository>) -> Self {
        Self { repo }
    }

    async fn account(&self, id: i64) -> AppResult<BankAccount> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_not_found("Bank account")
    }

    /// Owner or admin acting on account `id`
    async fn authorize_account(&self, session: &SessionContext, id: i64) -> AppResult<Actor> {
        let account = self.account(id).await?;
        authorize_owner(session, account.admin_id)
    }
}

#[async_trait]
impl BankAccountService for BankAccountManager {
    async fn add_bank_account(
        &self,
        session: &SessionContext,
        dropshipper_id: i64,
        mut input: NewBankAccount,
    ) -> AppResult<BankAccount> {
        let actor = authorize_owner(session, dropshipper_id)?;
        input.ifsc = input.ifsc.trim().to_ascii_uppercase();
        check(&input)?;

        let is_primary = self.repo.count_live(dropshipper_id).await? == 0;
        let account = self
            .repo
            .create(dropshipper_id, input, is_primary, actor)
            .await?;

        tracing::info!(
            id = account.id,
            dropshipper_id,
            is_primary,
            "Bank account added"
        );
        Ok(account)
    }

    async fn set_primary(&self, session: &SessionContext, id: i64) -> AppResult<BankAccount> {
        let actor = self.authorize_account(session, id).await?;
        self.repo.set_primary(id, ChangeStamp::now(&actor)).await
    }

    async fn review_kyc(
        &self,
        session: &SessionContext,
        id: i64,
        decision: KycDecision,
    ) -> AppResult<BankAccount> {
        let actor = authorize_admin(session)?;

        if let KycDecision::Reject { remarks } = &decision {
            if remarks.trim().is_empty() {
                return Err(AppError::validation("Remarks are required when rejecting"));
            }
        }

        let account = self.account(id).await?;
        if account.audit.is_trashed() {
            return Err(AppError::not_found("Bank account"));
        }
        if account.kyc_status != KycStatus::Pending {
            return Err(AppError::validation("Only pending accounts can be reviewed"));
        }

        let outcome = decision.outcome();
        let account = self
            .repo
            .record_kyc(id, decision, ChangeStamp::now(&actor))
            .await?;
        tracing::info!(id, reviewer = actor.id, outcome = outcome.as_str(), "KYC reviewed");
        Ok(account)
    }

    async fn list_bank_accounts(
        &self,
        session: &SessionContext,
        status: ListStatus,
    ) -> AppResult<Vec<BankAccount>> {
        let actor = authorize(session)?;
        self.repo.list(listing_scope(&actor), status).await
    }

    async fn soft_delete(&self, session: &SessionContext, id: i64) -> AppResult<BankAccount> {
        let actor = self.authorize_account(session, id).await?;
        self.repo.apply_lifecycle(id, LifecycleChange::trash(&actor)).await
    }

    async fn restore(&self, session: &SessionContext, id: i64) -> AppResult<BankAccount> {
        let actor = self.authorize_account(session, id).await?;
        self.repo
            .apply_lifecycle(id, LifecycleChange::restore(&actor))
            .await
    }

    async fn permanent_delete(&self, session: &SessionContext, id: i64) -> AppResult<()> {
        authorize_admin(session)?;
        self.repo.permanent_delete(id).await
    }
}
