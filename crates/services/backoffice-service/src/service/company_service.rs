//! Company detail service.

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult, OptionExt};
use domain::validation::check;
use domain::{Actor, CompanyDetail, CompanyDetailInput, LifecycleChange, ListStatus, SessionContext};

use super::{authorize, authorize_admin, authorize_owner, listing_scope};
use crate::repository::{CompanyDetailRepository, DropshipperRepository};

#[async_trait]
pub trait CompanyDetailService: Send + Sync {
    /// Create or replace the company detail of a live dropshipper
    async fn save_company_detail(
        &self,
        session: &SessionContext,
        dropshipper_id: i64,
        input: CompanyDetailInput,
    ) -> AppResult<CompanyDetail>;

    async fn get_company_detail(
        &self,
        session: &SessionContext,
        dropshipper_id: i64,
    ) -> AppResult<CompanyDetail>;

    async fn list_company_details(
        &self,
        session: &SessionContext,
        status: ListStatus,
    ) -> AppResult<Vec<CompanyDetail>>;

    async fn soft_delete(&self, session: &SessionContext, id: i64) -> AppResult<CompanyDetail>;

    async fn restore(&self, session: &SessionContext, id: i64) -> AppResult<CompanyDetail>;

    async fn permanent_delete(&self, session: &SessionContext, id: i64) -> AppResult<()>;
}

pub struct CompanyDetailManager {
    repo: Arc<dyn CompanyDetailRepository>,
    dropshippers: Arc<dyn DropshipperRepository>,
}

impl CompanyDetailManager {
    pub fn new(
        repo: Arc<dyn CompanyDetailRepository>,
        dropshippers: Arc<dyn DropshipperRepository>,
    ) -> Self {
        Self { repo, dropshippers }
    }

    /// Actor allowed to change the company detail `id`
    async fn authorize_detail(&self, session: &SessionContext, id: i64) -> AppResult<Actor> {
        let detail = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_not_found("Company detail")?;
        authorize_owner(session, detail.admin_id)
    }
}

#[async_trait]
impl CompanyDetailService for CompanyDetailManager {
    async fn save_company_detail(
        &self,
        session: &SessionContext,
        dropshipper_id: i64,
        input: CompanyDetailInput,
    ) -> AppResult<CompanyDetail> {
        let actor = authorize_owner(session, dropshipper_id)?;
        check(&input)?;

        let dropshipper = self
            .dropshippers
            .find_by_id(dropshipper_id)
            .await?
            .ok_or_not_found("Dropshipper")?;
        if dropshipper.audit.is_trashed() {
            return Err(AppError::not_found("Dropshipper"));
        }

        self.repo.upsert(dropshipper_id, input, actor).await
    }

    async fn get_company_detail(
        &self,
        session: &SessionContext,
        dropshipper_id: i64,
    ) -> AppResult<CompanyDetail> {
        authorize_owner(session, dropshipper_id)?;
        self.repo
            .find_by_dropshipper(dropshipper_id)
            .await?
            .ok_or_not_found("Company detail")
    }

    async fn list_company_details(
        &self,
        session: &SessionContext,
        status: ListStatus,
    ) -> AppResult<Vec<CompanyDetail>> {
        let actor = authorize(session)?;
        self.repo.list(listing_scope(&actor), status).await
    }

    async fn soft_delete(&self, session: &SessionContext, id: i64) -> AppResult<CompanyDetail> {
        let actor = self.authorize_detail(session, id).await?;
        self.repo.apply_lifecycle(id, LifecycleChange::trash(&actor)).await
    }

    async fn restore(&self, session: &SessionContext, id: i64) -> AppResult<CompanyDetail> {
        let actor = self.authorize_detail(session, id).await?;
        self.repo
            .apply_lifecycle(id, LifecycleChange::restore(&actor))
            .await
    }

    async fn permanent_delete(&self, session: &SessionContext, id: i64) -> AppResult<()> {
        authorize_admin(session)?;
        self.repo.permanent_delete(id).await
    }
}
