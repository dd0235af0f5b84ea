//! Dropshipper account service.

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult, OptionExt};
use domain::validation::{check, normalize_shopify_domain};
use domain::{
    ChangeStamp, Dropshipper, DropshipperProfile, LifecycleChange, ListStatus, NewDropshipper,
    SessionContext, UpdateDropshipper,
};

use super::{authorize_admin, authorize_owner, CodeGenerator, MAX_INSERT_ATTEMPTS};
use crate::repository::DropshipperRepository;

#[async_trait]
pub trait DropshipperService: Send + Sync {
    /// Register a dropshipper with a fresh `DROP-####` code
    async fn create_dropshipper(
        &self,
        session: &SessionContext,
        input: NewDropshipper,
    ) -> AppResult<DropshipperProfile>;

    /// Dropshipper with company detail and bank accounts.
    ///
    /// Trashed accounts are visible to admins only.
    async fn get_dropshipper(&self, session: &SessionContext, id: i64)
        -> AppResult<DropshipperProfile>;

    async fn update_dropshipper(
        &self,
        session: &SessionContext,
        id: i64,
        changes: UpdateDropshipper,
    ) -> AppResult<Dropshipper>;

    async fn set_status(
        &self,
        session: &SessionContext,
        id: i64,
        status: bool,
    ) -> AppResult<Dropshipper>;

    /// Link the account to a Shopify store
    async fn link_shopify_store(
        &self,
        session: &SessionContext,
        id: i64,
        domain: &str,
    ) -> AppResult<Dropshipper>;

    async fn list_dropshippers(
        &self,
        session: &SessionContext,
        status: ListStatus,
    ) -> AppResult<Vec<Dropshipper>>;

    /// Trash the account with its company detail and bank accounts
    async fn soft_delete(&self, session: &SessionContext, id: i64)
        -> AppResult<DropshipperProfile>;

    async fn restore(&self, session: &SessionContext, id: i64) -> AppResult<DropshipperProfile>;

    async fn permanent_delete(&self, session: &SessionContext, id: i64) -> AppResult<()>;
}

pub struct DropshipperManager {
    repo: Arc<dyn DropshipperRepository>,
    codes: Arc<CodeGenerator>,
}

impl DropshipperManager {
    pub fn new(repo: Arc<dyn DropshipperRepository>, codes: Arc<CodeGenerator>) -> Self {
        Self { repo, codes }
    }
}

#[async_trait]
impl DropshipperService for DropshipperManager {
    async fn create_dropshipper(
        &self,
        session: &SessionContext,
        mut input: NewDropshipper,
    ) -> AppResult<DropshipperProfile> {
        let actor = authorize_admin(session)?;

        check(&input)?;
        if let Some(company) = &input.company {
            check(company)?;
        }
        input.email = input.email.trim().to_ascii_lowercase();
        input.shopify_domain = input
            .shopify_domain
            .as_deref()
            .map(normalize_shopify_domain)
            .transpose()?;

        if self.repo.email_taken(&input.email).await? {
            return Err(AppError::conflict("Email"));
        }
        if let Some(domain) = &input.shopify_domain {
            if self.repo.shopify_domain_taken(domain, None).await? {
                return Err(AppError::conflict("Shopify store"));
            }
        }

        let mut attempt = 1;
        loop {
            let code = self.codes.generate().await?;
            match self.repo.create(code.clone(), input.clone(), actor).await {
                Ok(profile) => {
                    tracing::info!(
                        id = profile.dropshipper.id,
                        code = %code,
                        created_by = actor.id,
                        "Dropshipper created"
                    );
                    return Ok(profile);
                }
                Err(e) if e.is_unique_violation() && attempt < MAX_INSERT_ATTEMPTS => {
                    tracing::warn!(
                        code = %code,
                        attempt,
                        "Dropshipper code taken on insert, redrawing"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_dropshipper(
        &self,
        session: &SessionContext,
        id: i64,
    ) -> AppResult<DropshipperProfile> {
        let actor = authorize_owner(session, id)?;
        let profile = self
            .repo
            .find_profile(id)
            .await?
            .ok_or_not_found("Dropshipper")?;

        if profile.dropshipper.audit.is_trashed() && !actor.role.is_admin() {
            return Err(AppError::not_found("Dropshipper"));
        }
        Ok(profile)
    }

    async fn update_dropshipper(
        &self,
        session: &SessionContext,
        id: i64,
        changes: UpdateDropshipper,
    ) -> AppResult<Dropshipper> {
        let actor = authorize_owner(session, id)?;
        check(&changes)?;
        self.repo.update(id, changes, ChangeStamp::now(&actor)).await
    }

    async fn set_status(
        &self,
        session: &SessionContext,
        id: i64,
        status: bool,
    ) -> AppResult<Dropshipper> {
        let actor = authorize_admin(session)?;
        let dropshipper = self
            .repo
            .set_status(id, status, ChangeStamp::now(&actor))
            .await?;
        tracing::info!(id, status, "Dropshipper status changed");
        Ok(dropshipper)
    }

    async fn link_shopify_store(
        &self,
        session: &SessionContext,
        id: i64,
        domain: &str,
    ) -> AppResult<Dropshipper> {
        let actor = authorize_owner(session, id)?;
        let domain = normalize_shopify_domain(domain)?;

        if self.repo.shopify_domain_taken(&domain, Some(id)).await? {
            return Err(AppError::conflict("Shopify store"));
        }
        self.repo
            .set_shopify_domain(id, domain, ChangeStamp::now(&actor))
            .await
    }

    async fn list_dropshippers(
        &self,
        session: &SessionContext,
        status: ListStatus,
    ) -> AppResult<Vec<Dropshipper>> {
        authorize_admin(session)?;
        self.repo.list(status).await
    }

    async fn soft_delete(
        &self,
        session: &SessionContext,
        id: i64,
    ) -> AppResult<DropshipperProfile> {
        let actor = authorize_admin(session)?;
        self.repo.apply_lifecycle(id, LifecycleChange::trash(&actor)).await
    }

    async fn restore(&self, session: &SessionContext, id: i64) -> AppResult<DropshipperProfile> {
        let actor = authorize_admin(session)?;
        self.repo
            .apply_lifecycle(id, LifecycleChange::restore(&actor))
            .await
    }

    async fn permanent_delete(&self, session: &SessionContext, id: i64) -> AppResult<()> {
        authorize_admin(session)?;
        self.repo.permanent_delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use mockall::predicate::eq;

    use domain::{Actor, AuditTrail, DROPSHIPPER_CODE};

    use crate::repository::{MockCodeStore, MockDropshipperRepository};

    fn codes() -> Arc<CodeGenerator> {
        let mut store = MockCodeStore::new();
        store.expect_is_taken().returning(|_| Ok(false));
        Arc::new(CodeGenerator::new(DROPSHIPPER_CODE, Arc::new(store)))
    }

    fn session(actor: Actor) -> SessionContext {
        SessionContext::new(actor, Duration::minutes(5))
    }

    fn registration(shopify_domain: Option<&str>) -> NewDropshipper {
        NewDropshipper {
            name: "Asha".to_string(),
            email: "Asha@Example.com".to_string(),
            phone: None,
            shopify_domain: shopify_domain.map(str::to_string),
            status: true,
            company: None,
        }
    }

    fn profile(id: i64, trashed: bool) -> DropshipperProfile {
        let mut audit = AuditTrail::created(Some(&Actor::admin(1)), Utc::now());
        if trashed {
            audit.apply(&LifecycleChange::trash(&Actor::admin(1)));
        }
        DropshipperProfile {
            dropshipper: Dropshipper {
                id,
                unique_code: "DROP-0042".to_string(),
                name: "Asha".to_string(),
                email: "asha@example.com".to_string(),
                phone: None,
                shopify_domain: None,
                status: true,
                audit,
            },
            company_detail: None,
            bank_accounts: Vec::new(),
        }
    }

    #[tokio::test]
    async fn test_taken_email_is_a_conflict() {
        let mut repo = MockDropshipperRepository::new();
        repo.expect_email_taken()
            .with(eq("asha@example.com"))
            .returning(|_| Ok(true));
        repo.expect_create().never();

        let service = DropshipperManager::new(Arc::new(repo), codes());
        let result = service
            .create_dropshipper(&session(Actor::admin(1)), registration(None))
            .await;

        let err = result.unwrap_err();
        assert_eq!(err.user_message(), "Email already exists");
    }

    #[tokio::test]
    async fn test_linked_shopify_store_is_a_conflict() {
        let mut repo = MockDropshipperRepository::new();
        repo.expect_email_taken().returning(|_| Ok(false));
        repo.expect_shopify_domain_taken()
            .with(eq("asha-store.myshopify.com"), eq(None::<i64>))
            .returning(|_, _| Ok(true));
        repo.expect_create().never();

        let service = DropshipperManager::new(Arc::new(repo), codes());
        let result = service
            .create_dropshipper(
                &session(Actor::admin(1)),
                registration(Some("https://Asha-Store.myshopify.com/admin")),
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(ref what)) if what == "Shopify store"));
    }

    #[tokio::test]
    async fn test_created_account_gets_a_generated_code() {
        let mut repo = MockDropshipperRepository::new();
        repo.expect_email_taken().returning(|_| Ok(false));
        repo.expect_create()
            .withf(|code, input, creator| {
                DROPSHIPPER_CODE.matches(code)
                    && input.email == "asha@example.com"
                    && creator.role.is_admin()
            })
            .times(1)
            .returning(|code, _, _| {
                let mut created = profile(7, false);
                created.dropshipper.unique_code = code;
                Ok(created)
            });

        let service = DropshipperManager::new(Arc::new(repo), codes());
        let created = service
            .create_dropshipper(&session(Actor::admin(1)), registration(None))
            .await
            .unwrap();

        assert!(DROPSHIPPER_CODE.matches(&created.dropshipper.unique_code));
    }

    #[tokio::test]
    async fn test_only_admins_register_dropshippers() {
        let service =
            DropshipperManager::new(Arc::new(MockDropshipperRepository::new()), codes());

        let result = service
            .create_dropshipper(&session(Actor::supplier(3)), registration(None))
            .await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[tokio::test]
    async fn test_trashed_account_is_hidden_from_its_owner() {
        let mut repo = MockDropshipperRepository::new();
        repo.expect_find_profile()
            .returning(|id| Ok(Some(profile(id, true))));

        let service = DropshipperManager::new(Arc::new(repo), codes());

        let own = service.get_dropshipper(&session(Actor::dropshipper(7)), 7).await;
        assert!(matches!(own, Err(AppError::NotFound(_))));

        let admin = service.get_dropshipper(&session(Actor::admin(1)), 7).await;
        assert!(admin.unwrap().dropshipper.audit.is_trashed());
    }
}
