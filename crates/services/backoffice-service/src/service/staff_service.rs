//! Dropshipper staff service.

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult, OptionExt};
use domain::validation::check;
use domain::{
    Actor, ChangeStamp, LifecycleChange, ListStatus, NewStaff, SessionContext, Staff, UpdateStaff,
};

use super::{authorize, authorize_admin, authorize_owner, listing_scope};
use crate::repository::StaffRepository;

#[async_trait]
pub trait StaffService: Send + Sync {
    async fn create_staff(
        &self,
        session: &SessionContext,
        dropshipper_id: i64,
        input: NewStaff,
    ) -> AppResult<Staff>;

    async fn update_staff(
        &self,
        session: &SessionContext,
        id: i64,
        changes: UpdateStaff,
    ) -> AppResult<Staff>;

    async fn set_status(&self, session: &SessionContext, id: i64, status: bool)
        -> AppResult<Staff>;

    async fn list_staff(&self, session: &SessionContext, status: ListStatus)
        -> AppResult<Vec<Staff>>;

    async fn soft_delete(&self, session: &SessionContext, id: i64) -> AppResult<Staff>;

    async fn restore(&self, session: &SessionContext, id: i64) -> AppResult<Staff>;

    async fn permanent_delete(&self, session: &SessionContext, id: i64) -> AppResult<()>;
}

pub struct StaffManager {
    repo: Arc<dyn StaffRepository>,
}

impl StaffManager {
    pub fn new(repo: Arc<dyn StaffRepository>) -> Self {
        Self { repo }
    }

    async fn authorize_member(&self, session: &SessionContext, id: i64) -> AppResult<Actor> {
        let member = self.repo.find_by_id(id).await?.ok_or_not_found("Staff")?;
        authorize_owner(session, member.admin_id)
    }
}

#[async_trait]
impl StaffService for StaffManager {
    async fn create_staff(
        &self,
        session: &SessionContext,
        dropshipper_id: i64,
        mut input: NewStaff,
    ) -> AppResult<Staff> {
        let actor = authorize_owner(session, dropshipper_id)?;
        check(&input)?;
        input.email = input.email.trim().to_ascii_lowercase();

        if self.repo.email_taken(dropshipper_id, &input.email).await? {
            return Err(AppError::conflict("Email"));
        }

        let member = self.repo.create(dropshipper_id, input, actor).await?;
        tracing::info!(id = member.id, dropshipper_id, "Staff member created");
        Ok(member)
    }

    async fn update_staff(
        &self,
        session: &SessionContext,
        id: i64,
        changes: UpdateStaff,
    ) -> AppResult<Staff> {
        let actor = self.authorize_member(session, id).await?;
        check(&changes)?;
        self.repo.update(id, changes, ChangeStamp::now(&actor)).await
    }

    async fn set_status(
        &self,
        session: &SessionContext,
        id: i64,
        status: bool,
    ) -> AppResult<Staff> {
        let actor = self.authorize_member(session, id).await?;
        self.repo
            .set_status(id, status, ChangeStamp::now(&actor))
            .await
    }

    async fn list_staff(
        &self,
        session: &SessionContext,
        status: ListStatus,
    ) -> AppResult<Vec<Staff>> {
        let actor = authorize(session)?;
        self.repo.list(listing_scope(&actor), status).await
    }

    async fn soft_delete(&self, session: &SessionContext, id: i64) -> AppResult<Staff> {
        let actor = self.authorize_member(session, id).await?;
        self.repo.apply_lifecycle(id, LifecycleChange::trash(&actor)).await
    }

    async fn restore(&self, session: &SessionContext, id: i64) -> AppResult<Staff> {
        let actor = self.authorize_member(session, id).await?;
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
    use chrono::Duration;
    use mockall::predicate::eq;

    use crate::repository::MockStaffRepository;

    fn member(email: &str) -> NewStaff {
        NewStaff {
            name: "Ravi".to_string(),
            email: email.to_string(),
            phone: None,
            permissions: vec!["orders".to_string()],
            status: true,
        }
    }

    #[tokio::test]
    async fn test_email_is_unique_per_dropshipper() {
        let mut repo = MockStaffRepository::new();
        repo.expect_email_taken()
            .with(eq(4), eq("ravi@example.com"))
            .returning(|_, _| Ok(true));
        repo.expect_create().never();

        let service = StaffManager::new(Arc::new(repo));
        let session = SessionContext::new(Actor::dropshipper(4), Duration::minutes(5));

        let result = service
            .create_staff(&session, 4, member("Ravi@Example.com"))
            .await;

        assert!(matches!(result, Err(AppError::Conflict(ref what)) if what == "Email"));
    }

    #[tokio::test]
    async fn test_only_admins_purge_staff() {
        let mut repo = MockStaffRepository::new();
        repo.expect_permanent_delete().never();

        let service = StaffManager::new(Arc::new(repo));
        let session = SessionContext::new(Actor::dropshipper(4), Duration::minutes(5));

        let result = service.permanent_delete(&session, 11).await;

        assert!(matches!(result, Err(AppError::Forbidden)));
    }
}
