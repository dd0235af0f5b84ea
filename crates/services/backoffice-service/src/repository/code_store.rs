//! Lookups backing the human-readable code generator.

use async_trait::async_trait;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

use common::{AppError, AppResult};
use domain::ActorRole;

use super::entities::{admin, ticket};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Where generated codes must be unique.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait CodeStore: Send + Sync {
    /// Whether `code` is already assigned within this store's scope
    async fn is_taken(&self, code: &str) -> AppResult<bool>;
}

/// Account codes, unique among accounts of one role.
pub struct AccountCodeStore {
    db: DatabaseConnection,
    role: ActorRole,
}

impl AccountCodeStore {
    pub fn new(db: DatabaseConnection, role: ActorRole) -> Self {
        Self { db, role }
    }
}

#[async_trait]
impl CodeStore for AccountCodeStore {
    async fn is_taken(&self, code: &str) -> AppResult<bool> {
        let count = admin::Entity::find()
            .filter(admin::Column::Role.eq(self.role.as_str()))
            .filter(admin::Column::UniqueCode.eq(code))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(count > 0)
    }
}

/// Ticket numbers, unique across all tickets.
pub struct TicketNumberStore {
    db: DatabaseConnection,
}

impl TicketNumberStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CodeStore for TicketNumberStore {
    async fn is_taken(&self, code: &str) -> AppResult<bool> {
        let count = ticket::Entity::find()
            .filter(ticket::Column::TicketNumber.eq(code))
            .count(&self.db)
            .await
            .map_err(AppError::from)?;
        Ok(count > 0)
    }
}
