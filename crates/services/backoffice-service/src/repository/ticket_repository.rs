//! Support ticket repository.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use common::{AppError, AppResult, OptionExt};
use domain::{NewTicket, Ticket, TicketState};

use super::entities::ticket;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Insert a ticket under `ticket_number`.
    ///
    /// Fails with a unique violation if the number was taken concurrently.
    async fn create(&self, ticket_number: String, admin_id: i64, input: NewTicket)
        -> AppResult<Ticket>;

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Ticket>>;

    async fn find_by_number(&self, ticket_number: &str) -> AppResult<Option<Ticket>>;

    /// Tickets newest first, optionally only those raised by `admin_id`
    async fn list(&self, admin_id: Option<i64>) -> AppResult<Vec<Ticket>>;

    async fn set_state(&self, id: i64, state: TicketState) -> AppResult<Ticket>;
}

pub struct TicketStore {
    db: DatabaseConnection,
}

impl TicketStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TicketRepository for TicketStore {
    async fn create(
        &self,
        ticket_number: String,
        admin_id: i64,
        input: NewTicket,
    ) -> AppResult<Ticket> {
        let now = Utc::now();
        let active = ticket::ActiveModel {
            ticket_number: Set(ticket_number),
            admin_id: Set(admin_id),
            subject: Set(input.subject),
            message: Set(input.message),
            state: Set(TicketState::Open.as_str().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let model = active.insert(&self.db).await.map_err(AppError::from)?;
        Ok(Ticket::from(model))
    }

    async fn find_by_id(&self, id: i64) -> AppResult<Option<Ticket>> {
        let model = ticket::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Ticket::from))
    }

    async fn find_by_number(&self, ticket_number: &str) -> AppResult<Option<Ticket>> {
        let model = ticket::Entity::find()
            .filter(ticket::Column::TicketNumber.eq(ticket_number))
            .one(&self.db)
            .await?;
        Ok(model.map(Ticket::from))
    }

    async fn list(&self, admin_id: Option<i64>) -> AppResult<Vec<Ticket>> {
        let mut query = ticket::Entity::find();
        if let Some(admin_id) = admin_id {
            query = query.filter(ticket::Column::AdminId.eq(admin_id));
        }

        let models = query
            .order_by_desc(ticket::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Ticket::from).collect())
    }

    async fn set_state(&self, id: i64, state: TicketState) -> AppResult<Ticket> {
        let model = ticket::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_not_found("Ticket")?;

        let mut active: ticket::ActiveModel = model.into();
        active.state = Set(state.as_str().to_string());
        active.updated_at = Set(Utc::now());

        let model = active.update(&self.db).await?;
        Ok(Ticket::from(model))
    }
}
