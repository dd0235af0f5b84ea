//! Support ticket service.

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult, OptionExt};
use domain::validation::check;
use domain::{NewTicket, SessionContext, Ticket, TicketState};

use super::{
    authorize, authorize_admin, authorize_owner, listing_scope, CodeGenerator, MAX_INSERT_ATTEMPTS,
};
use crate::repository::TicketRepository;

#[async_trait]
pub trait TicketService: Send + Sync {
    /// Raise a ticket under a fresh `TCKT-######` number
    async fn create_ticket(&self, session: &SessionContext, input: NewTicket) -> AppResult<Ticket>;

    async fn get_ticket(&self, session: &SessionContext, ticket_number: &str) -> AppResult<Ticket>;

    /// All tickets for admins, otherwise the caller's own
    async fn list_tickets(&self, session: &SessionContext) -> AppResult<Vec<Ticket>>;

    async fn change_state(
        &self,
        session: &SessionContext,
        id: i64,
        state: TicketState,
    ) -> AppResult<Ticket>;
}

pub struct TicketManager {
    repo: Arc<dyn TicketRepository>,
    numbers: Arc<CodeGenerator>,
}

impl TicketManager {
    pub fn new(repo: Arc<dyn TicketRepository>, numbers: Arc<CodeGenerator>) -> Self {
        Self { repo, numbers }
    }
}

#[async_trait]
impl TicketService for TicketManager {
    async fn create_ticket(&self, session: &SessionContext, input: NewTicket) -> AppResult<Ticket> {
        let actor = authorize(session)?;
        check(&input)?;

        let mut attempt = 1;
        loop {
            let number = self.numbers.generate().await?;
            match self.repo.create(number.clone(), actor.id, input.clone()).await {
                Ok(ticket) => {
                    tracing::info!(
                        id = ticket.id,
                        number = %number,
                        admin_id = actor.id,
                        "Ticket created"
                    );
                    return Ok(ticket);
                }
                Err(e) if e.is_unique_violation() && attempt < MAX_INSERT_ATTEMPTS => {
                    tracing::warn!(
                        number = %number,
                        attempt,
                        "Ticket number taken on insert, redrawing"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn get_ticket(&self, session: &SessionContext, ticket_number: &str) -> AppResult<Ticket> {
        let ticket = self
            .repo
            .find_by_number(ticket_number.trim())
            .await?
            .ok_or_not_found("Ticket")?;
        authorize_owner(session, ticket.admin_id)?;
        Ok(ticket)
    }

    async fn list_tickets(&self, session: &SessionContext) -> AppResult<Vec<Ticket>> {
        let actor = authorize(session)?;
        self.repo.list(listing_scope(&actor)).await
    }

    async fn change_state(
        &self,
        session: &SessionContext,
        id: i64,
        state: TicketState,
    ) -> AppResult<Ticket> {
        authorize_admin(session)?;

        let ticket = self.repo.find_by_id(id).await?.ok_or_not_found("Ticket")?;
        if !ticket.state.can_transition_to(state) {
            return Err(AppError::validation(format!(
                "Cannot move ticket from {} to {}",
                ticket.state.as_str(),
                state.as_str()
            )));
        }

        let ticket = self.repo.set_state(id, state).await?;
        tracing::info!(id, state = state.as_str(), "Ticket state changed");
        Ok(ticket)
    }
}
