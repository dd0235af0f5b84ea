//! Support ticket database entity for SeaORM.

use sea_orm::entity::prelude::*;

use domain::{Ticket, TicketState};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub ticket_number: String,
    pub admin_id: i64,
    pub subject: String,
    pub message: String,
    pub state: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Ticket {
    fn from(model: Model) -> Self {
        Ticket {
            id: model.id,
            ticket_number: model.ticket_number,
            admin_id: model.admin_id,
            subject: model.subject,
            message: model.message,
            state: model.state.parse().unwrap_or(TicketState::Open),
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
