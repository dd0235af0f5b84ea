//! Support tickets.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;
use crate::serde_helpers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketState {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketState::Open => "open",
            TicketState::InProgress => "in_progress",
            TicketState::Resolved => "resolved",
            TicketState::Closed => "closed",
        }
    }

    /// Closed tickets cannot change state again
    pub fn can_transition_to(&self, next: TicketState) -> bool {
        !matches!(self, TicketState::Closed) && *self != next
    }
}

impl FromStr for TicketState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(TicketState::Open),
            "in_progress" => Ok(TicketState::InProgress),
            "resolved" => Ok(TicketState::Resolved),
            "closed" => Ok(TicketState::Closed),
            other => Err(DomainError::validation(format!("Invalid ticket state: {}", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[serde(with = "serde_helpers::id")]
    pub id: i64,
    /// Human-readable reference, e.g. `TCKT-482913`
    pub ticket_number: String,
    #[serde(with = "serde_helpers::id")]
    pub admin_id: i64,
    pub subject: String,
    pub message: String,
    pub state: TicketState,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewTicket {
    #[validate(length(min = 1, max = 200, message = "Subject must be 1 to 200 characters"))]
    pub subject: String,
    #[validate(length(min = 1, message = "Message is required"))]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_ticket_is_final() {
        assert!(TicketState::Open.can_transition_to(TicketState::InProgress));
        assert!(TicketState::Resolved.can_transition_to(TicketState::Open));
        assert!(!TicketState::Closed.can_transition_to(TicketState::Open));
        assert!(!TicketState::Open.can_transition_to(TicketState::Open));
    }

    #[test]
    fn test_state_round_trip() {
        for state in [
            TicketState::Open,
            TicketState::InProgress,
            TicketState::Resolved,
            TicketState::Closed,
        ] {
            assert_eq!(state.as_str().parse::<TicketState>().unwrap(), state);
        }
    }
}
