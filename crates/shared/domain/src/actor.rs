//! Actors performing back-office operations and their roles.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{ROLE_ADMIN, ROLE_DROPSHIPPER, ROLE_SUPPLIER};
use crate::error::DomainError;
use crate::serde_helpers;

/// Actor roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Admin,
    Supplier,
    Dropshipper,
}

impl ActorRole {
    /// Stored representation of the role
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Admin => ROLE_ADMIN,
            ActorRole::Supplier => ROLE_SUPPLIER,
            ActorRole::Dropshipper => ROLE_DROPSHIPPER,
        }
    }

    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, ActorRole::Admin)
    }
}

/// Strict parsing for caller-supplied roles.
impl FromStr for ActorRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            ROLE_ADMIN => Ok(ActorRole::Admin),
            ROLE_SUPPLIER => Ok(ActorRole::Supplier),
            ROLE_DROPSHIPPER => Ok(ActorRole::Dropshipper),
            other => Err(DomainError::validation(format!("Invalid role: {}", other))),
        }
    }
}

/// Lenient conversion for values read back from storage.
///
/// Unknown values map to the least privileged role.
impl From<&str> for ActorRole {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or(ActorRole::Dropshipper)
    }
}

impl From<ActorRole> for String {
    fn from(role: ActorRole) -> Self {
        role.as_str().to_string()
    }
}

impl std::fmt::Display for ActorRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The account on whose behalf an operation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    #[serde(with = "serde_helpers::id")]
    pub id: i64,
    pub role: ActorRole,
}

impl Actor {
    pub fn new(id: i64, role: ActorRole) -> Self {
        Self { id, role }
    }

    pub fn admin(id: i64) -> Self {
        Self::new(id, ActorRole::Admin)
    }

    pub fn supplier(id: i64) -> Self {
        Self::new(id, ActorRole::Supplier)
    }

    pub fn dropshipper(id: i64) -> Self {
        Self::new(id, ActorRole::Dropshipper)
    }
}
