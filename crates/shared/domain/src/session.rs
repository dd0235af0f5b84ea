//! Explicit per-request session context.
//!
//! Callers build a `SessionContext` once per request and hand it to the
//! service layer. Expiry and role checks return typed errors.

use chrono::{DateTime, Duration, Utc};

use crate::actor::{Actor, ActorRole};
use crate::error::{DomainError, DomainResult};

#[derive(Debug, Clone)]
pub struct SessionContext {
    actor: Actor,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl SessionContext {
    /// Start a session valid for `ttl` from now.
    pub fn new(actor: Actor, ttl: Duration) -> Self {
        let issued_at = Utc::now();
        Self {
            actor,
            issued_at,
            expires_at: issued_at + ttl,
        }
    }

    /// Rebuild a session from previously issued bounds.
    pub fn restore(actor: Actor, issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> Self {
        Self {
            actor,
            issued_at,
            expires_at,
        }
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Check if the session is past its expiry at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Return the acting account if the session is still valid.
    pub fn authorize(&self, now: DateTime<Utc>) -> DomainResult<Actor> {
        if self.is_expired_at(now) {
            return Err(DomainError::Unauthenticated);
        }
        Ok(self.actor)
    }

    /// Like [`authorize`](Self::authorize), additionally requiring one of `roles`.
    pub fn require_role(&self, now: DateTime<Utc>, roles: &[ActorRole]) -> DomainResult<Actor> {
        let actor = self.authorize(now)?;
        if !roles.contains(&actor.role) {
            return Err(DomainError::Forbidden);
        }
        Ok(actor)
    }
}
