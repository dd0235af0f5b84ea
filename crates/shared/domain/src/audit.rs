//! Role-stamped audit trail shared by every soft-deletable record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorRole};
use crate::serde_helpers;

/// Who changed a record, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangeStamp {
    pub at: DateTime<Utc>,
    pub by: i64,
    pub by_role: ActorRole,
}

impl ChangeStamp {
    pub fn new(actor: &Actor, at: DateTime<Utc>) -> Self {
        Self {
            at,
            by: actor.id,
            by_role: actor.role,
        }
    }

    pub fn now(actor: &Actor) -> Self {
        Self::new(actor, Utc::now())
    }
}

/// State change of the `deleted_at / deleted_by / deleted_by_role` triple.
///
/// The three columns only ever change through this value, so they are set
/// or cleared together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleChange {
    /// Stamp the triple (soft delete)
    Trash(ChangeStamp),
    /// Clear the triple, recording the restoring actor as the last updater
    Restore(ChangeStamp),
}

impl LifecycleChange {
    pub fn trash(actor: &Actor) -> Self {
        LifecycleChange::Trash(ChangeStamp::now(actor))
    }

    pub fn restore(actor: &Actor) -> Self {
        LifecycleChange::Restore(ChangeStamp::now(actor))
    }

    /// Deletion stamp to write, `None` when clearing
    pub fn deletion(&self) -> Option<ChangeStamp> {
        match self {
            LifecycleChange::Trash(stamp) => Some(*stamp),
            LifecycleChange::Restore(_) => None,
        }
    }

    /// Update stamp to write alongside the deletion triple, if any.
    ///
    /// Soft delete leaves `updated_*` untouched.
    pub fn update(&self) -> Option<ChangeStamp> {
        match self {
            LifecycleChange::Trash(_) => None,
            LifecycleChange::Restore(stamp) => Some(*stamp),
        }
    }

    pub fn verb(&self) -> &'static str {
        match self {
            LifecycleChange::Trash(_) => "soft deleting",
            LifecycleChange::Restore(_) => "restoring",
        }
    }

    /// Past tense used in success messages
    pub fn outcome(&self) -> &'static str {
        match self {
            LifecycleChange::Trash(_) => "soft deleted",
            LifecycleChange::Restore(_) => "restored",
        }
    }
}

/// Audit columns as exposed to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditTrail {
    pub created_at: DateTime<Utc>,
    #[serde(with = "serde_helpers::option_id")]
    pub created_by: Option<i64>,
    pub created_by_role: Option<ActorRole>,
    pub updated_at: DateTime<Utc>,
    #[serde(with = "serde_helpers::option_id")]
    pub updated_by: Option<i64>,
    pub updated_by_role: Option<ActorRole>,
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(with = "serde_helpers::option_id")]
    pub deleted_by: Option<i64>,
    pub deleted_by_role: Option<ActorRole>,
}

impl AuditTrail {
    /// Trail of a record created by `creator` at `at`.
    pub fn created(creator: Option<&Actor>, at: DateTime<Utc>) -> Self {
        Self {
            created_at: at,
            created_by: creator.map(|a| a.id),
            created_by_role: creator.map(|a| a.role),
            updated_at: at,
            updated_by: creator.map(|a| a.id),
            updated_by_role: creator.map(|a| a.role),
            deleted_at: None,
            deleted_by: None,
            deleted_by_role: None,
        }
    }

    /// Check if record is soft deleted
    pub fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Check if record is live (not deleted)
    pub fn is_live(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Apply a lifecycle change in memory.
    pub fn apply(&mut self, change: &LifecycleChange) {
        match change.deletion() {
            Some(stamp) => {
                self.deleted_at = Some(stamp.at);
                self.deleted_by = Some(stamp.by);
                self.deleted_by_role = Some(stamp.by_role);
            }
            None => {
                self.deleted_at = None;
                self.deleted_by = None;
                self.deleted_by_role = None;
            }
        }
        if let Some(stamp) = change.update() {
            self.touch(&stamp);
        }
    }

    /// Record a mutating write.
    pub fn touch(&mut self, stamp: &ChangeStamp) {
        self.updated_at = stamp.at;
        self.updated_by = Some(stamp.by);
        self.updated_by_role = Some(stamp.by_role);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trash_sets_full_triple_and_keeps_updater() {
        let creator = Actor::supplier(3);
        let mut trail = AuditTrail::created(Some(&creator), Utc::now());

        trail.apply(&LifecycleChange::trash(&Actor::admin(1)));

        assert!(trail.is_trashed());
        assert_eq!(trail.deleted_by, Some(1));
        assert_eq!(trail.deleted_by_role, Some(ActorRole::Admin));
        assert_eq!(trail.updated_by, Some(3));
    }

    #[test]
    fn test_restore_clears_triple_and_stamps_restorer() {
        let mut trail = AuditTrail::created(Some(&Actor::supplier(3)), Utc::now());
        trail.apply(&LifecycleChange::trash(&Actor::admin(1)));

        trail.apply(&LifecycleChange::restore(&Actor::dropshipper(8)));

        assert!(trail.is_live());
        assert_eq!(trail.deleted_by, None);
        assert_eq!(trail.deleted_by_role, None);
        assert_eq!(trail.updated_by, Some(8));
        assert_eq!(trail.updated_by_role, Some(ActorRole::Dropshipper));
        assert_eq!(trail.created_by, Some(3));
    }

    #[test]
    fn test_trail_serializes_camel_case_with_string_ids() {
        let trail = AuditTrail::created(Some(&Actor::admin(12)), Utc::now());
        let json = serde_json::to_value(&trail).unwrap();

        assert_eq!(json["createdBy"], "12");
        assert_eq!(json["createdByRole"], "admin");
        assert!(json["deletedAt"].is_null());
    }
}
