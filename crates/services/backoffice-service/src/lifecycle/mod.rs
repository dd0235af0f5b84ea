//! Soft-delete lifecycle shared by every trashable entity.
//!
//! An entity describes itself once through [`SoftDelete`] (id, status and
//! audit columns, dependents); [`LifecycleManager`] provides soft delete,
//! restore, permanent delete and status listing on top of that description.

mod entities;
mod manager;
mod soft_delete;

pub use manager::LifecycleManager;
pub use soft_delete::{stamp_change, status_condition, AuditColumns, ChildOf, Dependent, SoftDelete};
