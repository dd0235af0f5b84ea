//! SeaORM entities and audit column plumbing.

pub mod admin;
pub mod bank_account;
pub mod company_detail;
pub mod dropshipper_product;
pub mod dropshipper_product_variant;
pub mod product;
pub mod product_variant;
pub mod staff;
pub mod ticket;

use chrono::{DateTime, Utc};
use sea_orm::Set;

use domain::{Actor, ActorRole, AuditTrail, ChangeStamp};

/// Read side of the shared audit columns.
pub trait AuditedModel {
    fn audit_trail(&self) -> AuditTrail;
}

/// Write side of the shared audit columns.
pub trait AuditedActiveModel {
    /// Set the created and updated stamps of a new row
    fn stamp_created(&mut self, creator: Option<&Actor>, at: DateTime<Utc>);

    /// Record a mutating write
    fn touch(&mut self, stamp: &ChangeStamp);
}

fn stored_role(role: &Option<String>) -> Option<ActorRole> {
    role.as_deref().map(ActorRole::from)
}

macro_rules! impl_audited {
    ($($entity:ident),+ $(,)?) => {
        $(
            impl AuditedModel for $entity::Model {
                fn audit_trail(&self) -> AuditTrail {
                    AuditTrail {
                        created_at: self.created_at,
                        created_by: self.created_by,
                        created_by_role: stored_role(&self.created_by_role),
                        updated_at: self.updated_at,
                        updated_by: self.updated_by,
                        updated_by_role: stored_role(&self.updated_by_role),
                        deleted_at: self.deleted_at,
                        deleted_by: self.deleted_by,
                        deleted_by_role: stored_role(&self.deleted_by_role),
                    }
                }
            }

            impl AuditedActiveModel for $entity::ActiveModel {
                fn stamp_created(&mut self, creator: Option<&Actor>, at: DateTime<Utc>) {
                    self.created_at = Set(at);
                    self.created_by = Set(creator.map(|a| a.id));
                    self.created_by_role = Set(creator.map(|a| a.role.into()));
                    self.updated_at = Set(at);
                    self.updated_by = Set(creator.map(|a| a.id));
                    self.updated_by_role = Set(creator.map(|a| a.role.into()));
                    self.deleted_at = Set(None);
                    self.deleted_by = Set(None);
                    self.deleted_by_role = Set(None);
                }

                fn touch(&mut self, stamp: &ChangeStamp) {
                    self.updated_at = Set(stamp.at);
                    self.updated_by = Set(Some(stamp.by));
                    self.updated_by_role = Set(Some(stamp.by_role.into()));
                }
            }
        )+
    };
}

impl_audited!(
    admin,
    company_detail,
    bank_account,
    staff,
    product,
    dropshipper_product,
    dropshipper_product_variant,
);
