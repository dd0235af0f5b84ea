//! Business logic services.
//!
//! Every operation takes the caller's [`SessionContext`]; the helpers here
//! turn it into the acting [`Actor`] or a typed authorization error.

mod bank_account_service;
mod catalog_service;
mod code_generator;
mod company_service;
mod container;
mod dropshipper_product_service;
mod dropshipper_service;
mod product_service;
mod staff_service;
mod ticket_service;

use chrono::Utc;

use common::{AppError, AppResult};
use domain::{Actor, ActorRole, SessionContext};

pub use bank_account_service::{BankAccountManager, BankAccountService};
pub use catalog_service::{CatalogManager, CatalogService};
pub use code_generator::CodeGenerator;
pub use company_service::{CompanyDetailManager, CompanyDetailService};
pub use container::Services;
pub use dropshipper_product_service::{DropshipperProductManager, DropshipperProductService};
pub use dropshipper_service::{DropshipperManager, DropshipperService};
pub use product_service::{ProductManager, ProductService};
pub use staff_service::{StaffManager, StaffService};
pub use ticket_service::{TicketManager, TicketService};

/// Inserts guarded by a generated code are retried this many times when the
/// unique index rejects the code.
pub(crate) const MAX_INSERT_ATTEMPTS: usize = 5;

/// Actor of a valid session.
pub(crate) fn authorize(session: &SessionContext) -> AppResult<Actor> {
    Ok(session.authorize(Utc::now())?)
}

/// Actor of a valid admin session.
pub(crate) fn authorize_admin(session: &SessionContext) -> AppResult<Actor> {
    Ok(session.require_role(Utc::now(), &[ActorRole::Admin])?)
}

/// Actor allowed to act on records owned by `owner_id`: an admin, or the owner.
pub(crate) fn authorize_owner(session: &SessionContext, owner_id: i64) -> AppResult<Actor> {
    let actor = authorize(session)?;
    if actor.role.is_admin() || actor.id == owner_id {
        Ok(actor)
    } else {
        Err(AppError::Forbidden)
    }
}

/// Owner a listing is scoped to: admins see everything, others only their own.
pub(crate) fn listing_scope(actor: &Actor) -> Option<i64> {
    if actor.role.is_admin() {
        None
    } else {
        Some(actor.id)
    }
}
