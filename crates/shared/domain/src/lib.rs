//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! actors and sessions, the audit trail and listing filters shared by every
//! soft-deletable record, reference-code formats, and the back-office
//! entities (dropshippers, staff, catalog, tickets).

pub mod actor;
pub mod audit;
pub mod code;
pub mod constants;
pub mod dropshipper;
pub mod error;
pub mod gallery;
pub mod product;
pub mod reference;
pub mod serde_helpers;
pub mod session;
pub mod staff;
pub mod status;
pub mod ticket;
pub mod validation;
pub mod variant;

pub use actor::{Actor, ActorRole};
pub use audit::{AuditTrail, ChangeStamp, LifecycleChange};
pub use code::{CodeFormat, DROPSHIPPER_CODE, TICKET_NUMBER};
pub use constants::*;
pub use dropshipper::{
    BankAccount, CompanyDetail, CompanyDetailInput, Dropshipper, DropshipperProfile, KycDecision,
    KycStatus, NewBankAccount, NewDropshipper, UpdateDropshipper,
};
pub use error::{DomainError, DomainResult};
pub use gallery::{Gallery, GalleryRemoval};
pub use product::{
    CatalogListing, CatalogMode, CatalogProduct, DropshipperProduct, DropshipperProductVariant,
    NewDropshipperProduct, NewProduct, PricedVariant, Product, ProductVariant, UpdateProduct,
    VariantPrice,
};
pub use reference::Reference;
pub use session::SessionContext;
pub use staff::{NewStaff, Staff, UpdateStaff};
pub use status::{parse_flag, ListStatus};
pub use ticket::{NewTicket, Ticket, TicketState};
pub use variant::{reconcile_variants, VariantInput, VariantPlan};
