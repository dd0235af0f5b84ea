//! Operator facade over the soft-deletable resources.
//!
//! Dispatches trash, restore, purge and list requests to the owning service
//! and answers with the response [`Envelope`].

use serde::Serialize;

use common::{AppResult, Envelope};
use domain::{ListStatus, SessionContext};

use crate::service::Services;

/// Soft-deletable resource addressed by an operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EntityKind {
    Dropshipper,
    CompanyDetail,
    BankAccount,
    Staff,
    Product,
    DropshipperProduct,
}

impl EntityKind {
    /// Human label used in messages
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Dropshipper => "Dropshipper",
            EntityKind::CompanyDetail => "Company detail",
            EntityKind::BankAccount => "Bank account",
            EntityKind::Staff => "Staff",
            EntityKind::Product => "Product",
            EntityKind::DropshipperProduct => "Dropshipper product",
        }
    }

    /// Envelope key for a single record
    pub fn key(&self) -> &'static str {
        match self {
            EntityKind::Dropshipper => "dropshipper",
            EntityKind::CompanyDetail => "companyDetail",
            EntityKind::BankAccount => "bankAccount",
            EntityKind::Staff => "staff",
            EntityKind::Product => "product",
            EntityKind::DropshipperProduct => "dropshipperProduct",
        }
    }

    /// Envelope key for a listing
    pub fn plural_key(&self) -> &'static str {
        match self {
            EntityKind::Dropshipper => "dropshippers",
            EntityKind::CompanyDetail => "companyDetails",
            EntityKind::BankAccount => "bankAccounts",
            EntityKind::Staff => "staff",
            EntityKind::Product => "products",
            EntityKind::DropshipperProduct => "dropshipperProducts",
        }
    }
}

pub struct Operator {
    services: Services,
}

impl Operator {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    /// Soft delete a record and its dependents
    pub async fn trash(&self, session: &SessionContext, kind: EntityKind, id: i64) -> Envelope {
        respond(kind, self.try_trash(session, kind, id).await)
    }

    /// Bring a trashed record and its dependents back
    pub async fn restore(&self, session: &SessionContext, kind: EntityKind, id: i64) -> Envelope {
        respond(kind, self.try_restore(session, kind, id).await)
    }

    /// Remove a record for good
    pub async fn purge(&self, session: &SessionContext, kind: EntityKind, id: i64) -> Envelope {
        let result = self.try_purge(session, kind, id).await.map(|()| {
            Envelope::message(format!("{} permanently deleted successfully", kind.label()))
        });
        respond(kind, result)
    }

    /// Records matching `status` within the session's visibility
    pub async fn list(
        &self,
        session: &SessionContext,
        kind: EntityKind,
        status: ListStatus,
    ) -> Envelope {
        respond(kind, self.try_list(session, kind, status).await)
    }

    async fn try_trash(
        &self,
        session: &SessionContext,
        kind: EntityKind,
        id: i64,
    ) -> AppResult<Envelope> {
        let s = &self.services;
        let message = format!("{} soft deleted successfully", kind.label());
        match kind {
            EntityKind::Dropshipper => {
                single(message, kind, &s.dropshippers.soft_delete(session, id).await?)
            }
            EntityKind::CompanyDetail => {
                single(message, kind, &s.company_details.soft_delete(session, id).await?)
            }
            EntityKind::BankAccount => {
                single(message, kind, &s.bank_accounts.soft_delete(session, id).await?)
            }
            EntityKind::Staff => single(message, kind, &s.staff.soft_delete(session, id).await?),
            EntityKind::Product => {
                single(message, kind, &s.products.soft_delete(session, id).await?)
            }
            EntityKind::DropshipperProduct => single(
                message,
                kind,
                &s.dropshipper_products.soft_delete(session, id).await?,
            ),
        }
    }

    async fn try_restore(
        &self,
        session: &SessionContext,
        kind: EntityKind,
        id: i64,
    ) -> AppResult<Envelope> {
        let s = &self.services;
        let message = format!("{} restored successfully", kind.label());
        match kind {
            EntityKind::Dropshipper => {
                single(message, kind, &s.dropshippers.restore(session, id).await?)
            }
            EntityKind::CompanyDetail => {
                single(message, kind, &s.company_details.restore(session, id).await?)
            }
            EntityKind::BankAccount => {
                single(message, kind, &s.bank_accounts.restore(session, id).await?)
            }
            EntityKind::Staff => single(message, kind, &s.staff.restore(session, id).await?),
            EntityKind::Product => single(message, kind, &s.products.restore(session, id).await?),
            EntityKind::DropshipperProduct => single(
                message,
                kind,
                &s.dropshipper_products.restore(session, id).await?,
            ),
        }
    }

    async fn try_purge(&self, session: &SessionContext, kind: EntityKind, id: i64) -> AppResult<()> {
        let s = &self.services;
        match kind {
            EntityKind::Dropshipper => s.dropshippers.permanent_delete(session, id).await,
            EntityKind::CompanyDetail => s.company_details.permanent_delete(session, id).await,
            EntityKind::BankAccount => s.bank_accounts.permanent_delete(session, id).await,
            EntityKind::Staff => s.staff.permanent_delete(session, id).await,
            EntityKind::Product => s.products.permanent_delete(session, id).await,
            EntityKind::DropshipperProduct => {
                s.dropshipper_products.permanent_delete(session, id).await
            }
        }
    }

    async fn try_list(
        &self,
        session: &SessionContext,
        kind: EntityKind,
        status: ListStatus,
    ) -> AppResult<Envelope> {
        let s = &self.services;
        let key = kind.plural_key();
        match kind {
            EntityKind::Dropshipper => {
                Envelope::ok().with(key, &s.dropshippers.list_dropshippers(session, status).await?)
            }
            EntityKind::CompanyDetail => Envelope::ok().with(
                key,
                &s.company_details.list_company_details(session, status).await?,
            ),
            EntityKind::BankAccount => Envelope::ok().with(
                key,
                &s.bank_accounts.list_bank_accounts(session, status).await?,
            ),
            EntityKind::Staff => Envelope::ok().with(key, &s.staff.list_staff(session, status).await?),
            EntityKind::Product => {
                Envelope::ok().with(key, &s.products.list_products(session, status).await?)
            }
            EntityKind::DropshipperProduct => Envelope::ok().with(
                key,
                &s.dropshipper_products.list_products(session, status).await?,
            ),
        }
    }
}

fn single<T: Serialize>(message: String, kind: EntityKind, value: &T) -> AppResult<Envelope> {
    Envelope::message(message).with(kind.key(), value)
}

fn respond(kind: EntityKind, result: AppResult<Envelope>) -> Envelope {
    match result {
        Ok(envelope) => envelope,
        Err(err) => {
            tracing::warn!(entity = kind.label(), error = %err, "Operator command failed");
            Envelope::from(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::ValueEnum;

    #[test]
    fn test_entity_names_on_the_command_line() {
        assert_eq!(
            EntityKind::from_str("dropshipper-product", false),
            Ok(EntityKind::DropshipperProduct)
        );
        assert_eq!(
            EntityKind::from_str("bank-account", false),
            Ok(EntityKind::BankAccount)
        );
        assert!(EntityKind::from_str("ticket", false).is_err());
    }

    #[test]
    fn test_labels_and_keys() {
        assert_eq!(EntityKind::CompanyDetail.label(), "Company detail");
        assert_eq!(EntityKind::CompanyDetail.key(), "companyDetail");
        assert_eq!(EntityKind::Product.plural_key(), "products");
    }
}
