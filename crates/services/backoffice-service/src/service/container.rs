//! Service container - wires repositories, generators and storage into services.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use domain::{ActorRole, DROPSHIPPER_CODE, TICKET_NUMBER};

use super::{
    BankAccountManager, BankAccountService, CatalogManager, CatalogService, CodeGenerator,
    CompanyDetailManager, CompanyDetailService, DropshipperManager, DropshipperProductManager,
    DropshipperProductService, DropshipperService, ProductManager, ProductService, StaffManager,
    StaffService, TicketManager, TicketService,
};
use crate::infra::FileStorage;
use crate::repository::{
    AccountCodeStore, BankAccountStore, CompanyDetailStore, DropshipperProductStore,
    DropshipperRepository, DropshipperStore, ProductRepository, ProductStore, StaffStore,
    TicketNumberStore, TicketStore,
};

/// Every back-office service behind its trait.
#[derive(Clone)]
pub struct Services {
    pub dropshippers: Arc<dyn DropshipperService>,
    pub company_details: Arc<dyn CompanyDetailService>,
    pub bank_accounts: Arc<dyn BankAccountService>,
    pub staff: Arc<dyn StaffService>,
    pub products: Arc<dyn ProductService>,
    pub dropshipper_products: Arc<dyn DropshipperProductService>,
    pub catalog: Arc<dyn CatalogService>,
    pub tickets: Arc<dyn TicketService>,
}

impl Services {
    /// Build the SeaORM-backed services over one connection pool
    pub fn from_connection(db: DatabaseConnection, storage: Arc<dyn FileStorage>) -> Self {
        let dropshipper_repo: Arc<dyn DropshipperRepository> =
            Arc::new(DropshipperStore::new(db.clone()));
        let product_repo: Arc<dyn ProductRepository> = Arc::new(ProductStore::new(db.clone()));
        let onboarding_repo = Arc::new(DropshipperProductStore::new(db.clone()));

        let dropshipper_codes = Arc::new(CodeGenerator::new(
            DROPSHIPPER_CODE,
            Arc::new(AccountCodeStore::new(db.clone(), ActorRole::Dropshipper)),
        ));
        let ticket_numbers = Arc::new(CodeGenerator::new(
            TICKET_NUMBER,
            Arc::new(TicketNumberStore::new(db.clone())),
        ));

        Self {
            dropshippers: Arc::new(DropshipperManager::new(
                dropshipper_repo.clone(),
                dropshipper_codes,
            )),
            company_details: Arc::new(CompanyDetailManager::new(
                Arc::new(CompanyDetailStore::new(db.clone())),
                dropshipper_repo,
            )),
            bank_accounts: Arc::new(BankAccountManager::new(Arc::new(BankAccountStore::new(
                db.clone(),
            )))),
            staff: Arc::new(StaffManager::new(Arc::new(StaffStore::new(db.clone())))),
            products: Arc::new(ProductManager::new(product_repo.clone(), storage)),
            dropshipper_products: Arc::new(DropshipperProductManager::new(
                onboarding_repo.clone(),
                product_repo.clone(),
            )),
            catalog: Arc::new(CatalogManager::new(product_repo, onboarding_repo)),
            tickets: Arc::new(TicketManager::new(
                Arc::new(TicketStore::new(db)),
                ticket_numbers,
            )),
        }
    }
}
