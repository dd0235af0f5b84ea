pub mod entities;

mod bank_account_repository;
mod code_store;
mod company_repository;
mod dropshipper_product_repository;
mod dropshipper_repository;
mod product_repository;
mod staff_repository;
mod ticket_repository;

pub use bank_account_repository::{BankAccountRepository, BankAccountStore};
pub use code_store::{AccountCodeStore, CodeStore, TicketNumberStore};
pub use company_repository::{CompanyDetailRepository, CompanyDetailStore};
pub use dropshipper_product_repository::{DropshipperProductRepository, DropshipperProductStore};
pub use dropshipper_repository::{DropshipperRepository, DropshipperStore};
pub use product_repository::{ProductRepository, ProductStore};
pub use staff_repository::{StaffRepository, StaffStore};
pub use ticket_repository::{TicketRepository, TicketStore};

#[cfg(any(test, feature = "test-utils"))]
pub use bank_account_repository::MockBankAccountRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use code_store::MockCodeStore;
#[cfg(any(test, feature = "test-utils"))]
pub use company_repository::MockCompanyDetailRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use dropshipper_product_repository::MockDropshipperProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use dropshipper_repository::MockDropshipperRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use product_repository::MockProductRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use staff_repository::MockStaffRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use ticket_repository::MockTicketRepository;
