//! Infrastructure layer - database, transactions and file storage.

mod db;
pub mod migrations;
pub mod storage;
mod unit_of_work;

pub use db::Database;
pub use migrations::Migrator;
pub use storage::{FileStorage, LocalStorage};
#[cfg(any(test, feature = "test-utils"))]
pub use storage::MockFileStorage;
pub use unit_of_work::{Persistence, TransactionContext, TxFuture};
