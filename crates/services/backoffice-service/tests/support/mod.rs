//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, ConnectionTrait, DatabaseConnection, Set, Statement};

use backoffice_service_lib::infra::{Database, FileStorage};
use backoffice_service_lib::repository::entities::{admin, AuditedActiveModel};
use backoffice_service_lib::repository::CodeStore;
use backoffice_service_lib::service::Services;
use common::{AppError, AppResult, DatabaseConfig};
use domain::{
    Actor, CompanyDetailInput, NewBankAccount, NewDropshipper, NewProduct, NewStaff,
    SessionContext, VariantInput, ROLE_SUPPLIER,
};

/// Fresh in-memory database with every migration applied.
///
/// A single pooled connection keeps the whole test on one SQLite database.
pub async fn setup_db() -> DatabaseConnection {
    let config = DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        max_connections: 1,
        min_connections: 1,
        ..DatabaseConfig::default()
    };
    Database::connect(&config)
        .await
        .expect("in-memory database")
        .get_connection()
}

pub fn services(db: &DatabaseConnection, storage: Arc<dyn FileStorage>) -> Services {
    Services::from_connection(db.clone(), storage)
}

pub fn session(actor: Actor) -> SessionContext {
    SessionContext::new(actor, Duration::minutes(30))
}

pub fn admin_session() -> SessionContext {
    session(Actor::admin(1))
}

pub async fn execute(db: &DatabaseConnection, sql: &str) {
    db.execute(Statement::from_string(db.get_database_backend(), sql.to_string()))
        .await
        .expect("raw statement");
}

/// Insert a supplier account and return its id
pub async fn seed_supplier(db: &DatabaseConnection, email: &str) -> i64 {
    let mut supplier = admin::ActiveModel {
        role: Set(ROLE_SUPPLIER.to_string()),
        unique_code: Set(None),
        name: Set("Acme Supplies".to_string()),
        email: Set(email.to_string()),
        phone: Set(None),
        shopify_domain: Set(None),
        status: Set(true),
        ..Default::default()
    };
    supplier.stamp_created(Some(&Actor::admin(1)), Utc::now());
    supplier.insert(db).await.expect("supplier row").id
}

pub fn new_dropshipper(name: &str, email: &str) -> NewDropshipper {
    NewDropshipper {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        shopify_domain: None,
        status: true,
        company: Some(CompanyDetailInput {
            legal_name: format!("{} Pvt Ltd", name),
            gstin: None,
            pan: None,
            billing_address: Some("12 MG Road, Pune".to_string()),
        }),
    }
}

pub fn bank_account(account_number: &str) -> NewBankAccount {
    NewBankAccount {
        holder_name: "Asha Traders".to_string(),
        account_number: account_number.to_string(),
        ifsc: "HDFC0001234".to_string(),
        bank_name: "HDFC Bank".to_string(),
    }
}

pub fn new_staff(name: &str, email: &str) -> NewStaff {
    NewStaff {
        name: name.to_string(),
        email: email.to_string(),
        phone: None,
        permissions: vec!["orders".to_string()],
        status: true,
    }
}

pub fn variant(sku: &str, price: i64) -> VariantInput {
    VariantInput {
        sku: sku.to_string(),
        name: format!("Variant {}", sku),
        price,
        stock: 5,
    }
}

pub fn new_product(sku: &str, variants: Vec<VariantInput>) -> NewProduct {
    NewProduct {
        name: format!("Product {}", sku),
        description: None,
        sku: sku.to_string(),
        status: true,
        variants,
    }
}

/// Storage fake recording every delete request.
#[derive(Default)]
pub struct RecordingStorage {
    pub deleted: Mutex<Vec<PathBuf>>,
    pub fail_with: Option<String>,
}

impl RecordingStorage {
    pub fn failing(message: &str) -> Self {
        Self {
            deleted: Mutex::new(Vec::new()),
            fail_with: Some(message.to_string()),
        }
    }

    pub fn deleted(&self) -> Vec<PathBuf> {
        self.deleted.lock().expect("storage log").clone()
    }
}

#[async_trait]
impl FileStorage for RecordingStorage {
    fn resolve(&self, file_name: &str) -> PathBuf {
        Path::new("/uploads").join(file_name)
    }

    async fn delete(&self, path: &Path) -> AppResult<()> {
        self.deleted.lock().expect("storage log").push(path.to_path_buf());
        match &self.fail_with {
            Some(message) => Err(AppError::internal(message.clone())),
            None => Ok(()),
        }
    }
}

/// Code store answering from an in-memory set.
#[derive(Default)]
pub struct MemoryCodeStore {
    pub taken: Mutex<HashSet<String>>,
}

impl MemoryCodeStore {
    pub fn claim(&self, code: &str) -> bool {
        self.taken.lock().expect("code set").insert(code.to_string())
    }
}

#[async_trait]
impl CodeStore for MemoryCodeStore {
    async fn is_taken(&self, code: &str) -> AppResult<bool> {
        Ok(self.taken.lock().expect("code set").contains(code))
    }
}
