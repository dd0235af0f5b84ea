//! Operator lifecycle commands - trash, restore, purge and list.
//!
//! Each command prints its envelope as JSON. A failed envelope turns into an
//! error so the process exits non-zero.

use std::sync::Arc;

use common::{AppError, AppResult, Envelope};
use domain::{Actor, SessionContext};

use crate::cli::{ListArgs, RecordArgs};
use crate::config::BackofficeConfig;
use crate::infra::{Database, LocalStorage};
use crate::operations::Operator;
use crate::service::Services;

pub async fn trash(args: RecordArgs, actor_id: i64, config: BackofficeConfig) -> AppResult<()> {
    let (operator, session) = connect(actor_id, &config).await?;
    report(operator.trash(&session, args.entity, args.id).await)
}

pub async fn restore(args: RecordArgs, actor_id: i64, config: BackofficeConfig) -> AppResult<()> {
    let (operator, session) = connect(actor_id, &config).await?;
    report(operator.restore(&session, args.entity, args.id).await)
}

pub async fn purge(args: RecordArgs, actor_id: i64, config: BackofficeConfig) -> AppResult<()> {
    let (operator, session) = connect(actor_id, &config).await?;
    report(operator.purge(&session, args.entity, args.id).await)
}

pub async fn list(args: ListArgs, actor_id: i64, config: BackofficeConfig) -> AppResult<()> {
    let (operator, session) = connect(actor_id, &config).await?;
    report(operator.list(&session, args.entity, args.status).await)
}

/// Operator over a migrated database plus an admin session for `actor_id`
async fn connect(actor_id: i64, config: &BackofficeConfig) -> AppResult<(Operator, SessionContext)> {
    let db = Database::connect(&config.database)
        .await
        .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?;

    let storage = Arc::new(LocalStorage::new(config.storage.upload_dir.clone()));
    let operator = Operator::new(Services::from_connection(db.get_connection(), storage));
    let session = SessionContext::new(Actor::admin(actor_id), config.session_ttl());

    Ok((operator, session))
}

fn report(envelope: Envelope) -> AppResult<()> {
    let json = serde_json::to_string_pretty(&envelope)
        .map_err(|e| AppError::internal(format!("Failed to render envelope: {}", e)))?;
    println!("{}", json);

    if envelope.status {
        Ok(())
    } else {
        Err(AppError::operation_failed(
            envelope.message.unwrap_or_default(),
        ))
    }
}
