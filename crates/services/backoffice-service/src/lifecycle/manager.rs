//! Generic soft delete, restore, permanent delete and status listing.

use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use sea_orm::{ColumnTrait, QueryFilter, QueryOrder, QuerySelect};

use common::{AppError, AppResult, OptionExt};
use domain::{Actor, LifecycleChange, ListStatus};

use super::soft_delete::{stamp_change, status_condition, SoftDelete};
use crate::infra::Persistence;
use crate::with_transaction;

/// Lifecycle operations for one soft-deletable entity.
pub struct LifecycleManager<E> {
    uow: Persistence,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for LifecycleManager<E> {
    fn clone(&self) -> Self {
        Self {
            uow: self.uow.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: SoftDelete> LifecycleManager<E> {
    pub fn new(uow: Persistence) -> Self {
        Self {
            uow,
            _entity: PhantomData,
        }
    }

    /// Find a record in any state
    pub async fn find(&self, id: i64) -> AppResult<Option<E::Model>> {
        E::find()
            .filter(E::id_column().eq(id))
            .filter(E::scope())
            .one(self.uow.connection())
            .await
            .map_err(AppError::from)
    }

    /// Find a live record
    pub async fn find_live(&self, id: i64) -> AppResult<Option<E::Model>> {
        E::find()
            .filter(E::id_column().eq(id))
            .filter(E::scope())
            .filter(E::audit_columns().deleted_at.is_null())
            .one(self.uow.connection())
            .await
            .map_err(AppError::from)
    }

    /// Stamp the deletion triple on the record and its dependents.
    ///
    /// Re-deleting a trashed record re-stamps it.
    pub async fn soft_delete(&self, id: i64, actor: &Actor) -> AppResult<E::Model> {
        self.apply(id, LifecycleChange::trash(actor)).await
    }

    /// Clear the deletion triple on the record and its dependents.
    pub async fn restore(&self, id: i64, actor: &Actor) -> AppResult<E::Model> {
        self.apply(id, LifecycleChange::restore(actor)).await
    }

    /// Apply a lifecycle change to the record and every dependent in one transaction.
    ///
    /// Dependents trashed on their own stay trashed when the record is restored.
    pub async fn apply(&self, id: i64, change: LifecycleChange) -> AppResult<E::Model> {
        self.find(id).await?.ok_or_not_found(E::LABEL)?;

        let outcome = with_transaction!(self.uow, |ctx| {
            let txn = ctx.conn();

            let trashed_at: Option<DateTime<Utc>> = E::find()
                .select_only()
                .column(E::audit_columns().deleted_at)
                .filter(E::id_column().eq(id))
                .filter(E::scope())
                .into_tuple::<Option<DateTime<Utc>>>()
                .one(txn)
                .await?
                .ok_or_not_found(E::LABEL)?;

            stamp_change::<E>(E::update_many(), &change)
                .filter(E::id_column().eq(id))
                .filter(E::scope())
                .exec(txn)
                .await?;

            for dependent in E::dependents() {
                let rows = dependent.cascade(txn, id, trashed_at, &change).await?;
                tracing::debug!(
                    entity = E::LABEL,
                    dependent = dependent.label(),
                    rows,
                    "Cascaded {}",
                    change.verb()
                );
            }

            E::find()
                .filter(E::id_column().eq(id))
                .one(txn)
                .await?
                .ok_or_not_found(E::LABEL)
        });

        match outcome {
            Ok(model) => {
                tracing::info!(entity = E::LABEL, id, "{} {}", E::LABEL, change.outcome());
                Ok(model)
            }
            Err(AppError::Database(e)) => {
                tracing::error!(entity = E::LABEL, id, error = %e, "Error {} {}", change.verb(), E::LABEL);
                Err(AppError::operation_failed(format!(
                    "Error {} {}",
                    change.verb(),
                    E::LABEL
                )))
            }
            Err(e) => Err(e),
        }
    }

    /// Remove a trashed row. Dependents go with it through `ON DELETE CASCADE`.
    ///
    /// A live record has to be soft deleted first.
    pub async fn permanent_delete(&self, id: i64) -> AppResult<()> {
        let result = E::delete_many()
            .filter(E::id_column().eq(id))
            .filter(E::scope())
            .filter(E::audit_columns().deleted_at.is_not_null())
            .exec(self.uow.connection())
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return match self.find(id).await? {
                Some(_) => Err(AppError::validation(format!(
                    "{} must be trashed before permanent deletion",
                    E::LABEL
                ))),
                None => Err(AppError::not_found(E::LABEL)),
            };
        }

        tracing::warn!(entity = E::LABEL, id, "{} permanently deleted", E::LABEL);
        Ok(())
    }

    /// List records matching a status filter, optionally scoped to one owner.
    pub async fn list_by_status(
        &self,
        owner: Option<i64>,
        status: ListStatus,
    ) -> AppResult<Vec<E::Model>> {
        let mut query = E::find()
            .filter(E::scope())
            .filter(status_condition::<E>(status));

        if let (Some(owner), Some(column)) = (owner, E::owner_column()) {
            query = query.filter(column.eq(owner));
        }

        query
            .order_by_desc(E::id_column())
            .all(self.uow.connection())
            .await
            .map_err(AppError::from)
    }
}
