//! Soft-delete description of an entity and its dependents.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, DatabaseTransaction, DbErr, EntityTrait, QueryFilter, UpdateMany,
};

use domain::{LifecycleChange, ListStatus};

/// Audit columns a lifecycle change writes.
#[derive(Debug, Clone, Copy)]
pub struct AuditColumns<C> {
    pub updated_at: C,
    pub updated_by: C,
    pub updated_by_role: C,
    pub deleted_at: C,
    pub deleted_by: C,
    pub deleted_by_role: C,
}

/// An entity that is trashed and restored instead of deleted.
///
/// Implementors only declare columns and dependents; the behaviour lives in
/// [`LifecycleManager`](super::LifecycleManager).
pub trait SoftDelete: EntityTrait {
    /// Display name used in messages (`"Dropshipper not found"`)
    const LABEL: &'static str;

    fn id_column() -> Self::Column;

    fn status_column() -> Self::Column;

    /// Column holding the owning actor, if listings are scoped by owner
    fn owner_column() -> Option<Self::Column>;

    fn audit_columns() -> AuditColumns<Self::Column>;

    /// Rows of the table that belong to this entity
    fn scope() -> Condition {
        Condition::all()
    }

    /// Rows that follow this entity through soft delete and restore
    fn dependents() -> Vec<Box<dyn Dependent>> {
        Vec::new()
    }
}

/// Rows that transition together with a parent record.
#[async_trait]
pub trait Dependent: Send + Sync {
    fn label(&self) -> &'static str;

    /// Apply `change` to the dependent rows of `parent_id`, returning the row count.
    ///
    /// `trashed_at` is the parent's deletion time before the change. Rows that
    /// were trashed on their own at another time are left alone.
    async fn cascade(
        &self,
        txn: &DatabaseTransaction,
        parent_id: i64,
        trashed_at: Option<DateTime<Utc>>,
        change: &LifecycleChange,
    ) -> Result<u64, DbErr>;
}

type ParentLink = Box<dyn Fn(i64) -> Condition + Send + Sync>;

/// Dependent rows of `E` selected by a condition on the parent id.
pub struct ChildOf<E: EntityTrait> {
    link: ParentLink,
    _entity: PhantomData<fn() -> E>,
}

impl<E: SoftDelete> ChildOf<E> {
    /// Rows referencing the parent through `foreign_key`
    pub fn new(foreign_key: E::Column) -> Self {
        Self::via(move |parent_id| Condition::all().add(foreign_key.eq(parent_id)))
    }

    /// Rows selected by an arbitrary condition, e.g. a subquery through an intermediate table
    pub fn via(link: impl Fn(i64) -> Condition + Send + Sync + 'static) -> Self {
        Self {
            link: Box::new(link),
            _entity: PhantomData,
        }
    }

    pub fn boxed(foreign_key: E::Column) -> Box<dyn Dependent> {
        Box::new(Self::new(foreign_key))
    }
}

#[async_trait]
impl<E: SoftDelete> Dependent for ChildOf<E> {
    fn label(&self) -> &'static str {
        E::LABEL
    }

    async fn cascade(
        &self,
        txn: &DatabaseTransaction,
        parent_id: i64,
        trashed_at: Option<DateTime<Utc>>,
        change: &LifecycleChange,
    ) -> Result<u64, DbErr> {
        let Some(affected) = cascade_condition::<E>(trashed_at, change) else {
            return Ok(0);
        };

        let result = stamp_change::<E>(E::update_many(), change)
            .filter((self.link)(parent_id))
            .filter(E::scope())
            .filter(affected)
            .exec(txn)
            .await?;
        Ok(result.rows_affected)
    }
}

/// Which dependent rows a cascade touches.
///
/// Trashing takes live rows and rows trashed together with the parent.
/// Restoring only revives rows trashed together with the parent; `None`
/// means there is nothing to revive.
fn cascade_condition<E: SoftDelete>(
    trashed_at: Option<DateTime<Utc>>,
    change: &LifecycleChange,
) -> Option<Condition> {
    let deleted_at = E::audit_columns().deleted_at;
    match (change.deletion(), trashed_at) {
        (Some(_), None) => Some(Condition::all().add(deleted_at.is_null())),
        (Some(_), Some(at)) => Some(
            Condition::any()
                .add(deleted_at.is_null())
                .add(deleted_at.eq(at)),
        ),
        (None, Some(at)) => Some(Condition::all().add(deleted_at.eq(at))),
        (None, None) => None,
    }
}

/// Add the column writes of `change` to an update statement.
///
/// The deletion triple is always written as a whole.
pub fn stamp_change<E: SoftDelete>(update: UpdateMany<E>, change: &LifecycleChange) -> UpdateMany<E> {
    let columns = E::audit_columns();

    let update = match change.deletion() {
        Some(stamp) => update
            .col_expr(columns.deleted_at, Expr::value(stamp.at))
            .col_expr(columns.deleted_by, Expr::value(stamp.by))
            .col_expr(columns.deleted_by_role, Expr::value(stamp.by_role.as_str())),
        None => update
            .col_expr(columns.deleted_at, Expr::value(Option::<DateTime<Utc>>::None))
            .col_expr(columns.deleted_by, Expr::value(Option::<i64>::None))
            .col_expr(columns.deleted_by_role, Expr::value(Option::<String>::None)),
    };

    match change.update() {
        Some(stamp) => update
            .col_expr(columns.updated_at, Expr::value(stamp.at))
            .col_expr(columns.updated_by, Expr::value(stamp.by))
            .col_expr(columns.updated_by_role, Expr::value(stamp.by_role.as_str())),
        None => update,
    }
}

/// Query condition for a listing filter.
///
/// `Active`, `Inactive` and `Deleted` are disjoint and cover every row.
pub fn status_condition<E: SoftDelete>(status: ListStatus) -> Condition {
    let deleted_at = E::audit_columns().deleted_at;
    match status {
        ListStatus::Active => Condition::all()
            .add(E::status_column().eq(true))
            .add(deleted_at.is_null()),
        ListStatus::Inactive => Condition::all()
            .add(E::status_column().eq(false))
            .add(deleted_at.is_null()),
        ListStatus::Deleted => Condition::all().add(deleted_at.is_not_null()),
        ListStatus::NotDeleted => Condition::all().add(deleted_at.is_null()),
    }
}
