//! Products onboarded by dropshippers and their selling prices.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};

use common::{AppResult, OptionExt};
use domain::{
    Actor, ChangeStamp, DropshipperProduct, DropshipperProductVariant, LifecycleChange, ListStatus,
    NewDropshipperProduct, VariantPrice,
};

use super::entities::{dropshipper_product, dropshipper_product_variant, AuditedActiveModel};
use crate::infra::Persistence;
use crate::lifecycle::{LifecycleManager, SoftDelete};
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DropshipperProductRepository: Send + Sync {
    /// Find by ID in any state, with variant prices
    async fn find_by_id(&self, id: i64) -> AppResult<Option<DropshipperProduct>>;

    /// The live onboarding of `product_id` by `dropshipper_id`, if any
    async fn find_live_by_product(
        &self,
        dropshipper_id: i64,
        product_id: i64,
    ) -> AppResult<Option<DropshipperProduct>>;

    /// Insert the onboarding and its variant prices in one transaction
    async fn create(
        &self,
        dropshipper_id: i64,
        supplier_id: i64,
        input: NewDropshipperProduct,
        actor: Actor,
    ) -> AppResult<DropshipperProduct>;

    /// Overwrite prices of listed variants, adding rows for new ones
    async fn update_prices(
        &self,
        id: i64,
        prices: Vec<VariantPrice>,
        stamp: ChangeStamp,
    ) -> AppResult<DropshipperProduct>;

    async fn set_status(
        &self,
        id: i64,
        status: bool,
        stamp: ChangeStamp,
    ) -> AppResult<DropshipperProduct>;

    async fn list(
        &self,
        dropshipper_id: Option<i64>,
        status: ListStatus,
    ) -> AppResult<Vec<DropshipperProduct>>;

    /// `(variant_id, price)` rows set by live onboardings of other dropshippers
    async fn other_dropshipper_prices(
        &self,
        dropshipper_id: i64,
        variant_ids: Vec<i64>,
    ) -> AppResult<Vec<(i64, i64)>>;

    /// Soft delete or restore, cascading to the variant prices
    async fn apply_lifecycle(
        &self,
        id: i64,
        change: LifecycleChange,
    ) -> AppResult<DropshipperProduct>;

    async fn permanent_delete(&self, id: i64) -> AppResult<()>;
}

pub struct DropshipperProductStore {
    uow: Persistence,
    lifecycle: LifecycleManager<dropshipper_product::Entity>,
}

impl DropshipperProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        let uow = Persistence::new(db);
        Self {
            lifecycle: LifecycleManager::new(uow.clone()),
            uow,
        }
    }

    async fn live_model(&self, id: i64) -> AppResult<dropshipper_product::Model> {
        self.lifecycle
            .find_live(id)
            .await?
            .ok_or_not_found(dropshipper_product::Entity::LABEL)
    }

    /// Attach variant prices with one query. Trashed prices are only shown
    /// on trashed products.
    async fn with_variants(
        &self,
        models: Vec<dropshipper_product::Model>,
    ) -> AppResult<Vec<DropshipperProduct>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let rows = dropshipper_product_variant::Entity::find()
            .filter(dropshipper_product_variant::Column::DropshipperProductId.is_in(ids))
            .order_by_asc(dropshipper_product_variant::Column::Id)
            .all(self.uow.connection())
            .await?;

        let mut grouped: HashMap<i64, Vec<dropshipper_product_variant::Model>> = HashMap::new();
        for row in rows {
            grouped.entry(row.dropshipper_product_id).or_default().push(row);
        }

        Ok(models
            .into_iter()
            .map(|model| {
                let trashed = model.deleted_at.is_some();
                let variants = grouped
                    .remove(&model.id)
                    .unwrap_or_default()
                    .into_iter()
                    .filter(|v| trashed || v.deleted_at.is_none())
                    .map(DropshipperProductVariant::from)
                    .collect();
                DropshipperProduct {
                    variants,
                    ..DropshipperProduct::from(model)
                }
            })
            .collect())
    }

    async fn single(&self, model: dropshipper_product::Model) -> AppResult<DropshipperProduct> {
        self.with_variants(vec![model])
            .await?
            .pop()
            .ok_or_not_found(dropshipper_product::Entity::LABEL)
    }
}

#[async_trait]
impl DropshipperProductRepository for DropshipperProductStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<DropshipperProduct>> {
        match self.lifecycle.find(id).await? {
            Some(model) => Ok(Some(self.single(model).await?)),
            None => Ok(None),
        }
    }

    async fn find_live_by_product(
        &self,
        dropshipper_id: i64,
        product_id: i64,
    ) -> AppResult<Option<DropshipperProduct>> {
        let model = dropshipper_product::Entity::find()
            .filter(dropshipper_product::Column::DropshipperId.eq(dropshipper_id))
            .filter(dropshipper_product::Column::ProductId.eq(product_id))
            .filter(dropshipper_product::Column::DeletedAt.is_null())
            .one(self.uow.connection())
            .await?;

        match model {
            Some(model) => Ok(Some(self.single(model).await?)),
            None => Ok(None),
        }
    }

    async fn create(
        &self,
        dropshipper_id: i64,
        supplier_id: i64,
        input: NewDropshipperProduct,
        actor: Actor,
    ) -> AppResult<DropshipperProduct> {
        let now = Utc::now();

        let (model, variants) = with_transaction!(self.uow, |ctx| {
            let txn = ctx.conn();

            let mut active = dropshipper_product::ActiveModel {
                dropshipper_id: Set(dropshipper_id),
                product_id: Set(input.product.id()),
                supplier_id: Set(supplier_id),
                status: Set(input.status),
                ..Default::default()
            };
            active.stamp_created(Some(&actor), now);
            let model = active.insert(txn).await?;

            let mut variants = Vec::with_capacity(input.variants.len());
            for price in input.variants {
                let mut row = dropshipper_product_variant::ActiveModel {
                    dropshipper_product_id: Set(model.id),
                    dropshipper_id: Set(dropshipper_id),
                    product_variant_id: Set(price.variant.id()),
                    price: Set(price.price),
                    status: Set(true),
                    ..Default::default()
                };
                row.stamp_created(Some(&actor), now);
                variants.push(row.insert(txn).await?);
            }

            Ok((model, variants))
        })?;

        Ok(DropshipperProduct {
            variants: variants
                .into_iter()
                .map(DropshipperProductVariant::from)
                .collect(),
            ..DropshipperProduct::from(model)
        })
    }

    async fn update_prices(
        &self,
        id: i64,
        prices: Vec<VariantPrice>,
        stamp: ChangeStamp,
    ) -> AppResult<DropshipperProduct> {
        let current = self.live_model(id).await?;
        let dropshipper_id = current.dropshipper_id;

        let model = with_transaction!(self.uow, |ctx| {
            let txn = ctx.conn();

            let existing: HashMap<i64, dropshipper_product_variant::Model> =
                dropshipper_product_variant::Entity::find()
                    .filter(dropshipper_product_variant::Column::DropshipperProductId.eq(id))
                    .filter(dropshipper_product_variant::Column::DeletedAt.is_null())
                    .all(txn)
                    .await?
                    .into_iter()
                    .map(|row| (row.product_variant_id, row))
                    .collect();

            for price in prices {
                match existing.get(&price.variant.id()) {
                    Some(row) => {
                        let mut active: dropshipper_product_variant::ActiveModel =
                            row.clone().into();
                        active.price = Set(price.price);
                        active.touch(&stamp);
                        active.update(txn).await?;
                    }
                    None => {
                        let mut active = dropshipper_product_variant::ActiveModel {
                            dropshipper_product_id: Set(id),
                            dropshipper_id: Set(dropshipper_id),
                            product_variant_id: Set(price.variant.id()),
                            price: Set(price.price),
                            status: Set(true),
                            ..Default::default()
                        };
                        let actor = Actor::new(stamp.by, stamp.by_role);
                        active.stamp_created(Some(&actor), stamp.at);
                        active.insert(txn).await?;
                    }
                }
            }

            let mut parent: dropshipper_product::ActiveModel = current.into();
            parent.touch(&stamp);
            Ok(parent.update(txn).await?)
        })?;

        self.single(model).await
    }

    async fn set_status(
        &self,
        id: i64,
        status: bool,
        stamp: ChangeStamp,
    ) -> AppResult<DropshipperProduct> {
        let mut active: dropshipper_product::ActiveModel = self.live_model(id).await?.into();
        active.status = Set(status);
        active.touch(&stamp);

        let model = active.update(self.uow.connection()).await?;
        self.single(model).await
    }

    async fn list(
        &self,
        dropshipper_id: Option<i64>,
        status: ListStatus,
    ) -> AppResult<Vec<DropshipperProduct>> {
        let models = self.lifecycle.list_by_status(dropshipper_id, status).await?;
        self.with_variants(models).await
    }

    async fn other_dropshipper_prices(
        &self,
        dropshipper_id: i64,
        variant_ids: Vec<i64>,
    ) -> AppResult<Vec<(i64, i64)>> {
        if variant_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = dropshipper_product_variant::Entity::find()
            .select_only()
            .column(dropshipper_product_variant::Column::ProductVariantId)
            .column(dropshipper_product_variant::Column::Price)
            .filter(dropshipper_product_variant::Column::ProductVariantId.is_in(variant_ids))
            .filter(dropshipper_product_variant::Column::DropshipperId.ne(dropshipper_id))
            .filter(dropshipper_product_variant::Column::DeletedAt.is_null())
            .into_tuple::<(i64, i64)>()
            .all(self.uow.connection())
            .await?;
        Ok(rows)
    }

    async fn apply_lifecycle(
        &self,
        id: i64,
        change: LifecycleChange,
    ) -> AppResult<DropshipperProduct> {
        let model = self.lifecycle.apply(id, change).await?;
        self.single(model).await
    }

    async fn permanent_delete(&self, id: i64) -> AppResult<()> {
        self.lifecycle.permanent_delete(id).await
    }
}
