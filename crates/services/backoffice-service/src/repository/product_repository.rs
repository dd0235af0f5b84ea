//! Supplier catalog repository.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};

use common::{AppResult, OptionExt};
use domain::{
    Actor, CatalogProduct, ChangeStamp, LifecycleChange, ListStatus, NewProduct, Product,
    ProductVariant, UpdateProduct, VariantInput, VariantPlan,
};

use super::entities::{product, product_variant, AuditedActiveModel};
use crate::infra::Persistence;
use crate::lifecycle::{status_condition, LifecycleManager, SoftDelete};
use crate::with_transaction;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Find product by ID in any state
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>>;

    async fn find_with_variants(&self, id: i64) -> AppResult<Option<CatalogProduct>>;

    async fn variants(&self, product_id: i64) -> AppResult<Vec<ProductVariant>>;

    /// Insert the product and its variants in one transaction
    async fn create(
        &self,
        supplier_id: i64,
        input: NewProduct,
        actor: Actor,
    ) -> AppResult<CatalogProduct>;

    /// Apply scalar changes and an optional variant plan in one transaction
    async fn update(
        &self,
        id: i64,
        changes: UpdateProduct,
        plan: Option<VariantPlan>,
        stamp: ChangeStamp,
    ) -> AppResult<CatalogProduct>;

    async fn set_status(&self, id: i64, status: bool, stamp: ChangeStamp) -> AppResult<Product>;

    async fn set_gallery(
        &self,
        id: i64,
        gallery: Option<String>,
        stamp: ChangeStamp,
    ) -> AppResult<Product>;

    async fn list(&self, owner: Option<i64>, status: ListStatus) -> AppResult<Vec<Product>>;

    /// Products matching `status`, newest first, each with its variants
    async fn list_catalog(&self, status: ListStatus) -> AppResult<Vec<CatalogProduct>>;

    /// Products with the given ids and their variants, in `ids` order
    async fn catalog_by_ids(&self, ids: Vec<i64>) -> AppResult<Vec<CatalogProduct>>;

    async fn apply_lifecycle(&self, id: i64, change: LifecycleChange) -> AppResult<Product>;

    async fn permanent_delete(&self, id: i64) -> AppResult<()>;
}

pub struct ProductStore {
    uow: Persistence,
    lifecycle: LifecycleManager<product::Entity>,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        let uow = Persistence::new(db);
        Self {
            lifecycle: LifecycleManager::new(uow.clone()),
            uow,
        }
    }

    async fn live_model(&self, id: i64) -> AppResult<product::Model> {
        self.lifecycle
            .find_live(id)
            .await?
            .ok_or_not_found(product::Entity::LABEL)
    }

    /// Attach variants to products with one query.
    async fn with_variants(&self, products: Vec<product::Model>) -> AppResult<Vec<CatalogProduct>> {
        let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        let mut by_product = variants_by_product(self.uow.connection(), ids).await?;

        Ok(products
            .into_iter()
            .map(|model| CatalogProduct {
                variants: by_product.remove(&model.id).unwrap_or_default(),
                product: Product::from(model),
            })
            .collect())
    }
}

async fn variants_by_product<C: ConnectionTrait>(
    conn: &C,
    product_ids: Vec<i64>,
) -> AppResult<HashMap<i64, Vec<ProductVariant>>> {
    if product_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = product_variant::Entity::find()
        .filter(product_variant::Column::ProductId.is_in(product_ids))
        .order_by_asc(product_variant::Column::Id)
        .all(conn)
        .await?;

    let mut grouped: HashMap<i64, Vec<ProductVariant>> = HashMap::new();
    for row in rows {
        grouped
            .entry(row.product_id)
            .or_default()
            .push(ProductVariant::from(row));
    }
    Ok(grouped)
}

fn new_variant(
    product_id: i64,
    input: VariantInput,
    now: DateTime<Utc>,
) -> product_variant::ActiveModel {
    product_variant::ActiveModel {
        product_id: Set(product_id),
        sku: Set(input.sku),
        name: Set(input.name),
        price: Set(input.price),
        stock: Set(input.stock),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Product>> {
        Ok(self.lifecycle.find(id).await?.map(Product::from))
    }

    async fn find_with_variants(&self, id: i64) -> AppResult<Option<CatalogProduct>> {
        match self.lifecycle.find(id).await? {
            Some(model) => Ok(self.with_variants(vec![model]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn variants(&self, product_id: i64) -> AppResult<Vec<ProductVariant>> {
        let rows = product_variant::Entity::find()
            .filter(product_variant::Column::ProductId.eq(product_id))
            .order_by_asc(product_variant::Column::Id)
            .all(self.uow.connection())
            .await?;
        Ok(rows.into_iter().map(ProductVariant::from).collect())
    }

    async fn create(
        &self,
        supplier_id: i64,
        input: NewProduct,
        actor: Actor,
    ) -> AppResult<CatalogProduct> {
        let now = Utc::now();

        let (model, variants) = with_transaction!(self.uow, |ctx| {
            let txn = ctx.conn();

            let mut active = product::ActiveModel {
                supplier_id: Set(supplier_id),
                name: Set(input.name),
                description: Set(input.description),
                sku: Set(input.sku),
                gallery: Set(None),
                status: Set(input.status),
                ..Default::default()
            };
            active.stamp_created(Some(&actor), now);
            let model = active.insert(txn).await?;

            let mut variants = Vec::with_capacity(input.variants.len());
            for variant in input.variants {
                variants.push(new_variant(model.id, variant, now).insert(txn).await?);
            }

            Ok((model, variants))
        })?;

        Ok(CatalogProduct {
            product: Product::from(model),
            variants: variants.into_iter().map(ProductVariant::from).collect(),
        })
    }

    async fn update(
        &self,
        id: i64,
        changes: UpdateProduct,
        plan: Option<VariantPlan>,
        stamp: ChangeStamp,
    ) -> AppResult<CatalogProduct> {
        let current = self.live_model(id).await?;

        let model = with_transaction!(self.uow, |ctx| {
            let txn = ctx.conn();

            let mut active: product::ActiveModel = current.into();
            if let Some(name) = changes.name {
                active.name = Set(name);
            }
            if let Some(description) = changes.description {
                active.description = Set(Some(description));
            }
            if let Some(status) = changes.status {
                active.status = Set(status);
            }
            active.touch(&stamp);
            let model = active.update(txn).await?;

            if let Some(plan) = plan {
                if !plan.remove.is_empty() {
                    product_variant::Entity::delete_many()
                        .filter(product_variant::Column::ProductId.eq(id))
                        .filter(product_variant::Column::Id.is_in(plan.remove))
                        .exec(txn)
                        .await?;
                }

                for (variant_id, input) in plan.update {
                    product_variant::ActiveModel {
                        id: Set(variant_id),
                        name: Set(input.name),
                        price: Set(input.price),
                        stock: Set(input.stock),
                        updated_at: Set(stamp.at),
                        ..Default::default()
                    }
                    .update(txn)
                    .await?;
                }

                for input in plan.create {
                    new_variant(id, input, stamp.at).insert(txn).await?;
                }
            }

            Ok(model)
        })?;

        let variants = self.variants(id).await?;
        Ok(CatalogProduct {
            product: Product::from(model),
            variants,
        })
    }

    async fn set_status(&self, id: i64, status: bool, stamp: ChangeStamp) -> AppResult<Product> {
        let mut active: product::ActiveModel = self.live_model(id).await?.into();
        active.status = Set(status);
        active.touch(&stamp);

        let model = active.update(self.uow.connection()).await?;
        Ok(Product::from(model))
    }

    async fn set_gallery(
        &self,
        id: i64,
        gallery: Option<String>,
        stamp: ChangeStamp,
    ) -> AppResult<Product> {
        let mut active: product::ActiveModel = self.live_model(id).await?.into();
        active.gallery = Set(gallery);
        active.touch(&stamp);

        let model = active.update(self.uow.connection()).await?;
        Ok(Product::from(model))
    }

    async fn list(&self, owner: Option<i64>, status: ListStatus) -> AppResult<Vec<Product>> {
        let models = self.lifecycle.list_by_status(owner, status).await?;
        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn list_catalog(&self, status: ListStatus) -> AppResult<Vec<CatalogProduct>> {
        let products = product::Entity::find()
            .filter(status_condition::<product::Entity>(status))
            .order_by_desc(product::Column::Id)
            .all(self.uow.connection())
            .await?;
        self.with_variants(products).await
    }

    async fn catalog_by_ids(&self, ids: Vec<i64>) -> AppResult<Vec<CatalogProduct>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let models = product::Entity::find()
            .filter(product::Column::Id.is_in(ids.clone()))
            .all(self.uow.connection())
            .await?;
        let mut by_id: HashMap<i64, product::Model> =
            models.into_iter().map(|m| (m.id, m)).collect();
        let ordered = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        self.with_variants(ordered).await
    }

    async fn apply_lifecycle(&self, id: i64, change: LifecycleChange) -> AppResult<Product> {
        Ok(Product::from(self.lifecycle.apply(id, change).await?))
    }

    async fn permanent_delete(&self, id: i64) -> AppResult<()> {
        self.lifecycle.permanent_delete(id).await
    }
}
