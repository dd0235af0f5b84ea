//! Onboarding of supplier products by dropshippers.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult, OptionExt};
use domain::validation::check;
use domain::{
    Actor, ChangeStamp, DropshipperProduct, LifecycleChange, ListStatus, NewDropshipperProduct,
    SessionContext, VariantPrice,
};

use super::{authorize, authorize_admin, authorize_owner, listing_scope};
use crate::repository::{DropshipperProductRepository, ProductRepository};

#[async_trait]
pub trait DropshipperProductService: Send + Sync {
    /// Onboard a live supplier product with a selling price per variant
    async fn add_product(
        &self,
        session: &SessionContext,
        dropshipper_id: i64,
        input: NewDropshipperProduct,
    ) -> AppResult<DropshipperProduct>;

    async fn get_product(&self, session: &SessionContext, id: i64)
        -> AppResult<DropshipperProduct>;

    /// Overwrite selling prices; variants not listed keep their price
    async fn update_prices(
        &self,
        session: &SessionContext,
        id: i64,
        prices: Vec<VariantPrice>,
    ) -> AppResult<DropshipperProduct>;

    async fn set_status(
        &self,
        session: &SessionContext,
        id: i64,
        status: bool,
    ) -> AppResult<DropshipperProduct>;

    /// All onboardings for admins, otherwise the caller's own
    async fn list_products(
        &self,
        session: &SessionContext,
        status: ListStatus,
    ) -> AppResult<Vec<DropshipperProduct>>;

    /// Trash the onboarding together with its variant prices
    async fn soft_delete(&self, session: &SessionContext, id: i64)
        -> AppResult<DropshipperProduct>;

    async fn restore(&self, session: &SessionContext, id: i64) -> AppResult<DropshipperProduct>;

    async fn permanent_delete(&self, session: &SessionContext, id: i64) -> AppResult<()>;
}

pub struct DropshipperProductManager {
    repo: Arc<dyn DropshipperProductRepository>,
    products: Arc<dyn ProductRepository>,
}

impl DropshipperProductManager {
    pub fn new(
        repo: Arc<dyn DropshipperProductRepository>,
        products: Arc<dyn ProductRepository>,
    ) -> Self {
        Self { repo, products }
    }

    async fn onboarding(&self, id: i64) -> AppResult<DropshipperProduct> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_not_found("Dropshipper product")
    }

    async fn authorize_onboarding(
        &self,
        session: &SessionContext,
        id: i64,
    ) -> AppResult<(DropshipperProduct, Actor)> {
        let onboarding = self.onboarding(id).await?;
        let actor = authorize_owner(session, onboarding.dropshipper_id)?;
        Ok((onboarding, actor))
    }

    /// Every priced variant must belong to `product_id` and appear once
    async fn check_prices(&self, product_id: i64, prices: &[VariantPrice]) -> AppResult<()> {
        for price in prices {
            check(price)?;
        }

        let known: HashSet<i64> = self
            .products
            .variants(product_id)
            .await?
            .into_iter()
            .map(|v| v.id)
            .collect();

        let mut seen = HashSet::with_capacity(prices.len());
        for price in prices {
            let variant_id = price.variant.id();
            if !known.contains(&variant_id) {
                return Err(AppError::validation(format!(
                    "Variant {} does not belong to this product",
                    variant_id
                )));
            }
            if !seen.insert(variant_id) {
                return Err(AppError::validation(format!(
                    "Variant {} is priced more than once",
                    variant_id
                )));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DropshipperProductService for DropshipperProductManager {
    async fn add_product(
        &self,
        session: &SessionContext,
        dropshipper_id: i64,
        input: NewDropshipperProduct,
    ) -> AppResult<DropshipperProduct> {
        let actor = authorize_owner(session, dropshipper_id)?;
        check(&input)?;

        let product_id = input.product.id();
        let product = self
            .products
            .find_by_id(product_id)
            .await?
            .ok_or_not_found("Product")?;
        if product.audit.is_trashed() {
            return Err(AppError::not_found("Product"));
        }

        if self
            .repo
            .find_live_by_product(dropshipper_id, product_id)
            .await?
            .is_some()
        {
            return Err(AppError::validation("Product already added"));
        }

        self.check_prices(product_id, &input.variants).await?;

        let onboarding = self
            .repo
            .create(dropshipper_id, product.supplier_id, input, actor)
            .await?;
        tracing::info!(
            id = onboarding.id,
            dropshipper_id,
            product_id,
            "Product onboarded"
        );
        Ok(onboarding)
    }

    async fn get_product(
        &self,
        session: &SessionContext,
        id: i64,
    ) -> AppResult<DropshipperProduct> {
        let (mut onboarding, _) = self.authorize_onboarding(session, id).await?;
        onboarding.product = self.products.find_with_variants(onboarding.product_id).await?;
        Ok(onboarding)
    }

    async fn update_prices(
        &self,
        session: &SessionContext,
        id: i64,
        prices: Vec<VariantPrice>,
    ) -> AppResult<DropshipperProduct> {
        let (onboarding, actor) = self.authorize_onboarding(session, id).await?;
        if onboarding.audit.is_trashed() {
            return Err(AppError::not_found("Dropshipper product"));
        }
        if prices.is_empty() {
            return Err(AppError::validation("At least one variant price is required"));
        }
        self.check_prices(onboarding.product_id, &prices).await?;

        self.repo
            .update_prices(id, prices, ChangeStamp::now(&actor))
            .await
    }

    async fn set_status(
        &self,
        session: &SessionContext,
        id: i64,
        status: bool,
    ) -> AppResult<DropshipperProduct> {
        let (_, actor) = self.authorize_onboarding(session, id).await?;
        self.repo
            .set_status(id, status, ChangeStamp::now(&actor))
            .await
    }

    async fn list_products(
        &self,
        session: &SessionContext,
        status: ListStatus,
    ) -> AppResult<Vec<DropshipperProduct>> {
        let actor = authorize(session)?;
        self.repo.list(listing_scope(&actor), status).await
    }

    async fn soft_delete(
        &self,
        session: &SessionContext,
        id: i64,
    ) -> AppResult<DropshipperProduct> {
        let (_, actor) = self.authorize_onboarding(session, id).await?;
        self.repo.apply_lifecycle(id, LifecycleChange::trash(&actor)).await
    }

    async fn restore(&self, session: &SessionContext, id: i64) -> AppResult<DropshipperProduct> {
        let (onboarding, actor) = self.authorize_onboarding(session, id).await?;

        // A restored onboarding must not duplicate a live one of the same product
        if let Some(live) = self
            .repo
            .find_live_by_product(onboarding.dropshipper_id, onboarding.product_id)
            .await?
        {
            if live.id != id {
                return Err(AppError::validation("Product already added"));
            }
        }

        self.repo
            .apply_lifecycle(id, LifecycleChange::restore(&actor))
            .await
    }

    async fn permanent_delete(&self, session: &SessionContext, id: i64) -> AppResult<()> {
        authorize_admin(session)?;
        self.repo.permanent_delete(id).await
    }
}
