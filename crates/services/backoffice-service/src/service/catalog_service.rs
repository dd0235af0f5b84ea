//! Catalog as seen by a dropshipper: `all`, `my` and `notmy`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use common::AppResult;
use domain::product::{dedupe_by_product, lowest_prices, price_against_others};
use domain::{
    ActorRole, CatalogListing, CatalogMode, CatalogProduct, DropshipperProduct, ListStatus,
    SessionContext,
};

use crate::repository::{DropshipperProductRepository, ProductRepository};

#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Catalog slice for the session's dropshipper.
    ///
    /// `status` filters supplier products for `all`/`notmy` and the
    /// dropshipper's onboardings for `my`.
    async fn catalog(
        &self,
        session: &SessionContext,
        mode: CatalogMode,
        status: ListStatus,
    ) -> AppResult<CatalogListing>;
}

pub struct CatalogManager {
    products: Arc<dyn ProductRepository>,
    onboardings: Arc<dyn DropshipperProductRepository>,
}

impl CatalogManager {
    pub fn new(
        products: Arc<dyn ProductRepository>,
        onboardings: Arc<dyn DropshipperProductRepository>,
    ) -> Self {
        Self {
            products,
            onboardings,
        }
    }

    async fn mine(&self, dropshipper_id: i64, status: ListStatus) -> AppResult<CatalogListing> {
        let onboardings = self.onboardings.list(Some(dropshipper_id), status).await?;

        let mut product_ids: Vec<i64> = onboardings.iter().map(|o| o.product_id).collect();
        product_ids.sort_unstable();
        product_ids.dedup();

        let products: HashMap<i64, CatalogProduct> = self
            .products
            .catalog_by_ids(product_ids)
            .await?
            .into_iter()
            .map(|entry| (entry.product.id, entry))
            .collect();

        let mine = onboardings
            .into_iter()
            .map(|onboarding| DropshipperProduct {
                product: products.get(&onboarding.product_id).cloned(),
                ..onboarding
            })
            .collect();

        Ok(CatalogListing::Mine(mine))
    }

    /// Supplier catalog with the cheapest price other dropshippers set per variant.
    ///
    /// Prices come from one query over every listed variant.
    async fn others(&self, dropshipper_id: i64, status: ListStatus) -> AppResult<CatalogListing> {
        let products = dedupe_by_product(self.products.list_catalog(status).await?);

        let variant_ids: Vec<i64> = products
            .iter()
            .flat_map(|entry| entry.variants.iter().map(|v| v.id))
            .collect();
        let rows = self
            .onboardings
            .other_dropshipper_prices(dropshipper_id, variant_ids)
            .await?;

        let lowest = lowest_prices(rows);
        Ok(CatalogListing::Others(price_against_others(products, &lowest)))
    }
}

#[async_trait]
impl CatalogService for CatalogManager {
    async fn catalog(
        &self,
        session: &SessionContext,
        mode: CatalogMode,
        status: ListStatus,
    ) -> AppResult<CatalogListing> {
        let actor = session.require_role(Utc::now(), &[ActorRole::Dropshipper])?;

        let listing = match mode {
            CatalogMode::All => {
                CatalogListing::Supplier(self.products.list_catalog(status).await?)
            }
            CatalogMode::My => self.mine(actor.id, status).await?,
            CatalogMode::NotMy => self.others(actor.id, status).await?,
        };

        tracing::debug!(
            dropshipper_id = actor.id,
            mode = ?mode,
            status = status.as_str(),
            count = listing.len(),
            "Catalog listed"
        );
        Ok(listing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domain::{Actor, AuditTrail, Product, ProductVariant};

    use crate::repository::{MockDropshipperProductRepository, MockProductRepository};

    fn entry(product_id: i64, variant_ids: &[i64]) -> CatalogProduct {
        CatalogProduct {
            product: Product {
                id: product_id,
                supplier_id: 2,
                name: format!("Product {}", product_id),
                description: None,
                sku: format!("P-{}", product_id),
                gallery: Vec::new(),
                status: true,
                audit: AuditTrail::created(None, Utc::now()),
            },
            variants: variant_ids
                .iter()
                .map(|&id| ProductVariant {
                    id,
                    product_id,
                    sku: format!("V-{}", id),
                    name: format!("Variant {}", id),
                    price: 100,
                    stock: 1,
                })
                .collect(),
        }
    }

    fn session(actor: Actor) -> SessionContext {
        SessionContext::new(actor, Duration::minutes(5))
    }

    #[tokio::test]
    async fn test_notmy_batches_one_price_lookup() {
        let mut products = MockProductRepository::new();
        products
            .expect_list_catalog()
            .returning(|_| {
                Ok(vec![
                    entry(1, &[10, 11]),
                    entry(1, &[10, 11]),
                    entry(2, &[20]),
                ])
            });

        let mut onboardings = MockDropshipperProductRepository::new();
        onboardings
            .expect_other_dropshipper_prices()
            .withf(|dropshipper_id, variant_ids| {
                *dropshipper_id == 9 && *variant_ids == vec![10, 11, 20]
            })
            .times(1)
            .returning(|_, _| Ok(vec![(10, 300), (10, 250), (20, 90)]));

        let service = CatalogManager::new(Arc::new(products), Arc::new(onboardings));
        let listing = service
            .catalog(&session(Actor::dropshipper(9)), CatalogMode::NotMy, ListStatus::Active)
            .await
            .unwrap();

        let CatalogListing::Others(priced) = listing else {
            panic!("expected the notmy listing");
        };
        assert_eq!(priced.len(), 2);
        let prices: Vec<Option<i64>> = priced
            .iter()
            .flat_map(|e| e.variants.iter())
            .map(|v| v.lowest_other_dropshipper_suggested_price)
            .collect();
        assert_eq!(prices, vec![Some(250), None, Some(90)]);
    }

    #[tokio::test]
    async fn test_catalog_is_for_dropshippers() {
        let service = CatalogManager::new(
            Arc::new(MockProductRepository::new()),
            Arc::new(MockDropshipperProductRepository::new()),
        );

        let result = service
            .catalog(&session(Actor::supplier(2)), CatalogMode::All, ListStatus::NotDeleted)
            .await;

        assert!(matches!(result, Err(common::AppError::Forbidden)));
    }
}
