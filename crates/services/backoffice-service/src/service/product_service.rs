//! Supplier catalog service: products, variants and image galleries.

use std::sync::Arc;

use async_trait::async_trait;

use common::{AppError, AppResult, OptionExt};
use domain::validation::check;
use domain::{
    reconcile_variants, Actor, CatalogProduct, ChangeStamp, Gallery, GalleryRemoval,
    LifecycleChange, ListStatus, NewProduct, Product, SessionContext, UpdateProduct, VariantInput,
};

use super::{authorize, authorize_admin, authorize_owner, listing_scope};
use crate::infra::FileStorage;
use crate::repository::ProductRepository;

#[async_trait]
pub trait ProductService: Send + Sync {
    async fn create_product(
        &self,
        session: &SessionContext,
        supplier_id: i64,
        input: NewProduct,
    ) -> AppResult<CatalogProduct>;

    /// Product with variants. Trashed products are visible to their supplier and admins.
    async fn get_product(&self, session: &SessionContext, id: i64) -> AppResult<CatalogProduct>;

    /// Update scalar fields and, when `variants` is present, reconcile the variant set by SKU
    async fn update_product(
        &self,
        session: &SessionContext,
        id: i64,
        changes: UpdateProduct,
    ) -> AppResult<CatalogProduct>;

    async fn set_status(&self, session: &SessionContext, id: i64, status: bool)
        -> AppResult<Product>;

    /// Append an already stored image file to the gallery
    async fn add_gallery_image(
        &self,
        session: &SessionContext,
        id: i64,
        file_name: String,
    ) -> AppResult<Product>;

    /// Drop the image at `index` from the gallery, then delete its file
    async fn remove_gallery_image(
        &self,
        session: &SessionContext,
        id: i64,
        index: usize,
    ) -> AppResult<GalleryRemoval>;

    async fn list_products(
        &self,
        session: &SessionContext,
        status: ListStatus,
    ) -> AppResult<Vec<Product>>;

    async fn soft_delete(&self, session: &SessionContext, id: i64) -> AppResult<Product>;

    async fn restore(&self, session: &SessionContext, id: i64) -> AppResult<Product>;

    async fn permanent_delete(&self, session: &SessionContext, id: i64) -> AppResult<()>;
}

pub struct ProductManager {
    repo: Arc<dyn ProductRepository>,
    storage: Arc<dyn FileStorage>,
}

impl ProductManager {
    pub fn new(repo: Arc<dyn ProductRepository>, storage: Arc<dyn FileStorage>) -> Self {
        Self { repo, storage }
    }

    async fn product(&self, id: i64) -> AppResult<Product> {
        self.repo.find_by_id(id).await?.ok_or_not_found("Product")
    }

    /// Live product together with the actor allowed to change it
    async fn live_for_owner(
        &self,
        session: &SessionContext,
        id: i64,
    ) -> AppResult<(Product, Actor)> {
        let product = self.product(id).await?;
        let actor = authorize_owner(session, product.supplier_id)?;
        if product.audit.is_trashed() {
            return Err(AppError::not_found("Product"));
        }
        Ok((product, actor))
    }
}

fn check_variants(variants: &[VariantInput]) -> AppResult<()> {
    for variant in variants {
        check(variant)?;
    }
    Ok(())
}

#[async_trait]
impl ProductService for ProductManager {
    async fn create_product(
        &self,
        session: &SessionContext,
        supplier_id: i64,
        input: NewProduct,
    ) -> AppResult<CatalogProduct> {
        let actor = authorize_owner(session, supplier_id)?;
        check(&input)?;
        check_variants(&input.variants)?;
        // Rejects duplicate SKUs in the payload
        reconcile_variants(&[], input.variants.clone())?;

        let created = self.repo.create(supplier_id, input, actor).await?;
        tracing::info!(
            id = created.product.id,
            supplier_id,
            variants = created.variants.len(),
            "Product created"
        );
        Ok(created)
    }

    async fn get_product(&self, session: &SessionContext, id: i64) -> AppResult<CatalogProduct> {
        let actor = authorize(session)?;
        let entry = self
            .repo
            .find_with_variants(id)
            .await?
            .ok_or_not_found("Product")?;

        let privileged = actor.role.is_admin() || actor.id == entry.product.supplier_id;
        if entry.product.audit.is_trashed() && !privileged {
            return Err(AppError::not_found("Product"));
        }
        Ok(entry)
    }

    async fn update_product(
        &self,
        session: &SessionContext,
        id: i64,
        mut changes: UpdateProduct,
    ) -> AppResult<CatalogProduct> {
        let (_, actor) = self.live_for_owner(session, id).await?;
        check(&changes)?;

        let plan = match changes.variants.take() {
            Some(variants) => {
                check_variants(&variants)?;
                let existing = self.repo.variants(id).await?;
                Some(reconcile_variants(&existing, variants)?)
            }
            None => None,
        };

        if let Some(plan) = &plan {
            tracing::debug!(
                id,
                updated = plan.update.len(),
                created = plan.create.len(),
                removed = plan.remove.len(),
                "Reconciling product variants"
            );
        }

        self.repo
            .update(id, changes, plan, ChangeStamp::now(&actor))
            .await
    }

    async fn set_status(
        &self,
        session: &SessionContext,
        id: i64,
        status: bool,
    ) -> AppResult<Product> {
        let (_, actor) = self.live_for_owner(session, id).await?;
        self.repo
            .set_status(id, status, ChangeStamp::now(&actor))
            .await
    }

    async fn add_gallery_image(
        &self,
        session: &SessionContext,
        id: i64,
        file_name: String,
    ) -> AppResult<Product> {
        let (product, actor) = self.live_for_owner(session, id).await?;
        let file_name = file_name.trim().to_string();
        if file_name.is_empty() || file_name.contains(domain::GALLERY_SEPARATOR) {
            return Err(AppError::validation("Invalid image file name"));
        }

        let mut gallery = Gallery::from_images(product.gallery);
        gallery.push(file_name);
        self.repo
            .set_gallery(id, gallery.to_stored(), ChangeStamp::now(&actor))
            .await
    }

    async fn remove_gallery_image(
        &self,
        session: &SessionContext,
        id: i64,
        index: usize,
    ) -> AppResult<GalleryRemoval> {
        let (product, actor) = self.live_for_owner(session, id).await?;

        let mut gallery = Gallery::from_images(product.gallery);
        let removed_image = gallery.remove(index)?;
        let product = self
            .repo
            .set_gallery(id, gallery.to_stored(), ChangeStamp::now(&actor))
            .await?;

        let path = self.storage.resolve(&removed_image);
        let (file_deleted, file_error) = match self.storage.delete(&path).await {
            Ok(()) => (true, None),
            Err(e) => {
                tracing::error!(
                    id,
                    path = %path.display(),
                    error = %e,
                    "Gallery image removed but file deletion failed"
                );
                (false, Some(e.to_string()))
            }
        };

        Ok(GalleryRemoval {
            product,
            removed_image,
            file_deleted,
            file_error,
        })
    }

    async fn list_products(
        &self,
        session: &SessionContext,
        status: ListStatus,
    ) -> AppResult<Vec<Product>> {
        let actor = authorize(session)?;
        self.repo.list(listing_scope(&actor), status).await
    }

    async fn soft_delete(&self, session: &SessionContext, id: i64) -> AppResult<Product> {
        let product = self.product(id).await?;
        let actor = authorize_owner(session, product.supplier_id)?;
        self.repo.apply_lifecycle(id, LifecycleChange::trash(&actor)).await
    }

    async fn restore(&self, session: &SessionContext, id: i64) -> AppResult<Product> {
        let product = self.product(id).await?;
        let actor = authorize_owner(session, product.supplier_id)?;
        self.repo
            .apply_lifecycle(id, LifecycleChange::restore(&actor))
            .await
    }

    async fn permanent_delete(&self, session: &SessionContext, id: i64) -> AppResult<()> {
        authorize_admin(session)?;
        self.repo.permanent_delete(id).await
    }
}
