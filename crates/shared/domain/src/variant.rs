//! Reconciliation of a product's stored variants against an update payload.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::product::ProductVariant;

/// Variant as supplied by a create/update payload. Keyed by SKU.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    #[validate(length(min = 1, message = "Variant SKU is required"))]
    pub sku: String,
    #[validate(length(min = 1, message = "Variant name is required"))]
    pub name: String,
    /// Price in minor currency units
    #[validate(range(min = 0, message = "Variant price cannot be negative"))]
    pub price: i64,
    #[validate(range(min = 0, message = "Variant stock cannot be negative"))]
    #[serde(default)]
    pub stock: i32,
}

/// Writes needed to turn the stored variant set into the requested one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantPlan {
    /// Existing variant id and its new values
    pub update: Vec<(i64, VariantInput)>,
    pub create: Vec<VariantInput>,
    /// Ids of stored variants absent from the payload
    pub remove: Vec<i64>,
}

impl VariantPlan {
    pub fn is_empty(&self) -> bool {
        self.update.is_empty() && self.create.is_empty() && self.remove.is_empty()
    }
}

/// Match incoming variants to stored ones by SKU.
///
/// Matching SKUs are updated in place, new SKUs are created and stored
/// SKUs missing from the payload are removed. Duplicate SKUs in the payload
/// are rejected.
pub fn reconcile_variants(
    existing: &[ProductVariant],
    incoming: Vec<VariantInput>,
) -> DomainResult<VariantPlan> {
    let mut seen = HashSet::with_capacity(incoming.len());
    for variant in &incoming {
        if !seen.insert(variant.sku.as_str()) {
            return Err(DomainError::validation(format!(
                "Duplicate variant SKU: {}",
                variant.sku
            )));
        }
    }

    let by_sku: HashMap<&str, i64> = existing
        .iter()
        .map(|v| (v.sku.as_str(), v.id))
        .collect();

    let remove = existing
        .iter()
        .filter(|v| !seen.contains(v.sku.as_str()))
        .map(|v| v.id)
        .collect();

    let mut plan = VariantPlan {
        remove,
        ..VariantPlan::default()
    };
    for variant in incoming {
        match by_sku.get(variant.sku.as_str()) {
            Some(&id) => plan.update.push((id, variant)),
            None => plan.create.push(variant),
        }
    }

    Ok(plan)
}
