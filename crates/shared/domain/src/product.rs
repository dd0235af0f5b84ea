//! Supplier catalog and dropshipper product entities.

use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::audit::AuditTrail;
use crate::error::DomainError;
use crate::reference::Reference;
use crate::serde_helpers;
use crate::status::flag;
use crate::variant::VariantInput;

/// Supplier catalog product (without variants)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(with = "serde_helpers::id")]
    pub id: i64,
    #[serde(with = "serde_helpers::id")]
    pub supplier_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub sku: String,
    pub gallery: Vec<String>,
    pub status: bool,
    #[serde(flatten)]
    pub audit: AuditTrail,
}

/// Supplier variant. `price` is in minor currency units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    #[serde(with = "serde_helpers::id")]
    pub id: i64,
    #[serde(with = "serde_helpers::id")]
    pub product_id: i64,
    pub sku: String,
    pub name: String,
    pub price: i64,
    pub stock: i32,
}

/// Product together with its variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogProduct<V = ProductVariant> {
    #[serde(flatten)]
    pub product: Product,
    pub variants: Vec<V>,
}

/// Supplier variant annotated with the cheapest price another dropshipper set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricedVariant {
    #[serde(flatten)]
    pub variant: ProductVariant,
    pub lowest_other_dropshipper_suggested_price: Option<i64>,
}

/// A supplier product onboarded by a dropshipper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropshipperProduct {
    #[serde(with = "serde_helpers::id")]
    pub id: i64,
    #[serde(with = "serde_helpers::id")]
    pub dropshipper_id: i64,
    #[serde(with = "serde_helpers::id")]
    pub product_id: i64,
    #[serde(with = "serde_helpers::id")]
    pub supplier_id: i64,
    pub status: bool,
    #[serde(flatten)]
    pub audit: AuditTrail,
    pub variants: Vec<DropshipperProductVariant>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub product: Option<CatalogProduct>,
}

/// Dropshipper selling price for one supplier variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropshipperProductVariant {
    #[serde(with = "serde_helpers::id")]
    pub id: i64,
    #[serde(with = "serde_helpers::id")]
    pub dropshipper_product_id: i64,
    #[serde(with = "serde_helpers::id")]
    pub dropshipper_id: i64,
    #[serde(with = "serde_helpers::id")]
    pub product_variant_id: i64,
    pub price: i64,
    pub status: bool,
    #[serde(flatten)]
    pub audit: AuditTrail,
}

fn default_true() -> bool {
    true
}

/// Product creation payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    #[validate(length(min = 1, message = "Product name is required"))]
    pub name: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Product SKU is required"))]
    pub sku: String,
    #[serde(default = "default_true", deserialize_with = "flag::deserialize")]
    pub status: bool,
    #[serde(default)]
    pub variants: Vec<VariantInput>,
}

/// Product update payload. `variants`, when present, replaces the stored set.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(min = 1, message = "Product name cannot be empty"))]
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "flag::option::deserialize")]
    pub status: Option<bool>,
    pub variants: Option<Vec<VariantInput>>,
}

/// Selling price for one supplier variant
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct VariantPrice {
    pub variant: Reference<ProductVariant>,
    #[validate(range(min = 0, message = "Price cannot be negative"))]
    pub price: i64,
}

/// Onboarding payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewDropshipperProduct {
    pub product: Reference<Product>,
    #[validate(length(min = 1, message = "At least one variant price is required"))]
    pub variants: Vec<VariantPrice>,
    #[serde(default = "default_true", deserialize_with = "flag::deserialize")]
    pub status: bool,
}

/// Which slice of the catalog a dropshipper is looking at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogMode {
    /// Whole supplier catalog
    All,
    /// Products the dropshipper onboarded
    My,
    /// Supplier catalog priced against other dropshippers
    NotMy,
}

impl FromStr for CatalogMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(CatalogMode::All),
            "my" => Ok(CatalogMode::My),
            "notmy" => Ok(CatalogMode::NotMy),
            _ => Err(DomainError::validation("Invalid type")),
        }
    }
}

/// Result of a catalog query; the shape depends on the mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CatalogListing {
    Supplier(Vec<CatalogProduct>),
    Mine(Vec<DropshipperProduct>),
    Others(Vec<CatalogProduct<PricedVariant>>),
}

impl CatalogListing {
    pub fn len(&self) -> usize {
        match self {
            CatalogListing::Supplier(items) => items.len(),
            CatalogListing::Mine(items) => items.len(),
            CatalogListing::Others(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cheapest price per variant from `(variant_id, price)` rows.
pub fn lowest_prices<I>(rows: I) -> HashMap<i64, i64>
where
    I: IntoIterator<Item = (i64, i64)>,
{
    let mut lowest = HashMap::new();
    for (variant_id, price) in rows {
        lowest
            .entry(variant_id)
            .and_modify(|current: &mut i64| *current = (*current).min(price))
            .or_insert(price);
    }
    lowest
}

/// Attach the competing price to every variant of every product.
pub fn price_against_others(
    products: Vec<CatalogProduct>,
    lowest: &HashMap<i64, i64>,
) -> Vec<CatalogProduct<PricedVariant>> {
    products
        .into_iter()
        .map(|entry| CatalogProduct {
            product: entry.product,
            variants: entry
                .variants
                .into_iter()
                .map(|variant| PricedVariant {
                    lowest_other_dropshipper_suggested_price: lowest.get(&variant.id).copied(),
                    variant,
                })
                .collect(),
        })
        .collect()
}

/// Keep the first entry per product id, preserving order.
pub fn dedupe_by_product<V>(products: Vec<CatalogProduct<V>>) -> Vec<CatalogProduct<V>> {
    let mut seen = HashSet::with_capacity(products.len());
    products
        .into_iter()
        .filter(|entry| seen.insert(entry.product.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: i64) -> Product {
        Product {
            id,
            supplier_id: 1,
            name: format!("Product {}", id),
            description: None,
            sku: format!("P-{}", id),
            gallery: Vec::new(),
            status: true,
            audit: AuditTrail::created(None, Utc::now()),
        }
    }

    fn variant(id: i64, product_id: i64) -> ProductVariant {
        ProductVariant {
            id,
            product_id,
            sku: format!("V-{}", id),
            name: format!("Variant {}", id),
            price: 100,
            stock: 5,
        }
    }

    #[test]
    fn test_lowest_prices_picks_minimum_per_variant() {
        let lowest = lowest_prices([(1, 500), (2, 300), (1, 450), (1, 900)]);
        assert_eq!(lowest.get(&1), Some(&450));
        assert_eq!(lowest.get(&2), Some(&300));
        assert_eq!(lowest.get(&3), None);
    }

    #[test]
    fn test_unpriced_variant_gets_null() {
        let products = vec![CatalogProduct {
            product: product(1),
            variants: vec![variant(10, 1), variant(11, 1)],
        }];
        let lowest = lowest_prices([(10, 250)]);

        let priced = price_against_others(products, &lowest);

        assert_eq!(
            priced[0].variants[0].lowest_other_dropshipper_suggested_price,
            Some(250)
        );
        assert_eq!(priced[0].variants[1].lowest_other_dropshipper_suggested_price, None);
    }

    #[test]
    fn test_dedupe_keeps_first_occurrence_order() {
        let entries = [3, 1, 3, 2, 1]
            .into_iter()
            .map(|id| CatalogProduct::<ProductVariant> {
                product: product(id),
                variants: Vec::new(),
            })
            .collect();

        let ids: Vec<i64> = dedupe_by_product(entries)
            .into_iter()
            .map(|e| e.product.id)
            .collect();

        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_catalog_mode_parsing() {
        assert_eq!("notmy".parse::<CatalogMode>().unwrap(), CatalogMode::NotMy);
        assert_eq!("My".parse::<CatalogMode>().unwrap(), CatalogMode::My);
        assert!("mine".parse::<CatalogMode>().is_err());
    }

    #[test]
    fn test_priced_variant_wire_shape() {
        let priced = PricedVariant {
            variant: variant(10, 1),
            lowest_other_dropshipper_suggested_price: None,
        };
        let json = serde_json::to_value(&priced).unwrap();
        assert_eq!(json["id"], "10");
        assert_eq!(json["productId"], "1");
        assert!(json["lowestOtherDropshipperSuggestedPrice"].is_null());
    }

    #[test]
    fn test_onboarding_payload_requires_a_price() {
        let empty = NewDropshipperProduct {
            product: Reference::new(1),
            variants: Vec::new(),
            status: true,
        };
        let err = crate::validation::check(&empty).unwrap_err();
        assert_eq!(
            err,
            DomainError::validation("At least one variant price is required")
        );

        let negative = VariantPrice {
            variant: Reference::new(7),
            price: -1,
        };
        assert_eq!(
            crate::validation::check(&negative).unwrap_err(),
            DomainError::validation("Price cannot be negative")
        );

        let json = serde_json::to_value(&negative).unwrap();
        assert_eq!(json["variant"], serde_json::json!("7"));
    }
}
