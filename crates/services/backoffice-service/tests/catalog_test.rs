//! Supplier catalog, variant reconciliation, gallery removal and the
//! dropshipper catalog views.

mod support;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tokio_test::assert_ok;

use backoffice_service_lib::Services;
use common::AppError;
use domain::{
    Actor, CatalogListing, CatalogMode, CatalogProduct, ListStatus, NewDropshipperProduct,
    Reference, UpdateProduct, VariantPrice,
};

use support::{
    admin_session, new_dropshipper, new_product, seed_supplier, services, session, setup_db,
    variant, RecordingStorage,
};

fn variant_ids(entry: &CatalogProduct) -> HashMap<String, i64> {
    entry
        .variants
        .iter()
        .map(|v| (v.sku.clone(), v.id))
        .collect()
}

async fn dropshipper(services: &Services, name: &str) -> i64 {
    let email = format!("{}@example.com", name.to_lowercase());
    services
        .dropshippers
        .create_dropshipper(&admin_session(), new_dropshipper(name, &email))
        .await
        .expect("dropshipper")
        .dropshipper
        .id
}

async fn onboard(
    services: &Services,
    dropshipper_id: i64,
    product_id: i64,
    prices: &[(i64, i64)],
) -> i64 {
    let input = NewDropshipperProduct {
        product: Reference::new(product_id),
        variants: prices
            .iter()
            .map(|&(variant_id, price)| VariantPrice {
                variant: Reference::new(variant_id),
                price,
            })
            .collect(),
        status: true,
    };
    services
        .dropshipper_products
        .add_product(&session(Actor::dropshipper(dropshipper_id)), dropshipper_id, input)
        .await
        .expect("onboarding")
        .id
}

#[tokio::test]
async fn test_update_reconciles_variants_by_sku() {
    let db = setup_db().await;
    let services = services(&db, Arc::new(RecordingStorage::default()));
    let supplier_id = seed_supplier(&db, "supplier@example.com").await;
    let supplier = session(Actor::supplier(supplier_id));

    let created = services
        .products
        .create_product(
            &supplier,
            supplier_id,
            new_product("TEE", vec![variant("A", 10), variant("B", 20), variant("C", 30)]),
        )
        .await
        .unwrap();
    let before = variant_ids(&created);

    let changes = UpdateProduct {
        variants: Some(vec![variant("A", 15), variant("D", 40)]),
        ..UpdateProduct::default()
    };
    let updated = services
        .products
        .update_product(&supplier, created.product.id, changes)
        .await
        .unwrap();
    assert_eq!(updated.variants.len(), 2);

    let stored = services
        .products
        .get_product(&supplier, created.product.id)
        .await
        .unwrap();

    let mut skus: Vec<(&str, i64)> = stored
        .variants
        .iter()
        .map(|v| (v.sku.as_str(), v.price))
        .collect();
    skus.sort_unstable();
    assert_eq!(skus, vec![("A", 15), ("D", 40)]);

    // A is updated in place, D is new
    let after = variant_ids(&stored);
    assert_eq!(after["A"], before["A"]);
    assert!(!before.values().any(|id| *id == after["D"]));
}

#[tokio::test]
async fn test_duplicate_variant_skus_are_rejected() {
    let db = setup_db().await;
    let services = services(&db, Arc::new(RecordingStorage::default()));
    let supplier_id = seed_supplier(&db, "supplier@example.com").await;

    let result = services
        .products
        .create_product(
            &session(Actor::supplier(supplier_id)),
            supplier_id,
            new_product("TEE", vec![variant("A", 10), variant("A", 12)]),
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn test_gallery_removal_deletes_the_file_once() {
    let db = setup_db().await;
    let storage = Arc::new(RecordingStorage::default());
    let services = services(&db, storage.clone());
    let supplier_id = seed_supplier(&db, "supplier@example.com").await;
    let supplier = session(Actor::supplier(supplier_id));

    let product = services
        .products
        .create_product(&supplier, supplier_id, new_product("MUG", vec![variant("M", 99)]))
        .await
        .unwrap()
        .product;
    for image in ["img1.png", "img2.png", "img3.png"] {
        services
            .products
            .add_gallery_image(&supplier, product.id, image.to_string())
            .await
            .unwrap();
    }

    let removal = services
        .products
        .remove_gallery_image(&supplier, product.id, 1)
        .await
        .unwrap();

    assert_eq!(removal.removed_image, "img2.png");
    assert_eq!(removal.product.gallery, vec!["img1.png", "img3.png"]);
    assert!(removal.file_deleted);
    assert_eq!(removal.file_error, None);
    assert_eq!(storage.deleted(), vec![PathBuf::from("/uploads/img2.png")]);
}

#[tokio::test]
async fn test_gallery_storage_failure_keeps_metadata_change() {
    let db = setup_db().await;
    let storage = Arc::new(RecordingStorage::failing("disk unavailable"));
    let services = services(&db, storage.clone());
    let supplier_id = seed_supplier(&db, "supplier@example.com").await;
    let supplier = session(Actor::supplier(supplier_id));

    let product = services
        .products
        .create_product(&supplier, supplier_id, new_product("MUG", vec![variant("M", 99)]))
        .await
        .unwrap()
        .product;
    services
        .products
        .add_gallery_image(&supplier, product.id, "img1.png".to_string())
        .await
        .unwrap();

    let removal = assert_ok!(
        services
            .products
            .remove_gallery_image(&supplier, product.id, 0)
            .await
    );
    assert!(!removal.file_deleted);
    assert!(removal.file_error.is_some());
    assert_eq!(storage.deleted().len(), 1);

    let stored = services
        .products
        .get_product(&supplier, product.id)
        .await
        .unwrap();
    assert!(stored.product.gallery.is_empty());
}

#[tokio::test]
async fn test_gallery_index_out_of_range_touches_nothing() {
    let db = setup_db().await;
    let storage = Arc::new(RecordingStorage::default());
    let services = services(&db, storage.clone());
    let supplier_id = seed_supplier(&db, "supplier@example.com").await;
    let supplier = session(Actor::supplier(supplier_id));

    let product = services
        .products
        .create_product(&supplier, supplier_id, new_product("MUG", vec![variant("M", 99)]))
        .await
        .unwrap()
        .product;

    let result = services
        .products
        .remove_gallery_image(&supplier, product.id, 0)
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(storage.deleted().is_empty());
}

#[tokio::test]
async fn test_notmy_prices_against_other_dropshippers_only() {
    let db = setup_db().await;
    let services = services(&db, Arc::new(RecordingStorage::default()));
    let supplier_id = seed_supplier(&db, "supplier@example.com").await;
    let supplier = session(Actor::supplier(supplier_id));

    let shirt = services
        .products
        .create_product(
            &supplier,
            supplier_id,
            new_product("SHIRT", vec![variant("S", 100), variant("L", 200)]),
        )
        .await
        .unwrap();
    let cap = services
        .products
        .create_product(&supplier, supplier_id, new_product("CAP", vec![variant("C", 300)]))
        .await
        .unwrap();
    let shirt_variants = variant_ids(&shirt);
    let (small, large) = (shirt_variants["S"], shirt_variants["L"]);

    let me = dropshipper(&services, "Me").await;
    let rival = dropshipper(&services, "Rival").await;
    let other = dropshipper(&services, "Other").await;

    onboard(&services, me, shirt.product.id, &[(small, 90)]).await;
    onboard(&services, rival, shirt.product.id, &[(small, 150), (large, 250)]).await;
    let cheapest = onboard(&services, other, shirt.product.id, &[(small, 140)]).await;

    let my_session = session(Actor::dropshipper(me));
    let listing = services
        .catalog
        .catalog(&my_session, CatalogMode::NotMy, ListStatus::NotDeleted)
        .await
        .unwrap();

    let CatalogListing::Others(products) = listing else {
        panic!("expected the notmy listing");
    };
    assert_eq!(products.len(), 2);
    let prices: HashMap<i64, Option<i64>> = products
        .iter()
        .flat_map(|entry| entry.variants.iter())
        .map(|v| (v.variant.id, v.lowest_other_dropshipper_suggested_price))
        .collect();
    assert_eq!(prices[&small], Some(140));
    assert_eq!(prices[&large], Some(250));
    assert_eq!(prices[&cap.variants[0].id], None);

    // Trashed onboardings no longer compete
    services
        .dropshipper_products
        .soft_delete(&session(Actor::dropshipper(other)), cheapest)
        .await
        .unwrap();
    let listing = services
        .catalog
        .catalog(&my_session, CatalogMode::NotMy, ListStatus::NotDeleted)
        .await
        .unwrap();
    let CatalogListing::Others(products) = listing else {
        panic!("expected the notmy listing");
    };
    let small_price = products
        .iter()
        .flat_map(|entry| entry.variants.iter())
        .find(|v| v.variant.id == small)
        .and_then(|v| v.lowest_other_dropshipper_suggested_price);
    assert_eq!(small_price, Some(150));
}

#[tokio::test]
async fn test_my_and_all_catalog_views() {
    let db = setup_db().await;
    let services = services(&db, Arc::new(RecordingStorage::default()));
    let supplier_id = seed_supplier(&db, "supplier@example.com").await;
    let supplier = session(Actor::supplier(supplier_id));

    let shirt = services
        .products
        .create_product(&supplier, supplier_id, new_product("SHIRT", vec![variant("S", 100)]))
        .await
        .unwrap();
    services
        .products
        .create_product(&supplier, supplier_id, new_product("CAP", vec![variant("C", 300)]))
        .await
        .unwrap();

    let me = dropshipper(&services, "Me").await;
    onboard(&services, me, shirt.product.id, &[(shirt.variants[0].id, 120)]).await;
    let my_session = session(Actor::dropshipper(me));

    let all = services
        .catalog
        .catalog(&my_session, CatalogMode::All, ListStatus::NotDeleted)
        .await
        .unwrap();
    assert!(matches!(all, CatalogListing::Supplier(ref items) if items.len() == 2));

    let mine = services
        .catalog
        .catalog(&my_session, CatalogMode::My, ListStatus::NotDeleted)
        .await
        .unwrap();
    let CatalogListing::Mine(onboardings) = mine else {
        panic!("expected the my listing");
    };
    assert_eq!(onboardings.len(), 1);
    assert_eq!(onboardings[0].variants[0].price, 120);
    let attached = onboardings[0].product.as_ref().expect("supplier product");
    assert_eq!(attached.product.id, shirt.product.id);

    // Admins have no catalog of their own
    let result = services
        .catalog
        .catalog(&admin_session(), CatalogMode::All, ListStatus::NotDeleted)
        .await;
    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn test_product_cannot_be_onboarded_twice() {
    let db = setup_db().await;
    let services = services(&db, Arc::new(RecordingStorage::default()));
    let supplier_id = seed_supplier(&db, "supplier@example.com").await;

    let shirt = services
        .products
        .create_product(
            &session(Actor::supplier(supplier_id)),
            supplier_id,
            new_product("SHIRT", vec![variant("S", 100)]),
        )
        .await
        .unwrap();
    let me = dropshipper(&services, "Me").await;
    let variant_id = shirt.variants[0].id;
    onboard(&services, me, shirt.product.id, &[(variant_id, 120)]).await;

    let again = services
        .dropshipper_products
        .add_product(
            &session(Actor::dropshipper(me)),
            me,
            NewDropshipperProduct {
                product: Reference::new(shirt.product.id),
                variants: vec![VariantPrice {
                    variant: Reference::new(variant_id),
                    price: 110,
                }],
                status: true,
            },
        )
        .await;

    match again {
        Err(AppError::Validation(message)) => assert_eq!(message, "Product already added"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[tokio::test]
async fn test_trashed_dropshipper_prices_drop_out_of_notmy() {
    let db = setup_db().await;
    let services = services(&db, Arc::new(RecordingStorage::default()));
    let supplier_id = seed_supplier(&db, "supplier@example.com").await;

    let shirt = services
        .products
        .create_product(
            &session(Actor::supplier(supplier_id)),
            supplier_id,
            new_product("SHIRT", vec![variant("S", 100)]),
        )
        .await
        .unwrap();
    let small = shirt.variants[0].id;

    let me = dropshipper(&services, "Me").await;
    let rival = dropshipper(&services, "Rival").await;
    let other = dropshipper(&services, "Other").await;
    onboard(&services, rival, shirt.product.id, &[(small, 50)]).await;
    onboard(&services, other, shirt.product.id, &[(small, 80)]).await;

    services
        .dropshippers
        .soft_delete(&admin_session(), rival)
        .await
        .unwrap();

    let listing = services
        .catalog
        .catalog(&session(Actor::dropshipper(me)), CatalogMode::NotMy, ListStatus::NotDeleted)
        .await
        .unwrap();
    let CatalogListing::Others(products) = listing else {
        panic!("expected the notmy listing");
    };
    assert_eq!(products[0].variants[0].lowest_other_dropshipper_suggested_price, Some(80));

    let rival_onboardings = services
        .catalog
        .catalog(&session(Actor::dropshipper(rival)), CatalogMode::My, ListStatus::NotDeleted)
        .await
        .unwrap();
    assert!(matches!(rival_onboardings, CatalogListing::Mine(ref items) if items.is_empty()));
}

#[tokio::test]
async fn test_trashed_product_leaves_my_catalog_until_restored() {
    let db = setup_db().await;
    let services = services(&db, Arc::new(RecordingStorage::default()));
    let supplier_id = seed_supplier(&db, "supplier@example.com").await;
    let supplier = session(Actor::supplier(supplier_id));

    let shirt = services
        .products
        .create_product(&supplier, supplier_id, new_product("SHIRT", vec![variant("S", 100)]))
        .await
        .unwrap();
    let me = dropshipper(&services, "Me").await;
    let onboarding_id =
        onboard(&services, me, shirt.product.id, &[(shirt.variants[0].id, 120)]).await;
    let my_session = session(Actor::dropshipper(me));

    let trashed = services
        .products
        .soft_delete(&supplier, shirt.product.id)
        .await
        .unwrap();

    let mine = services
        .catalog
        .catalog(&my_session, CatalogMode::My, ListStatus::NotDeleted)
        .await
        .unwrap();
    assert!(matches!(mine, CatalogListing::Mine(ref items) if items.is_empty()));

    let binned = services
        .catalog
        .catalog(&my_session, CatalogMode::My, ListStatus::Deleted)
        .await
        .unwrap();
    let CatalogListing::Mine(binned) = binned else {
        panic!("expected the my listing");
    };
    assert_eq!(binned.len(), 1);
    assert_eq!(binned[0].id, onboarding_id);
    assert_eq!(binned[0].audit.deleted_at, trashed.audit.deleted_at);
    assert_eq!(binned[0].variants[0].audit.deleted_at, trashed.audit.deleted_at);

    services
        .products
        .restore(&supplier, shirt.product.id)
        .await
        .unwrap();
    let mine = services
        .catalog
        .catalog(&my_session, CatalogMode::My, ListStatus::NotDeleted)
        .await
        .unwrap();
    let CatalogListing::Mine(items) = mine else {
        panic!("expected the my listing");
    };
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].variants.len(), 1);
    assert_eq!(items[0].variants[0].price, 120);
}
