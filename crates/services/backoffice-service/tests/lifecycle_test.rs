//! Soft-delete lifecycle against a real (in-memory SQLite) database.

mod support;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use backoffice_service_lib::{EntityKind, Operator, Services};
use common::AppError;
use domain::{
    Actor, ActorRole, DropshipperProduct, DropshipperProfile, ListStatus, NewDropshipperProduct,
    Reference, Staff, VariantPrice,
};

use support::{
    admin_session, bank_account, execute, new_dropshipper, new_product, new_staff, seed_supplier,
    services, session, setup_db, variant, RecordingStorage,
};

async fn dropshipper_with_accounts(
    services: &Services,
    name: &str,
    email: &str,
) -> DropshipperProfile {
    let admin = admin_session();
    let profile = services
        .dropshippers
        .create_dropshipper(&admin, new_dropshipper(name, email))
        .await
        .expect("dropshipper");
    let id = profile.dropshipper.id;

    for number in ["001234567890", "009876543210"] {
        services
            .bank_accounts
            .add_bank_account(&admin, id, bank_account(number))
            .await
            .expect("bank account");
    }

    services
        .dropshippers
        .get_dropshipper(&admin, id)
        .await
        .expect("profile")
}

/// A staff member and a priced onboarding owned by `dropshipper_id`.
async fn staff_and_onboarding(
    db: &DatabaseConnection,
    services: &Services,
    dropshipper_id: i64,
) -> (i64, i64) {
    let owner = session(Actor::dropshipper(dropshipper_id));
    let staff = services
        .staff
        .create_staff(&owner, dropshipper_id, new_staff("Ravi", "ravi@example.com"))
        .await
        .expect("staff");

    let supplier_id = seed_supplier(db, "supplier@example.com").await;
    let shirt = services
        .products
        .create_product(
            &session(Actor::supplier(supplier_id)),
            supplier_id,
            new_product("SHIRT", vec![variant("S", 100)]),
        )
        .await
        .expect("product");
    let onboarding = services
        .dropshipper_products
        .add_product(
            &owner,
            dropshipper_id,
            NewDropshipperProduct {
                product: Reference::new(shirt.product.id),
                variants: vec![VariantPrice {
                    variant: Reference::new(shirt.variants[0].id),
                    price: 120,
                }],
                status: true,
            },
        )
        .await
        .expect("onboarding");

    (staff.id, onboarding.id)
}

async fn staff_member(services: &Services, id: i64) -> Staff {
    let admin = admin_session();
    let mut all = services
        .staff
        .list_staff(&admin, ListStatus::NotDeleted)
        .await
        .unwrap();
    all.extend(
        services
            .staff
            .list_staff(&admin, ListStatus::Deleted)
            .await
            .unwrap(),
    );
    all.into_iter().find(|m| m.id == id).expect("staff member")
}

async fn onboarding(services: &Services, id: i64) -> DropshipperProduct {
    services
        .dropshipper_products
        .get_product(&admin_session(), id)
        .await
        .expect("onboarding")
}

async fn listed_ids(services: &Services, status: ListStatus) -> Vec<i64> {
    let mut ids: Vec<i64> = services
        .dropshippers
        .list_dropshippers(&admin_session(), status)
        .await
        .unwrap()
        .into_iter()
        .map(|d| d.id)
        .collect();
    ids.sort_unstable();
    ids
}

#[tokio::test]
async fn test_soft_delete_cascades_to_everything_the_dropshipper_owns() {
    let db = setup_db().await;
    let services = services(&db, Arc::new(RecordingStorage::default()));
    let profile = dropshipper_with_accounts(&services, "Asha", "asha@example.com").await;
    assert_eq!(profile.bank_accounts.len(), 2);
    let (staff_id, onboarding_id) =
        staff_and_onboarding(&db, &services, profile.dropshipper.id).await;

    let trashed = services
        .dropshippers
        .soft_delete(&admin_session(), profile.dropshipper.id)
        .await
        .unwrap();

    let audit = &trashed.dropshipper.audit;
    assert!(audit.is_trashed());
    assert_eq!(audit.deleted_by, Some(1));
    assert_eq!(audit.deleted_by_role, Some(ActorRole::Admin));

    let company = trashed.company_detail.expect("company detail");
    assert_eq!(company.audit.deleted_at, audit.deleted_at);
    assert_eq!(company.audit.deleted_by, Some(1));

    assert_eq!(trashed.bank_accounts.len(), 2);
    for account in &trashed.bank_accounts {
        assert_eq!(account.audit.deleted_at, audit.deleted_at);
        assert_eq!(account.audit.deleted_by_role, Some(ActorRole::Admin));
    }

    let member = staff_member(&services, staff_id).await;
    assert_eq!(member.audit.deleted_at, audit.deleted_at);

    let onboarding = onboarding(&services, onboarding_id).await;
    assert_eq!(onboarding.audit.deleted_at, audit.deleted_at);
    assert_eq!(onboarding.variants.len(), 1);
    assert_eq!(onboarding.variants[0].audit.deleted_at, audit.deleted_at);
}

#[tokio::test]
async fn test_restore_clears_every_deletion_stamp() {
    let db = setup_db().await;
    let services = services(&db, Arc::new(RecordingStorage::default()));
    let profile = dropshipper_with_accounts(&services, "Asha", "asha@example.com").await;
    let id = profile.dropshipper.id;
    let (staff_id, onboarding_id) = staff_and_onboarding(&db, &services, id).await;

    services
        .dropshippers
        .soft_delete(&admin_session(), id)
        .await
        .unwrap();
    let restored = services
        .dropshippers
        .restore(&session(Actor::admin(2)), id)
        .await
        .unwrap();

    let audit = &restored.dropshipper.audit;
    assert!(audit.is_live());
    assert_eq!(audit.deleted_by, None);
    assert_eq!(audit.deleted_by_role, None);
    assert_eq!(audit.updated_by, Some(2));
    assert_eq!(audit.updated_by_role, Some(ActorRole::Admin));

    let company = restored.company_detail.expect("company detail");
    assert!(company.audit.is_live());
    assert!(restored.bank_accounts.iter().all(|a| a.audit.is_live()));
    assert_eq!(restored.bank_accounts.len(), 2);

    assert!(staff_member(&services, staff_id).await.audit.is_live());
    let onboarding = onboarding(&services, onboarding_id).await;
    assert!(onboarding.audit.is_live());
    assert_eq!(onboarding.variants.len(), 1);
    assert!(onboarding.variants[0].audit.is_live());
}

#[tokio::test]
async fn test_restore_keeps_dependents_trashed_on_their_own() {
    let db = setup_db().await;
    let services = services(&db, Arc::new(RecordingStorage::default()));
    let profile = dropshipper_with_accounts(&services, "Asha", "asha@example.com").await;
    let id = profile.dropshipper.id;
    let (_, onboarding_id) = staff_and_onboarding(&db, &services, id).await;
    let admin = admin_session();

    let closed = profile.bank_accounts[0].id;
    services
        .bank_accounts
        .soft_delete(&admin, closed)
        .await
        .unwrap();
    services
        .dropshipper_products
        .soft_delete(&session(Actor::dropshipper(id)), onboarding_id)
        .await
        .unwrap();

    services.dropshippers.soft_delete(&admin, id).await.unwrap();
    let restored = services.dropshippers.restore(&admin, id).await.unwrap();

    let live: Vec<i64> = restored.bank_accounts.iter().map(|a| a.id).collect();
    assert_eq!(live, vec![profile.bank_accounts[1].id]);

    let trashed = services
        .bank_accounts
        .list_bank_accounts(&admin, ListStatus::Deleted)
        .await
        .unwrap();
    assert_eq!(trashed.len(), 1);
    assert_eq!(trashed[0].id, closed);
    assert!(onboarding(&services, onboarding_id).await.audit.is_trashed());
}

#[tokio::test]
async fn test_failed_cascade_rolls_back_the_parent() {
    let db = setup_db().await;
    let services = services(&db, Arc::new(RecordingStorage::default()));
    let profile = dropshipper_with_accounts(&services, "Asha", "asha@example.com").await;
    let id = profile.dropshipper.id;

    execute(
        &db,
        "CREATE TRIGGER freeze_bank_accounts BEFORE UPDATE ON bank_accounts \
         BEGIN SELECT RAISE(ABORT, 'bank accounts are frozen'); END;",
    )
    .await;

    let result = services.dropshippers.soft_delete(&admin_session(), id).await;
    match assert_err!(result) {
        AppError::OperationFailed(message) => {
            assert_eq!(message, "Error soft deleting Dropshipper")
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let after = assert_ok!(services.dropshippers.get_dropshipper(&admin_session(), id).await);
    assert!(after.dropshipper.audit.is_live());
    assert!(after.company_detail.expect("company detail").audit.is_live());
    assert!(after.bank_accounts.iter().all(|a| a.audit.is_live()));
}

#[tokio::test]
async fn test_status_filters_partition_the_records() {
    let db = setup_db().await;
    let services = services(&db, Arc::new(RecordingStorage::default()));
    let admin = admin_session();

    let active = services
        .dropshippers
        .create_dropshipper(&admin, new_dropshipper("Active", "active@example.com"))
        .await
        .unwrap()
        .dropshipper;
    let inactive = services
        .dropshippers
        .create_dropshipper(&admin, new_dropshipper("Inactive", "inactive@example.com"))
        .await
        .unwrap()
        .dropshipper;
    let trashed = services
        .dropshippers
        .create_dropshipper(&admin, new_dropshipper("Trashed", "trashed@example.com"))
        .await
        .unwrap()
        .dropshipper;

    services
        .dropshippers
        .set_status(&admin, inactive.id, false)
        .await
        .unwrap();
    services
        .dropshippers
        .soft_delete(&admin, trashed.id)
        .await
        .unwrap();

    assert_eq!(listed_ids(&services, ListStatus::Active).await, vec![active.id]);
    assert_eq!(listed_ids(&services, ListStatus::Inactive).await, vec![inactive.id]);
    assert_eq!(listed_ids(&services, ListStatus::Deleted).await, vec![trashed.id]);
    assert_eq!(
        listed_ids(&services, ListStatus::NotDeleted).await,
        vec![active.id, inactive.id]
    );
}

#[tokio::test]
async fn test_double_soft_delete_restamps() {
    let db = setup_db().await;
    let services = services(&db, Arc::new(RecordingStorage::default()));
    let profile = dropshipper_with_accounts(&services, "Asha", "asha@example.com").await;
    let id = profile.dropshipper.id;

    services
        .dropshippers
        .soft_delete(&admin_session(), id)
        .await
        .unwrap();
    let again = services
        .dropshippers
        .soft_delete(&session(Actor::admin(3)), id)
        .await
        .unwrap();

    assert!(again.dropshipper.audit.is_trashed());
    assert_eq!(again.dropshipper.audit.deleted_by, Some(3));
}

#[tokio::test]
async fn test_permanent_delete_removes_dependents() {
    let db = setup_db().await;
    let services = services(&db, Arc::new(RecordingStorage::default()));
    let profile = dropshipper_with_accounts(&services, "Asha", "asha@example.com").await;
    let id = profile.dropshipper.id;
    staff_and_onboarding(&db, &services, id).await;
    let admin = admin_session();

    services.dropshippers.soft_delete(&admin, id).await.unwrap();
    assert_ok!(services.dropshippers.permanent_delete(&admin, id).await);

    let lookup = services.dropshippers.get_dropshipper(&admin, id).await;
    assert!(matches!(lookup, Err(AppError::NotFound(_))));

    for status in [ListStatus::NotDeleted, ListStatus::Deleted] {
        let details = services
            .company_details
            .list_company_details(&admin, status)
            .await
            .unwrap();
        assert!(details.is_empty());
        let accounts = services
            .bank_accounts
            .list_bank_accounts(&admin, status)
            .await
            .unwrap();
        assert!(accounts.is_empty());
        let staff = services.staff.list_staff(&admin, status).await.unwrap();
        assert!(staff.is_empty());
        let onboardings = services
            .dropshipper_products
            .list_products(&admin, status)
            .await
            .unwrap();
        assert!(onboardings.is_empty());
    }
}

#[tokio::test]
async fn test_live_records_cannot_be_purged() {
    let db = setup_db().await;
    let services = services(&db, Arc::new(RecordingStorage::default()));
    let profile = dropshipper_with_accounts(&services, "Asha", "asha@example.com").await;
    let id = profile.dropshipper.id;
    let admin = admin_session();

    let result = services.dropshippers.permanent_delete(&admin, id).await;
    match assert_err!(result) {
        AppError::Validation(message) => assert_eq!(
            message,
            "Dropshipper must be trashed before permanent deletion"
        ),
        other => panic!("unexpected error: {:?}", other),
    }

    let account = profile.bank_accounts[0].id;
    let result = services.bank_accounts.permanent_delete(&admin, account).await;
    assert!(matches!(result, Err(AppError::Validation(_))));

    let kept = assert_ok!(services.dropshippers.get_dropshipper(&admin, id).await);
    assert!(kept.dropshipper.audit.is_live());
    assert_eq!(kept.bank_accounts.len(), 2);
    assert!(kept.company_detail.is_some());

    let missing = services.dropshippers.permanent_delete(&admin, 999).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn test_operator_envelopes() {
    let db = setup_db().await;
    let services = services(&db, Arc::new(RecordingStorage::default()));
    let profile = dropshipper_with_accounts(&services, "Asha", "asha@example.com").await;
    let id = profile.dropshipper.id;
    let operator = Operator::new(services);
    let admin = admin_session();

    let envelope = operator.trash(&admin, EntityKind::Dropshipper, id).await;
    assert!(envelope.status);
    assert_eq!(
        envelope.message.as_deref(),
        Some("Dropshipper soft deleted successfully")
    );
    let dropshipper = envelope.get("dropshipper").expect("dropshipper payload");
    assert_eq!(dropshipper["id"], json!(id.to_string()));
    assert_eq!(dropshipper["deletedBy"], json!("1"));
    assert_eq!(dropshipper["deletedByRole"], json!("admin"));
    assert_eq!(dropshipper["bankAccounts"].as_array().map(Vec::len), Some(2));

    let listing = operator
        .list(&admin, EntityKind::Dropshipper, ListStatus::Deleted)
        .await;
    let listed = listing.get("dropshippers").and_then(|v| v.as_array());
    assert_eq!(listed.map(Vec::len), Some(1));

    let envelope = operator.restore(&admin, EntityKind::Dropshipper, id).await;
    assert_eq!(
        envelope.message.as_deref(),
        Some("Dropshipper restored successfully")
    );

    let missing = operator.trash(&admin, EntityKind::Dropshipper, 999).await;
    assert!(!missing.status);
    assert_eq!(missing.message.as_deref(), Some("Dropshipper not found"));

    let forbidden = operator
        .purge(&session(Actor::dropshipper(id)), EntityKind::Dropshipper, id)
        .await;
    assert!(!forbidden.status);
    assert_eq!(forbidden.message.as_deref(), Some("Access denied"));

    let live = operator.purge(&admin, EntityKind::Dropshipper, id).await;
    assert!(!live.status);
    assert_eq!(
        live.message.as_deref(),
        Some("Dropshipper must be trashed before permanent deletion")
    );

    operator.trash(&admin, EntityKind::Dropshipper, id).await;
    let purged = operator.purge(&admin, EntityKind::Dropshipper, id).await;
    assert_eq!(
        purged.message.as_deref(),
        Some("Dropshipper permanently deleted successfully")
    );
}
