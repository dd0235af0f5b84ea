//! Soft-delete descriptions of the back-office tables.

use sea_orm::sea_query::Query;
use sea_orm::{ColumnTrait, Condition, EntityName};

use domain::ROLE_DROPSHIPPER;

use super::soft_delete::{AuditColumns, ChildOf, Dependent, SoftDelete};
use crate::repository::entities::{
    admin, bank_account, company_detail, dropshipper_product, dropshipper_product_variant,
    product, staff,
};

macro_rules! audit_columns {
    ($entity:ident) => {
        AuditColumns {
            updated_at: $entity::Column::UpdatedAt,
            updated_by: $entity::Column::UpdatedBy,
            updated_by_role: $entity::Column::UpdatedByRole,
            deleted_at: $entity::Column::DeletedAt,
            deleted_by: $entity::Column::DeletedBy,
            deleted_by_role: $entity::Column::DeletedByRole,
        }
    };
}

/// Dropshippers live in `admins`; everything they own follows them.
impl SoftDelete for admin::Entity {
    const LABEL: &'static str = "Dropshipper";

    fn id_column() -> admin::Column {
        admin::Column::Id
    }

    fn status_column() -> admin::Column {
        admin::Column::Status
    }

    fn owner_column() -> Option<admin::Column> {
        None
    }

    fn audit_columns() -> AuditColumns<admin::Column> {
        audit_columns!(admin)
    }

    fn scope() -> Condition {
        Condition::all().add(admin::Column::Role.eq(ROLE_DROPSHIPPER))
    }

    fn dependents() -> Vec<Box<dyn Dependent>> {
        vec![
            ChildOf::<company_detail::Entity>::boxed(company_detail::Column::AdminId),
            ChildOf::<bank_account::Entity>::boxed(bank_account::Column::AdminId),
            ChildOf::<staff::Entity>::boxed(staff::Column::AdminId),
            ChildOf::<dropshipper_product::Entity>::boxed(dropshipper_product::Column::DropshipperId),
            ChildOf::<dropshipper_product_variant::Entity>::boxed(
                dropshipper_product_variant::Column::DropshipperId,
            ),
        ]
    }
}

impl SoftDelete for company_detail::Entity {
    const LABEL: &'static str = "Company detail";

    fn id_column() -> company_detail::Column {
        company_detail::Column::Id
    }

    fn status_column() -> company_detail::Column {
        company_detail::Column::Status
    }

    fn owner_column() -> Option<company_detail::Column> {
        Some(company_detail::Column::AdminId)
    }

    fn audit_columns() -> AuditColumns<company_detail::Column> {
        audit_columns!(company_detail)
    }
}

impl SoftDelete for bank_account::Entity {
    const LABEL: &'static str = "Bank account";

    fn id_column() -> bank_account::Column {
        bank_account::Column::Id
    }

    fn status_column() -> bank_account::Column {
        bank_account::Column::Status
    }

    fn owner_column() -> Option<bank_account::Column> {
        Some(bank_account::Column::AdminId)
    }

    fn audit_columns() -> AuditColumns<bank_account::Column> {
        audit_columns!(bank_account)
    }
}

impl SoftDelete for staff::Entity {
    const LABEL: &'static str = "Staff";

    fn id_column() -> staff::Column {
        staff::Column::Id
    }

    fn status_column() -> staff::Column {
        staff::Column::Status
    }

    fn owner_column() -> Option<staff::Column> {
        Some(staff::Column::AdminId)
    }

    fn audit_columns() -> AuditColumns<staff::Column> {
        audit_columns!(staff)
    }
}

/// Supplier variants are hard-deleted by reconciliation and stay with the row.
/// Onboardings of the product and their prices follow it.
impl SoftDelete for product::Entity {
    const LABEL: &'static str = "Product";

    fn id_column() -> product::Column {
        product::Column::Id
    }

    fn status_column() -> product::Column {
        product::Column::Status
    }

    fn owner_column() -> Option<product::Column> {
        Some(product::Column::SupplierId)
    }

    fn audit_columns() -> AuditColumns<product::Column> {
        audit_columns!(product)
    }

    fn dependents() -> Vec<Box<dyn Dependent>> {
        vec![
            ChildOf::<dropshipper_product::Entity>::boxed(dropshipper_product::Column::ProductId),
            Box::new(ChildOf::<dropshipper_product_variant::Entity>::via(
                onboarding_variants_of_product,
            )),
        ]
    }
}

/// Onboarding prices reach the supplier product through `dropshipper_products`.
fn onboarding_variants_of_product(product_id: i64) -> Condition {
    let onboardings = Query::select()
        .column(dropshipper_product::Column::Id)
        .from(dropshipper_product::Entity.table_ref())
        .and_where(dropshipper_product::Column::ProductId.eq(product_id))
        .to_owned();
    Condition::all()
        .add(dropshipper_product_variant::Column::DropshipperProductId.in_subquery(onboardings))
}

impl SoftDelete for dropshipper_product::Entity {
    const LABEL: &'static str = "Dropshipper product";

    fn id_column() -> dropshipper_product::Column {
        dropshipper_product::Column::Id
    }

    fn status_column() -> dropshipper_product::Column {
        dropshipper_product::Column::Status
    }

    fn owner_column() -> Option<dropshipper_product::Column> {
        Some(dropshipper_product::Column::DropshipperId)
    }

    fn audit_columns() -> AuditColumns<dropshipper_product::Column> {
        audit_columns!(dropshipper_product)
    }

    fn dependents() -> Vec<Box<dyn Dependent>> {
        vec![ChildOf::<dropshipper_product_variant::Entity>::boxed(
            dropshipper_product_variant::Column::DropshipperProductId,
        )]
    }
}

impl SoftDelete for dropshipper_product_variant::Entity {
    const LABEL: &'static str = "Dropshipper product variant";

    fn id_column() -> dropshipper_product_variant::Column {
        dropshipper_product_variant::Column::Id
    }

    fn status_column() -> dropshipper_product_variant::Column {
        dropshipper_product_variant::Column::Status
    }

    fn owner_column() -> Option<dropshipper_product_variant::Column> {
        Some(dropshipper_product_variant::Column::DropshipperId)
    }

    fn audit_columns() -> AuditColumns<dropshipper_product_variant::Column> {
        audit_columns!(dropshipper_product_variant)
    }
}
