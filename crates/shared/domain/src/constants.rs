//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Actor Roles
// =============================================================================

/// Platform administrator
pub const ROLE_ADMIN: &str = "admin";

/// Supplier owning catalog products
pub const ROLE_SUPPLIER: &str = "supplier";

/// Dropshipper reselling supplier products
pub const ROLE_DROPSHIPPER: &str = "dropshipper";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_SUPPLIER, ROLE_DROPSHIPPER];

/// Check if a role value is valid
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Reference Codes
// =============================================================================

/// Prefix of the human-readable dropshipper code (`DROP-0042`)
pub const DROPSHIPPER_CODE_PREFIX: &str = "DROP";

/// Prefix of support ticket numbers (`TCKT-482913`)
pub const TICKET_NUMBER_PREFIX: &str = "TCKT";

// =============================================================================
// Listing Filters
// =============================================================================

pub const STATUS_FILTER_ACTIVE: &str = "active";
pub const STATUS_FILTER_INACTIVE: &str = "inactive";
pub const STATUS_FILTER_DELETED: &str = "deleted";
pub const STATUS_FILTER_NOT_DELETED: &str = "notDeleted";

/// Tokens accepted as `true` by the loose status parser
pub const TRUTHY_TOKENS: &[&str] = &["true", "1", "yes", "active", "on"];

/// Tokens accepted as `false` by the loose status parser
pub const FALSY_TOKENS: &[&str] = &["false", "0", "no", "inactive", "off"];

// =============================================================================
// Catalog
// =============================================================================

/// Separator of the stored gallery file list
pub const GALLERY_SEPARATOR: char = ',';

/// Separator of the stored staff permission list
pub const PERMISSION_SEPARATOR: char = ',';

// =============================================================================
// Validation
// =============================================================================

/// Shopify admin domains always end with this suffix
pub const SHOPIFY_DOMAIN_SUFFIX: &str = ".myshopify.com";

// =============================================================================
// Messages
// =============================================================================

/// Message shown to callers when a persistence failure is hidden
pub const MSG_INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

pub const MSG_INVALID_STATUS: &str = "Invalid status";
pub const MSG_INVALID_IMAGE_INDEX: &str = "Invalid image index";
