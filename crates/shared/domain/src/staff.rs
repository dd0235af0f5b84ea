//! Staff members acting on behalf of a dropshipper.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::audit::AuditTrail;
use crate::constants::PERMISSION_SEPARATOR;
use crate::serde_helpers;
use crate::status::flag;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Staff {
    #[serde(with = "serde_helpers::id")]
    pub id: i64,
    /// Owning dropshipper
    #[serde(with = "serde_helpers::id")]
    pub admin_id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub permissions: Vec<String>,
    pub status: bool,
    #[serde(flatten)]
    pub audit: AuditTrail,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewStaff {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub phone: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
    #[serde(default = "default_true", deserialize_with = "flag::deserialize")]
    pub status: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStaff {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    pub permissions: Option<Vec<String>>,
}

/// Join permission names for storage, dropping blanks and duplicates.
pub fn join_permissions(permissions: &[String]) -> String {
    let mut kept: Vec<&str> = Vec::with_capacity(permissions.len());
    for permission in permissions.iter().map(|p| p.trim()) {
        if !permission.is_empty() && !kept.contains(&permission) {
            kept.push(permission);
        }
    }
    kept.join(&PERMISSION_SEPARATOR.to_string())
}

/// Inverse of [`join_permissions`].
pub fn split_permissions(stored: &str) -> Vec<String> {
    stored
        .split(PERMISSION_SEPARATOR)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
