//! Status filters and loose status-flag parsing.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::constants::{
    FALSY_TOKENS, MSG_INVALID_STATUS, STATUS_FILTER_ACTIVE, STATUS_FILTER_DELETED,
    STATUS_FILTER_INACTIVE, STATUS_FILTER_NOT_DELETED, TRUTHY_TOKENS,
};
use crate::error::{DomainError, DomainResult};

/// Listing filter shared by every soft-deletable resource.
///
/// `Active`, `Inactive` and `Deleted` partition the full set of records.
/// `NotDeleted` is the union of the first two and the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ListStatus {
    Active,
    Inactive,
    Deleted,
    #[default]
    NotDeleted,
}

impl ListStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListStatus::Active => STATUS_FILTER_ACTIVE,
            ListStatus::Inactive => STATUS_FILTER_INACTIVE,
            ListStatus::Deleted => STATUS_FILTER_DELETED,
            ListStatus::NotDeleted => STATUS_FILTER_NOT_DELETED,
        }
    }

    /// Parse an optional query value, falling back to `NotDeleted`.
    pub fn parse_optional(value: Option<&str>) -> DomainResult<Self> {
        match value {
            None => Ok(ListStatus::default()),
            Some(v) if v.trim().is_empty() => Ok(ListStatus::default()),
            Some(v) => v.parse(),
        }
    }

    /// In-memory counterpart of the database filter.
    pub fn matches(&self, status: bool, deleted_at: Option<DateTime<Utc>>) -> bool {
        let live = deleted_at.is_none();
        match self {
            ListStatus::Active => status && live,
            ListStatus::Inactive => !status && live,
            ListStatus::Deleted => !live,
            ListStatus::NotDeleted => live,
        }
    }
}

impl FromStr for ListStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            STATUS_FILTER_ACTIVE => Ok(ListStatus::Active),
            STATUS_FILTER_INACTIVE => Ok(ListStatus::Inactive),
            STATUS_FILTER_DELETED => Ok(ListStatus::Deleted),
            STATUS_FILTER_NOT_DELETED => Ok(ListStatus::NotDeleted),
            _ => Err(DomainError::validation(MSG_INVALID_STATUS)),
        }
    }
}

impl std::fmt::Display for ListStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a loosely typed truthy/falsy token into a strict boolean.
///
/// Matching is case-insensitive. Anything outside the accepted token sets
/// is an error rather than `false`.
pub fn parse_flag(token: &str) -> DomainResult<bool> {
    let normalized = token.trim().to_ascii_lowercase();
    if TRUTHY_TOKENS.contains(&normalized.as_str()) {
        Ok(true)
    } else if FALSY_TOKENS.contains(&normalized.as_str()) {
        Ok(false)
    } else {
        Err(DomainError::validation(format!(
            "Invalid status flag: {}",
            token
        )))
    }
}

/// Serde adapter applying [`parse_flag`] to JSON booleans, numbers and strings.
pub mod flag {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawFlag {
        Bool(bool),
        Number(i64),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Error;

        match RawFlag::deserialize(deserializer)? {
            RawFlag::Bool(b) => Ok(b),
            RawFlag::Number(1) => Ok(true),
            RawFlag::Number(0) => Ok(false),
            RawFlag::Number(n) => Err(D::Error::custom(format!("Invalid status flag: {}", n))),
            RawFlag::Text(s) => parse_flag(&s).map_err(D::Error::custom),
        }
    }

    /// Optional variant for partial updates.
    pub mod option {
        use super::*;

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
        where
            D: Deserializer<'de>,
        {
            #[derive(Deserialize)]
            struct Wrapped(#[serde(deserialize_with = "super::deserialize")] bool);

            Ok(Option::<Wrapped>::deserialize(deserializer)?.map(|Wrapped(b)| b))
        }
    }
}
