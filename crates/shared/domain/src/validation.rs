//! Payload validation helpers.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::constants::SHOPIFY_DOMAIN_SUFFIX;
use crate::error::{DomainError, DomainResult};

static IFSC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{4}0[A-Z0-9]{6}$").expect("valid IFSC pattern"));

static SHOP_HANDLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9][a-z0-9-]*$").expect("valid shop handle pattern"));

/// Run derived validation and surface the first message.
pub fn check<T: Validate>(payload: &T) -> DomainResult<()> {
    payload
        .validate()
        .map_err(|e| DomainError::validation(first_message(&e)))
}

/// First human-readable message of a validation failure.
pub fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .values()
        .next()
        .and_then(|errors| errors.first())
        .and_then(|error| error.message.as_ref())
        .map(|msg| msg.to_string())
        .unwrap_or_else(|| "Validation failed".to_string())
}

/// Indian Financial System Code, e.g. `HDFC0001234`.
pub fn validate_ifsc(value: &str) -> Result<(), ValidationError> {
    if IFSC_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::new("ifsc").with_message(Cow::from("Invalid IFSC code")))
    }
}

/// Account numbers are digits only.
pub fn validate_account_number(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("account_number")
            .with_message(Cow::from("Account number must contain only digits")))
    }
}

/// Normalize a Shopify store address to its `*.myshopify.com` host.
///
/// Accepts the bare handle, the host, or a full admin URL.
pub fn normalize_shopify_domain(input: &str) -> DomainResult<String> {
    let lowered = input.trim().to_ascii_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(lowered.as_str());
    let host = without_scheme
        .split('/')
        .next()
        .unwrap_or_default();
    let handle = host.strip_suffix(SHOPIFY_DOMAIN_SUFFIX).unwrap_or(host);

    if handle.is_empty() || !SHOP_HANDLE_RE.is_match(handle) {
        return Err(DomainError::validation("Invalid Shopify store domain"));
    }
    Ok(format!("{}{}", handle, SHOPIFY_DOMAIN_SUFFIX))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ifsc_pattern() {
        assert!(validate_ifsc("HDFC0001234").is_ok());
        assert!(validate_ifsc("hdfc0001234").is_err());
        assert!(validate_ifsc("HDFC1001234").is_err());
    }

    #[test]
    fn test_account_number_digits_only() {
        assert!(validate_account_number("001234567890").is_ok());
        assert!(validate_account_number("12-34").is_err());
    }

    #[test]
    fn test_shopify_domain_normalization() {
        for input in [
            "my-store",
            "my-store.myshopify.com",
            "https://My-Store.myshopify.com/admin",
        ] {
            assert_eq!(
                normalize_shopify_domain(input).unwrap(),
                "my-store.myshopify.com"
            );
        }
    }

    #[test]
    fn test_shopify_domain_rejects_garbage() {
        assert!(normalize_shopify_domain("").is_err());
        assert!(normalize_shopify_domain("bad store").is_err());
        assert!(normalize_shopify_domain("-store").is_err());
    }
}
