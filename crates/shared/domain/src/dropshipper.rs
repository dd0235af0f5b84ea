//! Dropshipper accounts, company details and bank accounts.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::audit::AuditTrail;
use crate::error::DomainError;
use crate::serde_helpers;
use crate::status::flag;
use crate::validation::{validate_account_number, validate_ifsc};

/// Dropshipper account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dropshipper {
    #[serde(with = "serde_helpers::id")]
    pub id: i64,
    /// Human-readable reference, e.g. `DROP-0042`
    pub unique_code: String,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub shopify_domain: Option<String>,
    pub status: bool,
    #[serde(flatten)]
    pub audit: AuditTrail,
}

/// One-to-one company registration details of a dropshipper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetail {
    #[serde(with = "serde_helpers::id")]
    pub id: i64,
    #[serde(with = "serde_helpers::id")]
    pub admin_id: i64,
    pub legal_name: String,
    pub gstin: Option<String>,
    pub pan: Option<String>,
    pub billing_address: Option<String>,
    pub status: bool,
    #[serde(flatten)]
    pub audit: AuditTrail,
}

/// KYC review state of a bank account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KycStatus {
    Pending,
    Verified,
    Rejected,
}

impl KycStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KycStatus::Pending => "pending",
            KycStatus::Verified => "verified",
            KycStatus::Rejected => "rejected",
        }
    }
}

impl FromStr for KycStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(KycStatus::Pending),
            "verified" => Ok(KycStatus::Verified),
            "rejected" => Ok(KycStatus::Rejected),
            other => Err(DomainError::validation(format!("Invalid KYC status: {}", other))),
        }
    }
}

/// Admin decision on a pending bank account
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum KycDecision {
    Verify,
    Reject { remarks: String },
}

impl KycDecision {
    pub fn outcome(&self) -> KycStatus {
        match self {
            KycDecision::Verify => KycStatus::Verified,
            KycDecision::Reject { .. } => KycStatus::Rejected,
        }
    }

    pub fn remarks(&self) -> Option<&str> {
        match self {
            KycDecision::Verify => None,
            KycDecision::Reject { remarks } => Some(remarks.as_str()),
        }
    }
}

/// Payout bank account of a dropshipper
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    #[serde(with = "serde_helpers::id")]
    pub id: i64,
    #[serde(with = "serde_helpers::id")]
    pub admin_id: i64,
    pub holder_name: String,
    pub account_number: String,
    pub ifsc: String,
    pub bank_name: String,
    pub is_primary: bool,
    pub kyc_status: KycStatus,
    pub kyc_remarks: Option<String>,
    pub status: bool,
    #[serde(flatten)]
    pub audit: AuditTrail,
}

impl BankAccount {
    /// Account number with all but the last four digits hidden
    pub fn masked_account_number(&self) -> String {
        let visible = self.account_number.len().saturating_sub(4);
        format!(
            "{}{}",
            "X".repeat(visible),
            &self.account_number[visible..]
        )
    }
}

/// Dropshipper with its dependents, as returned by lifecycle operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DropshipperProfile {
    #[serde(flatten)]
    pub dropshipper: Dropshipper,
    pub company_detail: Option<CompanyDetail>,
    pub bank_accounts: Vec<BankAccount>,
}

fn default_true() -> bool {
    true
}

/// Company detail payload (create or replace)
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompanyDetailInput {
    #[validate(length(min = 1, message = "Legal name is required"))]
    pub legal_name: String,
    #[validate(length(equal = 15, message = "GSTIN must be 15 characters"))]
    pub gstin: Option<String>,
    #[validate(length(equal = 10, message = "PAN must be 10 characters"))]
    pub pan: Option<String>,
    pub billing_address: Option<String>,
}

/// Dropshipper registration payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewDropshipper {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    pub phone: Option<String>,
    pub shopify_domain: Option<String>,
    #[serde(default = "default_true", deserialize_with = "flag::deserialize")]
    pub status: bool,
    pub company: Option<CompanyDetailInput>,
}

/// Dropshipper profile update payload
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDropshipper {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Bank account payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewBankAccount {
    #[validate(length(min = 1, message = "Account holder name is required"))]
    pub holder_name: String,
    #[validate(
        length(
            min = 6,
            max = 20,
            message = "Account number must be 6 to 20 digits"
        ),
        custom(function = "validate_account_number")
    )]
    pub account_number: String,
    #[validate(custom(function = "validate_ifsc"))]
    pub ifsc: String,
    #[validate(length(min = 1, message = "Bank name is required"))]
    pub bank_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::check;

    fn bank_payload(account_number: &str, ifsc: &str) -> NewBankAccount {
        NewBankAccount {
            holder_name: "Asha Traders".to_string(),
            account_number: account_number.to_string(),
            ifsc: ifsc.to_string(),
            bank_name: "HDFC Bank".to_string(),
        }
    }

    #[test]
    fn test_bank_payload_validation() {
        assert!(check(&bank_payload("001234567890", "HDFC0001234")).is_ok());
        assert_eq!(
            check(&bank_payload("001234567890", "HDFC1234")),
            Err(DomainError::validation("Invalid IFSC code"))
        );
        assert!(check(&bank_payload("12ab", "HDFC0001234")).is_err());
    }

    #[test]
    fn test_new_dropshipper_rejects_bad_email() {
        let payload: NewDropshipper =
            serde_json::from_str(r#"{"name":"Asha","email":"not-an-email"}"#).unwrap();
        assert_eq!(
            check(&payload),
            Err(DomainError::validation("Invalid email format"))
        );
        assert!(payload.status);
    }

    #[test]
    fn test_kyc_decision_wire_format() {
        let decision: KycDecision =
            serde_json::from_str(r#"{"decision":"reject","remarks":"Name mismatch"}"#).unwrap();
        assert_eq!(decision.outcome(), KycStatus::Rejected);
        assert_eq!(decision.remarks(), Some("Name mismatch"));
    }

    #[test]
    fn test_masked_account_number() {
        let account = BankAccount {
            id: 1,
            admin_id: 2,
            holder_name: "Asha".to_string(),
            account_number: "001234567890".to_string(),
            ifsc: "HDFC0001234".to_string(),
            bank_name: "HDFC Bank".to_string(),
            is_primary: true,
            kyc_status: KycStatus::Pending,
            kyc_remarks: None,
            status: true,
            audit: AuditTrail::created(None, chrono::Utc::now()),
        };
        assert_eq!(account.masked_account_number(), "XXXXXXXX7890");
    }
}
