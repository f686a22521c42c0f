//! Charge models: requests sent to the gateway and the results it reports

use crate::config::CheckoutConfig;
use crate::domain::customer::CustomerInfo;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single charge-creation attempt
///
/// Built fresh per attempt and never mutated once sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeRequest {
    pub customer: CustomerInfo,
    pub amount: Decimal,
    pub offer_id: String,
    pub upsell_index: Option<String>,
    /// Marketing attribution query string, forwarded unmodified
    pub utm_query: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ChargeRequest {
    /// Build a charge request for the configured checkout
    pub fn new(customer: CustomerInfo, checkout: &CheckoutConfig) -> Self {
        Self {
            customer,
            amount: checkout.amount,
            offer_id: checkout.offer_id.clone(),
            upsell_index: checkout.upsell_index.clone(),
            utm_query: checkout.utm_query.clone(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// Outcome of a charge-creation attempt; exactly one variant applies
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChargeResult {
    /// Gateway issued a payment and a payable code
    Accepted { payment_id: String, pix_code: String },
    /// Gateway refused the charge with a user-facing message
    Rejected { message: String },
}

/// Settlement status reported by the gateway
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Approved,
    Paid,
    Pending,
    /// Any status string this client does not recognize
    Unknown(String),
}

impl PaymentStatus {
    /// Parse the gateway's status string, case-insensitively
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "approved" => PaymentStatus::Approved,
            "paid" => PaymentStatus::Paid,
            "pending" => PaymentStatus::Pending,
            other => PaymentStatus::Unknown(other.to_string()),
        }
    }

    /// True for terminal success values; everything else keeps the poll alive
    pub fn is_settled(&self) -> bool {
        matches!(self, PaymentStatus::Approved | PaymentStatus::Paid)
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Approved => write!(f, "approved"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Unknown(s) => write!(f, "{}", s),
        }
    }
}
