//! Gateway port
//!
//! The flow controller talks to the payment gateway through this trait so the
//! state machine can be exercised against a scripted double in tests.

use crate::domain::charge::{ChargeRequest, ChargeResult, PaymentStatus};
use crate::shared::error::FlowResult;
use async_trait::async_trait;

/// External payment gateway reached over HTTP
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Ask the gateway to create a charge
    ///
    /// `Ok(Rejected)` is a gateway-level refusal with a user-facing message;
    /// `Err` means the request itself failed (transport or malformed body).
    async fn create_charge(&self, request: &ChargeRequest) -> FlowResult<ChargeResult>;

    /// Query settlement status for a previously created payment
    async fn check_status(&self, payment_id: &str) -> FlowResult<PaymentStatus>;
}
