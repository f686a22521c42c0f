//! HTTP adapter for the PIX payment gateway
//!
//! This adapter speaks the gateway's query-parameter wire contract: charge
//! creation is a POST with `acao=criar` plus customer and checkout fields,
//! status checks are a GET with `acao=verificar`. Responses are small JSON
//! bodies; a body carrying `payment_id` and `pixCode` is an accepted charge,
//! a body carrying `erroMsg` is a refusal.

use crate::config::FlowConfig;
use crate::domain::charge::{ChargeRequest, ChargeResult, PaymentStatus};
use crate::domain::ports::PaymentGateway;
use crate::shared::error::{FlowError, FlowResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// Placeholder contact values the gateway expects when the customer left them blank
const DEFAULT_EMAIL: &str = "cliente@email.com";
const DEFAULT_PHONE: &str = "00000000000";

/// Adapter for the external PIX gateway
pub struct PixGatewayAdapter {
    config: Arc<FlowConfig>,
    client: reqwest::Client,
}

/// Charge-creation response body
#[derive(Debug, Deserialize)]
struct CreateChargeWire {
    payment_id: Option<String>,
    #[serde(rename = "pixCode")]
    pix_code: Option<String>,
    #[serde(rename = "erroMsg")]
    error_message: Option<String>,
}

/// Status-check response body
#[derive(Debug, Deserialize)]
struct StatusWire {
    status: Option<String>,
}

impl PixGatewayAdapter {
    /// Create a new gateway adapter with a client honoring the configured timeout
    pub fn new(config: Arc<FlowConfig>) -> FlowResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.gateway.timeout_seconds))
            .build()
            .map_err(|e| FlowError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }
}

#[async_trait]
impl PaymentGateway for PixGatewayAdapter {
    async fn create_charge(&self, request: &ChargeRequest) -> FlowResult<ChargeResult> {
        let request_id = Uuid::new_v4().to_string();

        info!(
            request_id = %request_id,
            offer = %request.offer_id,
            amount = %request.amount,
            "Creating PIX charge"
        );

        let params: Vec<(&str, String)> = vec![
            ("acao", "criar".to_string()),
            ("nome", request.customer.name.clone()),
            (
                "email",
                request
                    .customer
                    .email
                    .clone()
                    .unwrap_or_else(|| DEFAULT_EMAIL.to_string()),
            ),
            (
                "telefone",
                request
                    .customer
                    .phone
                    .clone()
                    .unwrap_or_else(|| DEFAULT_PHONE.to_string()),
            ),
            ("cpf", request.customer.cpf.clone()),
            ("valor", request.amount.to_string()),
            ("oferta", request.offer_id.clone()),
            ("up", request.upsell_index.clone().unwrap_or_default()),
            ("utm", request.utm_query.clone()),
        ];

        let response = self
            .client
            .post(&self.config.gateway.api_base_url)
            .query(&params)
            .send()
            .await?;

        let wire: CreateChargeWire = response
            .json()
            .await
            .map_err(|e| FlowError::Transport(format!("Malformed charge response: {}", e)))?;

        match wire {
            CreateChargeWire {
                payment_id: Some(payment_id),
                pix_code: Some(pix_code),
                ..
            } => {
                info!(request_id = %request_id, payment_id = %payment_id, "Charge accepted");
                Ok(ChargeResult::Accepted { payment_id, pix_code })
            }
            CreateChargeWire {
                payment_id: Some(_),
                pix_code: None,
                ..
            } => Err(FlowError::Transport(
                "Charge response carried a payment_id but no pixCode".to_string(),
            )),
            CreateChargeWire { error_message, .. } => {
                let message = error_message.unwrap_or_else(|| "Desconhecido".to_string());
                debug!(request_id = %request_id, message = %message, "Charge rejected by gateway");
                Ok(ChargeResult::Rejected { message })
            }
        }
    }

    async fn check_status(&self, payment_id: &str) -> FlowResult<PaymentStatus> {
        let response = self
            .client
            .get(&self.config.gateway.api_base_url)
            .query(&[("acao", "verificar"), ("payment_id", payment_id)])
            .send()
            .await?;

        let wire: StatusWire = response
            .json()
            .await
            .map_err(|e| FlowError::Transport(format!("Malformed status response: {}", e)))?;

        let status = PaymentStatus::parse(wire.status.as_deref().unwrap_or(""));
        debug!(payment_id = %payment_id, status = %status, "Gateway settlement status");

        Ok(status)
    }
}
