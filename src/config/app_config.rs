//! Application configuration structures
//!
//! Sections mirror the flow's moving parts: the gateway endpoint, the
//! settlement poll, and the checkout being sold. Defaults match the stock
//! widget configuration; embedding hosts may construct the structs directly
//! or layer a file and environment variables through [`FlowConfig::load`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Payment gateway endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct GatewayConfig {
    /// Gateway base URL; charge creation and status checks both hit it
    #[validate(url)]
    pub api_base_url: String,

    /// Per-request timeout in seconds
    #[validate(range(min = 1, max = 300))]
    pub timeout_seconds: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8080/gateway".to_string(),
            timeout_seconds: 30,
        }
    }
}

/// Settlement poll configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PollConfig {
    /// Milliseconds between status checks
    #[validate(range(min = 100, max = 60000))]
    pub interval_ms: u64,

    /// Status checks issued before the flow expires
    #[validate(range(min = 1, max = 10000))]
    pub attempt_limit: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: 3000,
            // Roughly five minutes at the default interval
            attempt_limit: 100,
        }
    }
}

/// Checkout configuration for the offer being sold
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckoutConfig {
    /// Charge amount in BRL
    pub amount: Decimal,

    /// Offer identifier forwarded to the gateway
    #[validate(length(min = 1))]
    pub offer_id: String,

    /// Upsell slot, when this checkout is an upsell step
    pub upsell_index: Option<String>,

    /// Marketing attribution query string, forwarded unmodified
    pub utm_query: String,

    /// Destination after a confirmed payment
    #[validate(url)]
    pub next_page_url: String,

    /// Delay between showing success and navigating away, in milliseconds
    #[validate(range(min = 0, max = 60000))]
    pub redirect_delay_ms: u64,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            amount: Decimal::new(1990, 2),
            offer_id: "tiktok".to_string(),
            upsell_index: None,
            utm_query: String::new(),
            next_page_url: "http://127.0.0.1:8080/obrigado".to_string(),
            redirect_delay_ms: 1500,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Payment gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Settlement poll configuration
    #[serde(default)]
    pub poll: PollConfig,

    /// Checkout configuration
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

impl FlowConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> crate::Result<Self> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("Conf").required(false))
            .add_source(config::Environment::with_prefix("PIX_FLOW").separator("__"))
            .build()
            .map_err(|e| crate::shared::error::FlowError::Config(format!("Failed to build configuration: {}", e)))?;

        let config: FlowConfig = config.try_deserialize()
            .map_err(|e| crate::shared::error::FlowError::Config(format!("Failed to deserialize configuration: {}", e)))?;

        config.validate_config()?;

        Ok(config)
    }

    /// Validate the entire configuration
    pub fn validate_config(&self) -> crate::Result<()> {
        self.gateway.validate()?;
        self.poll.validate()?;
        self.checkout.validate()?;

        // validator has no range support for Decimal
        if self.checkout.amount <= Decimal::ZERO {
            return Err(crate::shared::error::FlowError::Validation(
                "checkout.amount must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
