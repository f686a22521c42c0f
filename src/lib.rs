//! PIX Payment Flow - an embeddable checkout flow for Brazilian instant payments
//!
//! This library drives a single PIX charge from customer-data collection through
//! charge creation at an external HTTP gateway to settlement polling. The flow
//! controller emits view states over a watch channel; a rendering layer (web,
//! terminal, anything) subscribes and draws, which keeps the state machine
//! testable in isolation.

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

pub use application::PaymentFlowController;
pub use config::FlowConfig;
pub use domain::{ChargeRequest, ChargeResult, CustomerInfo, PaymentGateway, PaymentStatus, ViewState};
pub use infrastructure::PixGatewayAdapter;
pub use shared::error::{FlowError, FlowResult};

/// Application result type
pub type Result<T> = std::result::Result<T, shared::error::FlowError>;
