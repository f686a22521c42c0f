//! Domain layer - Core business logic and domain models
//!
//! This module contains the payment-flow domain models and business rules,
//! independent of HTTP or any presentation concerns.

pub mod charge;
pub mod customer;
pub mod flow;
pub mod ports;

pub use charge::{ChargeRequest, ChargeResult, PaymentStatus};
pub use customer::{CustomerField, CustomerInfo};
pub use flow::{PollState, ViewState};
pub use ports::PaymentGateway;
