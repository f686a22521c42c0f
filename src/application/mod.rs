//! Application layer - Orchestration of the payment flow

pub mod flow_controller;

pub use flow_controller::PaymentFlowController;
