//! Configuration management module
//!
//! This module handles all configuration concerns including loading,
//! validation, and providing access to flow settings.

pub mod app_config;

pub use app_config::{CheckoutConfig, FlowConfig, GatewayConfig, PollConfig};
