//! Infrastructure layer - External concerns and adapters
//!
//! This module contains adapters for external services, currently the HTTP
//! payment gateway.

pub mod adapters;

pub use adapters::PixGatewayAdapter;
