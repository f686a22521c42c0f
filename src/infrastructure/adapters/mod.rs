//! Infrastructure adapters module

pub mod gateway;

pub use gateway::PixGatewayAdapter;
