//! Error handling module
//!
//! This module provides centralized error handling for the payment flow.

use thiserror::Error;

/// Application error types
#[derive(Error, Debug, Clone)]
pub enum FlowError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Gateway rejected charge: {0}")]
    Gateway(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("JSON serialization error: {0}")]
    Json(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl FlowError {
    /// True when the flow may be restarted by the user after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            FlowError::Validation(_) | FlowError::Gateway(_) | FlowError::Transport(_)
        )
    }
}

/// Application result type
pub type FlowResult<T> = Result<T, FlowError>;

impl From<reqwest::Error> for FlowError {
    fn from(err: reqwest::Error) -> Self {
        FlowError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for FlowError {
    fn from(err: serde_json::Error) -> Self {
        FlowError::Json(err.to_string())
    }
}

impl From<config::ConfigError> for FlowError {
    fn from(err: config::ConfigError) -> Self {
        FlowError::Config(err.to_string())
    }
}

impl From<validator::ValidationErrors> for FlowError {
    fn from(err: validator::ValidationErrors) -> Self {
        FlowError::Validation(err.to_string())
    }
}
