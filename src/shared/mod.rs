//! Shared utilities and common functionality
//!
//! This module contains error handling and logging utilities used across
//! the application.

pub mod error;
pub mod logging;

pub use error::{FlowError, FlowResult};
pub use logging::LoggingUtils;
