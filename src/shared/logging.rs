//! Logging utilities module
//!
//! Subscriber initialization for hosts that embed the flow. Library code only
//! emits `tracing` events and never installs a global subscriber on its own.

/// Logging utilities for the application
pub struct LoggingUtils;

impl LoggingUtils {
    /// Initialize logging with the specified level
    pub fn initialize(level: &str) -> crate::Result<()> {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(level));

        let subscriber = fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| crate::shared::error::FlowError::Internal(format!("Failed to initialize logging: {}", e)))?;

        Ok(())
    }
}
