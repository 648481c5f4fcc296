//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate bind addresses
//! - Require a real API key when the diagnostics endpoint is exposed
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Allow-list entries and patterns are not validated here: a bad entry
//!   is skipped when the allow-list is built and never blocks a reload.
//!   The same goes for invalid `filter-methods` tokens.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GateConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{section}.bind_address `{address}` is not a socket address")]
    InvalidBindAddress { section: &'static str, address: String },

    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),

    #[error("admin.api_key must not be empty when admin is enabled")]
    EmptyApiKey,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress {
            section: "listener",
            address: config.listener.bind_address.clone(),
        });
    }

    if config.admin.enabled {
        if config.admin.bind_address.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidBindAddress {
                section: "admin",
                address: config.admin.bind_address.clone(),
            });
        }
        if config.admin.api_key.trim().is_empty() {
            errors.push(ValidationError::EmptyApiKey);
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
