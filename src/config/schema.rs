//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use axum::http::Method;
use serde::{Deserialize, Serialize};

/// Root configuration for the referrer gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Referrer filter policy.
    pub referrer_filter: FilterConfig,

    /// Diagnostics endpoint settings.
    pub admin: AdminConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Referrer filter policy.
///
/// Keys use the kebab-case option names, e.g.
///
/// ```toml
/// [referrer_filter]
/// allow-empty = false
/// allow-hosts = ["example.com", "https://app.example.com:8443"]
/// allow-hosts-regexp = ['https://.*\.example\.org:443']
/// filter-methods = ["POST", "PUT", "DELETE"]
/// exclude-agents-regexp = ['.*Monitoring.*']
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FilterConfig {
    /// Trust a missing or blank referrer.
    pub allow_empty: bool,

    /// Extra trusted origins (`scheme://host[:port]`) or bare hosts.
    pub allow_hosts: Vec<String>,

    /// Patterns matched against `"<scheme>://<host>:<port>"`.
    pub allow_hosts_regexp: Vec<String>,

    /// Methods whose requests are checked. Empty, or a single blank
    /// entry, disables checking. Tokens that are not valid HTTP methods
    /// are dropped with a warning.
    pub filter_methods: Vec<String>,

    /// User agents matching any of these are never checked.
    pub exclude_agents_regexp: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            allow_empty: false,
            allow_hosts: Vec::new(),
            allow_hosts_regexp: Vec::new(),
            filter_methods: ["POST", "PUT", "DELETE", "COPY", "MOVE"]
                .into_iter()
                .map(String::from)
                .collect(),
            exclude_agents_regexp: Vec::new(),
        }
    }
}

impl FilterConfig {
    /// Upper-cased filtered methods, or `None` when filtering is disabled.
    ///
    /// Invalid tokens are skipped; if none survive, filtering is disabled.
    pub fn normalized_methods(&self) -> Option<Vec<String>> {
        let methods = match self.filter_methods.as_slice() {
            [] => return None,
            [only] if only.trim().is_empty() => return None,
            methods => methods,
        };
        let valid: Vec<String> = methods
            .iter()
            .map(|m| m.trim().to_uppercase())
            .filter(|m| {
                let ok = Method::from_bytes(m.as_bytes()).is_ok();
                if !ok {
                    tracing::warn!(method = %m, "Ignoring invalid filter method");
                }
                ok
            })
            .collect();
        (!valid.is_empty()).then_some(valid)
    }
}

/// Diagnostics endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Serve the allow-list dump.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
