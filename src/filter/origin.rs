//! The `(scheme, host, port)` triple shared by allow-list entries and parsed
//! referrers.

use std::fmt;

/// Port value on an allow-list entry that matches any referrer port.
pub const WILDCARD_PORT: i32 = 0;

/// A web origin.
///
/// `scheme` is always lower-case. On allow-list entries `port` may be
/// [`WILDCARD_PORT`]; on parsed referrers it is the explicit port or the
/// scheme default. Referrer ports are not range-checked: any integer the
/// header carries is kept, so `http://host:99999/` is still an origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Origin {
    pub scheme: String,
    pub host: String,
    pub port: i32,
}

impl Origin {
    pub fn new(scheme: impl Into<String>, host: impl Into<String>, port: i32) -> Self {
        Self {
            scheme: scheme.into().to_ascii_lowercase(),
            host: host.into(),
            port,
        }
    }

    /// Canonical `"<scheme>://<host>:<port>"` form used for regex matching
    /// and diagnostics.
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    pub fn is_wildcard_port(&self) -> bool {
        self.port == WILDCARD_PORT
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// Well-known port for a scheme, or [`WILDCARD_PORT`] when there is none.
pub fn default_port(scheme: &str) -> i32 {
    match scheme {
        "http" => 80,
        "https" => 443,
        _ => WILDCARD_PORT,
    }
}
