//! Referrer-based CSRF gate.
//!
//! Rejects state-changing browser requests whose `Referer` does not point
//! at a trusted origin.

pub mod admin;
pub mod config;
pub mod filter;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::GateConfig;
pub use filter::{ReferrerFilter, Verdict};
pub use http::GateServer;
pub use lifecycle::Shutdown;
