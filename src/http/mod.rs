//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, tracing layer)
//!     → middleware/referrer_filter.rs (Proceed or 403)
//!     → downstream handler
//! ```

pub mod middleware;
pub mod server;

pub use middleware::referrer_filter_middleware;
pub use server::GateServer;
