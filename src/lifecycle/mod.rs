//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Validate → Configure filter → Start listeners
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → broadcast → servers drain → filter withdraws diagnostics
//! ```

pub mod shutdown;

pub use shutdown::Shutdown;
