//! Referrer filtering subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration load (rare, off the request path):
//!     discovery.rs (local interface addresses)
//!     + FilterConfig
//!     → allowlist.rs (exact-origin table + regex table)
//!     → snapshot.rs (immutable FilterSnapshot)
//!     → engine.rs (atomic swap, diagnostics publish)
//!
//! Each request:
//!     engine.rs (load current snapshot)
//!     → gate.rs (method, user agent, referrer policy)
//!     → referrer.rs (parse Referer header)
//!     → allowlist.rs (match)
//!     → Verdict: Proceed | Reject(403)
//! ```
//!
//! # Design Decisions
//! - No I/O and no locks on the request path
//! - Configuration problems skip entries, they never fail the load
//! - Every request outcome is a Verdict, never an error

pub mod allowlist;
pub mod discovery;
pub mod engine;
pub mod gate;
pub mod origin;
pub mod referrer;
pub mod snapshot;

pub use allowlist::{AllowList, RegexRule};
pub use engine::{Diagnostics, NoopDiagnostics, ReferrerFilter};
pub use gate::{Rejection, RequestFacts, Verdict};
pub use origin::Origin;
pub use referrer::ParsedReferrer;
pub use snapshot::FilterSnapshot;
