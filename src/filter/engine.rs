//! Published filter state and the handle request handlers hold.
//!
//! One writer (configuration load) builds a complete [`FilterSnapshot`] and
//! swaps it in; readers take the current `Arc` at the start of each
//! decision and never see a partially built snapshot.

use std::sync::Arc;

use arc_swap::ArcSwap;
use axum::http::Request;

use crate::config::FilterConfig;
use crate::filter::gate::{self, RequestFacts, Verdict};
use crate::filter::snapshot::FilterSnapshot;
use crate::observability::metrics;

/// Sink for operator-facing dumps of the active allow-list.
pub trait Diagnostics: Send + Sync {
    /// Called with every snapshot that becomes active.
    fn publish(&self, snapshot: &Arc<FilterSnapshot>);

    /// Called once when the filter shuts down.
    fn withdraw(&self);
}

/// Diagnostics sink that discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopDiagnostics;

impl Diagnostics for NoopDiagnostics {
    fn publish(&self, _snapshot: &Arc<FilterSnapshot>) {}

    fn withdraw(&self) {}
}

/// Cloneable handle to the active referrer policy.
#[derive(Clone)]
pub struct ReferrerFilter {
    current: Arc<ArcSwap<FilterSnapshot>>,
    diagnostics: Arc<dyn Diagnostics>,
}

impl ReferrerFilter {
    /// Build the first snapshot (including interface discovery) and publish it.
    pub fn configure(config: &FilterConfig, diagnostics: Arc<dyn Diagnostics>) -> Self {
        Self::with_snapshot(FilterSnapshot::discover(config), diagnostics)
    }

    /// Start from a snapshot built by the caller.
    pub fn with_snapshot(snapshot: FilterSnapshot, diagnostics: Arc<dyn Diagnostics>) -> Self {
        let snapshot = Arc::new(snapshot);
        metrics::record_snapshot(&snapshot);
        diagnostics.publish(&snapshot);
        Self {
            current: Arc::new(ArcSwap::new(snapshot)),
            diagnostics,
        }
    }

    /// Rebuild from a new configuration and swap it in.
    pub fn reload(&self, config: &FilterConfig) {
        self.publish(FilterSnapshot::discover(config));
    }

    /// Replace the active snapshot.
    pub fn publish(&self, snapshot: FilterSnapshot) {
        let snapshot = Arc::new(snapshot);
        self.current.store(Arc::clone(&snapshot));
        metrics::record_snapshot(&snapshot);
        self.diagnostics.publish(&snapshot);
        tracing::info!("Referrer filter snapshot replaced");
    }

    pub fn current(&self) -> Arc<FilterSnapshot> {
        self.current.load_full()
    }

    /// Decide whether `request` may reach downstream handlers.
    pub fn decide<B>(&self, request: &Request<B>) -> Verdict {
        let snapshot = self.current.load_full();
        let verdict = gate::evaluate(&snapshot, &RequestFacts::from_request(request));
        metrics::record_decision(&verdict);
        verdict
    }

    /// Withdraw the diagnostics publication. Other clones of this handle
    /// keep deciding with the last snapshot.
    pub fn shutdown(self) {
        self.diagnostics.withdraw();
        tracing::info!("Referrer filter shut down");
    }
}
