//! Shared utilities for integration tests.

use std::sync::Arc;

use axum::{body::Body, http::Request, Router};
use referrer_gate::config::FilterConfig;
use referrer_gate::filter::{Diagnostics, FilterSnapshot, ReferrerFilter};
use referrer_gate::GateServer;

#[allow(dead_code)]
pub const FIREFOX: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_5) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.5 Safari/605.1.15";

/// Filter seeded with loopback defaults only, so results do not depend on
/// the interfaces of the machine running the tests.
#[allow(dead_code)]
pub fn filter_with(config: FilterConfig, diagnostics: Arc<dyn Diagnostics>) -> ReferrerFilter {
    let snapshot = FilterSnapshot::build(&config, referrer_gate::filter::discovery::origins_for([]));
    ReferrerFilter::with_snapshot(snapshot, diagnostics)
}

#[allow(dead_code)]
pub fn gate_router(config: FilterConfig) -> Router {
    GateServer::build_router(filter_with(config, Arc::new(referrer_gate::filter::NoopDiagnostics)))
}

/// Build a request addressed to `app.internal`.
#[allow(dead_code)]
pub fn request(method: &str, user_agent: Option<&str>, referrer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri("/content/page")
        .header("host", "app.internal:8080");
    if let Some(agent) = user_agent {
        builder = builder.header("user-agent", agent);
    }
    if let Some(referrer) = referrer {
        builder = builder.header("referer", referrer);
    }
    builder.body(Body::empty()).unwrap()
}
