//! Referrer filter middleware.
//! Terminates untrusted state-changing browser requests with 403.

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::filter::{ReferrerFilter, Verdict};

pub async fn referrer_filter_middleware(
    State(filter): State<ReferrerFilter>,
    request: Request<Body>,
    next: Next,
) -> Response {
    match filter.decide(&request) {
        Verdict::Proceed => next.run(request).await,
        Verdict::Reject(reason) => {
            tracing::debug!(reason = reason.as_str(), "Request terminated");
            StatusCode::FORBIDDEN.into_response()
        }
    }
}
