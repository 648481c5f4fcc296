//! Read-only diagnostics endpoints for operators.

pub mod auth;
pub mod board;
pub mod handlers;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use self::auth::admin_auth_middleware;
use self::handlers::*;

pub use board::DiagnosticsBoard;

#[derive(Clone)]
pub struct AdminState {
    pub board: Arc<DiagnosticsBoard>,
    pub api_key: Arc<str>,
}

impl AdminState {
    pub fn new(board: Arc<DiagnosticsBoard>, api_key: &str) -> Self {
        Self {
            board,
            api_key: Arc::from(api_key),
        }
    }
}

pub fn setup_admin_router(state: AdminState) -> Router {
    Router::new()
        .route("/admin/status", get(get_status))
        .route("/admin/referrers", get(get_referrers))
        .route("/admin/referrers.txt", get(get_referrers_text))
        .layer(middleware::from_fn_with_state(state.clone(), admin_auth_middleware))
        .with_state(state)
}
