use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::admin::board::render_text;
use crate::admin::AdminState;
use crate::filter::FilterSnapshot;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
}

/// JSON view of the active referrer policy.
#[derive(Debug, Serialize)]
pub struct ReferrerDump {
    pub allowed_origins: Vec<String>,
    pub allowed_patterns: Vec<String>,
    pub allow_empty: bool,
    pub filter_methods: Option<Vec<String>>,
    pub excluded_agents: Vec<String>,
}

impl ReferrerDump {
    pub fn from_snapshot(snapshot: &FilterSnapshot) -> Self {
        let allow_list = snapshot.allow_list();
        Self {
            allowed_origins: allow_list.origins().iter().map(|o| o.canonical()).collect(),
            allowed_patterns: allow_list
                .patterns()
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            allow_empty: snapshot.allow_empty(),
            filter_methods: snapshot.filter_methods().map(<[String]>::to_vec),
            excluded_agents: snapshot
                .excluded_agents()
                .iter()
                .map(|p| p.as_str().to_string())
                .collect(),
        }
    }
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    let status = if state.board.snapshot().is_some() {
        "active"
    } else {
        "withdrawn"
    };
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status,
    })
}

pub async fn get_referrers(
    State(state): State<AdminState>,
) -> Result<Json<ReferrerDump>, StatusCode> {
    let snapshot = state.board.snapshot().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;
    Ok(Json(ReferrerDump::from_snapshot(&snapshot)))
}

pub async fn get_referrers_text(State(state): State<AdminState>) -> Result<String, StatusCode> {
    let snapshot = state.board.snapshot().ok_or(StatusCode::SERVICE_UNAVAILABLE)?;
    Ok(render_text(&snapshot))
}
