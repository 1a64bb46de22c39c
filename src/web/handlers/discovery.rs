//! Tuner discovery, lineup and UPnP descriptor handlers

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::debug;

use crate::device::DiscoverResponse;
use crate::protocol::{self, LineupEntry, LineupStatus};
use crate::web::{AppState, responses::xml};

pub async fn discover(State(state): State<AppState>) -> Json<DiscoverResponse> {
    Json(state.identity.discover())
}

pub async fn lineup_status() -> Json<LineupStatus> {
    Json(protocol::lineup_status())
}

/// Live lineup, fetched from the backend on every request
pub async fn lineup(State(state): State<AppState>) -> Json<Vec<LineupEntry>> {
    let entries = protocol::lineup(state.backend.as_ref()).await;
    debug!("Serving lineup with {} channels", entries.len());
    Json(entries)
}

/// Channel scans are accepted and ignored
pub async fn lineup_post() -> StatusCode {
    StatusCode::OK
}

pub async fn device_descriptor(State(state): State<AppState>) -> impl IntoResponse {
    xml(StatusCode::OK, protocol::device_descriptor(&state.identity))
}

pub async fn connection_manager() -> impl IntoResponse {
    xml(StatusCode::OK, protocol::CONNECTION_MANAGER_SCPD)
}

pub async fn content_directory() -> impl IntoResponse {
    xml(StatusCode::OK, protocol::CONTENT_DIRECTORY_SCPD)
}
