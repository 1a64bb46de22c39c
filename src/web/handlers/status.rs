//! Operator status endpoint

use axum::{Json, extract::State};
use serde::Serialize;

use crate::errors::ConnectionStatus;
use crate::guide::GenerationReport;
use crate::utils::url::UrlUtils;
use crate::web::AppState;

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub tvheadend_url: String,
    pub antennas_url: String,
    pub tuner_count: u32,
    /// Human-readable backend connectivity message
    pub status: String,
    pub connection: ConnectionStatus,
    pub guide_regenerating: bool,
    pub last_guide_update: Option<GenerationReport>,
}

/// Probe the backend and report configuration and guide state
pub async fn antennas_config(State(state): State<AppState>) -> Json<StatusResponse> {
    let connection = state.backend.check_connection().await;

    Json(StatusResponse {
        tvheadend_url: UrlUtils::obfuscate_credentials(&state.config.backend.url),
        antennas_url: state.identity.base_url.clone(),
        tuner_count: state.identity.tuner_count,
        status: connection.message().to_string(),
        connection,
        guide_regenerating: state.guide.is_running(),
        last_guide_update: state.guide.last_report().await,
    })
}
