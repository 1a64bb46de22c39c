//! Guide document handlers

use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::guide::{ProcessingTrigger, RegenerationOutcome};
use crate::web::{ApiResponse, AppState, handle_error, responses::xml};

/// Serve the last completely written guide
pub async fn serve_epg(State(state): State<AppState>) -> Response {
    match state.guide.read_current().await {
        Ok(Some(bytes)) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/xml")],
            bytes,
        )
            .into_response(),
        Ok(None) => xml(
            StatusCode::NOT_FOUND,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- Guide has not been generated yet -->\n",
        ),
        Err(e) => {
            error!("Failed to read guide: {}", e);
            xml(
                StatusCode::INTERNAL_SERVER_ERROR,
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- Guide could not be read -->\n",
            )
        }
    }
}

/// Force a regeneration; overlapping requests report `skipped`
pub async fn refresh_guide(State(state): State<AppState>) -> Response {
    match state.guide.regenerate(ProcessingTrigger::Manual).await {
        Ok(outcome @ RegenerationOutcome::Completed(_)) => {
            ApiResponse::success(outcome).into_response()
        }
        Ok(RegenerationOutcome::Skipped) => (
            StatusCode::ACCEPTED,
            axum::Json(ApiResponse::success(RegenerationOutcome::Skipped)),
        )
            .into_response(),
        Err(e) => handle_error(e),
    }
}
