use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::error::ServerError;

use super::AppState;
use super::schemas::HealthResponse;

/// `GET /health` -- service status and current card count.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    summary = "Health check",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Result<impl IntoResponse, ServerError> {
    let cards = state.service.list_cards().await?;
    let body = HealthResponse {
        status: "ok".into(),
        cards: cards.len(),
    };
    Ok((StatusCode::OK, Json(body)))
}
