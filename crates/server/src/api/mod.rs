pub mod auth;
pub mod cards;
pub mod health;
pub mod openapi;
pub mod schemas;
pub mod uploads;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use pinboard_store::UploadStore;

use crate::service::CardService;
use crate::session::SessionSigner;

/// Headroom added to the body limit on top of the upload byte limit, to
/// cover multipart framing and the text fields. The exact upload limit is
/// enforced by the card service against the decoded file bytes.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Card creation and listing.
    pub service: Arc<CardService>,
    /// Attachment byte storage (used directly by the download route).
    pub uploads: Arc<UploadStore>,
    /// Session cookie signer/verifier.
    pub sessions: Arc<SessionSigner>,
    /// Configured admin password; `None` disables login entirely.
    pub admin_password: Option<Arc<str>>,
    /// Maximum total upload bytes per create request.
    pub max_upload_bytes: usize,
}

/// Build the axum router with all routes and middleware.
pub fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD);

    Router::new()
        .route("/health", get(health::health))
        .route("/v1/cards", get(cards::list_cards).post(cards::create_card))
        .route("/uploads/{card_id}/{filename}", get(uploads::download))
        .route("/v1/auth/login", post(auth::login))
        .route("/v1/auth/logout", post(auth::logout))
        .route("/api-doc/openapi.json", get(openapi::openapi_json))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
