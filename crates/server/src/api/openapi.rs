use axum::Json;
use axum::response::IntoResponse;
use utoipa::OpenApi;

use pinboard_core::{Attachment, Card, CardId};

use super::schemas::{
    AuthResponse, CreateCardForm, ErrorResponse, HealthResponse, LoginRequest,
};

/// OpenAPI document for the card board API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pinboard API",
        version = "0.1.0",
        description = "Public card board: anyone can list cards and download attachments; an admin session is required to create cards.",
        license(name = "Apache-2.0")
    ),
    paths(
        super::health::health,
        super::cards::list_cards,
        super::cards::create_card,
        super::uploads::download,
        super::auth::login,
        super::auth::logout,
    ),
    components(schemas(
        Card,
        CardId,
        Attachment,
        CreateCardForm,
        HealthResponse,
        LoginRequest,
        AuthResponse,
        ErrorResponse,
    )),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Cards", description = "Card listing and creation"),
        (name = "Uploads", description = "Attachment downloads"),
        (name = "Auth", description = "Admin session management")
    )
)]
pub struct ApiDoc;

/// `GET /api-doc/openapi.json` -- the OpenAPI document.
pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
