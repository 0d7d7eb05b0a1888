use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status indicator.
    #[schema(example = "ok")]
    pub status: String,
    /// Number of cards on the board.
    #[schema(example = 12)]
    pub cards: usize,
}

/// Admin login request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    /// The shared admin password.
    pub password: String,
}

/// Login / logout confirmation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// `"ok"` on success.
    #[schema(example = "ok")]
    pub status: String,
}

/// Generic error body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

/// Multipart form for card creation (documentation only; the handler parses
/// the multipart stream directly).
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateCardForm {
    /// Card title, required, non-empty.
    pub title: String,
    /// Card description, optional.
    pub description: Option<String>,
    /// Zero or more attachment files.
    #[schema(value_type = Vec<String>, format = Binary)]
    pub files: Vec<String>,
}
