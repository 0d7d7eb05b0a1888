use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use pinboard_store::StoreError;

/// Errors that can occur while serving the card board.
#[derive(Debug, Error)]
pub enum ServerError {
    /// A write operation was attempted without an admin session.
    #[error("unauthorized: admin session required")]
    Unauthorized,

    /// Wrong admin password at login.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// A required field is missing or malformed.
    #[error("validation error: {0}")]
    Validation(String),

    /// Uploaded file extension is outside the allow-list. The whole
    /// submission is rejected; nothing is written.
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Request exceeds the configured upload byte limit.
    #[error("payload too large")]
    PayloadTooLarge,

    /// The requested card or attachment does not exist.
    #[error("not found")]
    NotFound,

    /// A configuration error (e.g. admin password not set).
    #[error("configuration error: {0}")]
    Config(String),

    /// A storage failure. Logged and surfaced as a generic error, never
    /// retried.
    #[error("storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ServerError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UnsupportedFileType { filename } => Self::UnsupportedFileType(filename),
            StoreError::InvalidFilename { original } => {
                Self::Validation(format!("invalid filename: {original:?}"))
            }
            other => Self::Store(other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, self.to_string()),
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            Self::UnsupportedFileType(_) => (StatusCode::UNSUPPORTED_MEDIA_TYPE, self.to_string()),
            Self::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, self.to_string()),
            Self::NotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Self::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
            Self::Store(e) => {
                // Disk failures carry paths and OS detail; log them, return
                // a generic message.
                tracing::error!(error = %e, "storage failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "storage failure".to_owned(),
                )
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_upload_errors_map_to_client_errors() {
        let e: ServerError = StoreError::UnsupportedFileType {
            filename: "a.exe".into(),
        }
        .into();
        assert!(matches!(e, ServerError::UnsupportedFileType(_)));

        let e: ServerError = StoreError::InvalidFilename { original: "".into() }.into();
        assert!(matches!(e, ServerError::Validation(_)));
    }

    #[test]
    fn status_codes_match_taxonomy() {
        assert_eq!(
            ServerError::Unauthorized.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ServerError::PayloadTooLarge.into_response().status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            ServerError::UnsupportedFileType("x".into())
                .into_response()
                .status(),
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        );
    }
}
