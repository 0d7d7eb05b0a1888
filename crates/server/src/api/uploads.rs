use std::io::ErrorKind;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;

use pinboard_core::CardId;

use crate::error::ServerError;

use super::AppState;
use super::schemas::ErrorResponse;

/// `GET /uploads/{card_id}/{filename}` -- serve attachment bytes.
///
/// Both path segments are validated before touching the filesystem: the card
/// id must be well-formed hex and the filename must survive sanitization
/// unchanged. Anything else is a plain 404.
#[utoipa::path(
    get,
    path = "/uploads/{card_id}/{filename}",
    tag = "Uploads",
    summary = "Download attachment",
    params(
        ("card_id" = String, Path, description = "Card identifier"),
        ("filename" = String, Path, description = "Stored attachment filename")
    ),
    responses(
        (status = 200, description = "Attachment bytes"),
        (status = 404, description = "Unknown card or attachment", body = ErrorResponse)
    )
)]
pub async fn download(
    State(state): State<AppState>,
    Path((card_id, filename)): Path<(String, String)>,
) -> Result<impl IntoResponse, ServerError> {
    let card_id = CardId::parse(&card_id).ok_or(ServerError::NotFound)?;
    let path = state
        .uploads
        .resolve(&card_id, &filename)
        .ok_or(ServerError::NotFound)?;

    let bytes = match tokio::fs::read(&path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(ServerError::NotFound),
        Err(e) => return Err(pinboard_store::StoreError::from(e).into()),
    };

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    Ok((
        StatusCode::OK,
        [(CONTENT_TYPE, mime.to_string())],
        bytes,
    ))
}
