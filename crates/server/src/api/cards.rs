use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use pinboard_core::Card;

use crate::error::ServerError;
use crate::service::{CardDraft, UploadedFile};
use crate::session::AdminSession;

use super::AppState;
use super::schemas::{CreateCardForm, ErrorResponse};

/// `GET /v1/cards` -- public listing, newest first.
#[utoipa::path(
    get,
    path = "/v1/cards",
    tag = "Cards",
    summary = "List cards",
    responses(
        (status = 200, description = "All cards, newest first", body = Vec<Card>)
    )
)]
pub async fn list_cards(State(state): State<AppState>) -> Result<impl IntoResponse, ServerError> {
    let mut cards = state.service.list_cards().await?;
    // Stored order is insertion order; the board displays newest first.
    cards.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok((StatusCode::OK, Json(cards)))
}

/// `POST /v1/cards` -- create a card from a multipart form (admin only).
///
/// Fields: `title` (required), `description` (optional), `files` (repeated,
/// zero or more). The whole body is buffered and validated before anything
/// is written, so a rejected submission leaves no partial state.
#[utoipa::path(
    post,
    path = "/v1/cards",
    tag = "Cards",
    summary = "Create card",
    request_body(content = CreateCardForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Card created", body = Card),
        (status = 401, description = "No admin session", body = ErrorResponse),
        (status = 413, description = "Upload exceeds the configured byte limit", body = ErrorResponse),
        (status = 415, description = "Attachment extension not allowed", body = ErrorResponse),
        (status = 422, description = "Missing or empty title", body = ErrorResponse)
    )
)]
pub async fn create_card(
    State(state): State<AppState>,
    session: AdminSession,
    multipart: Multipart,
) -> Result<impl IntoResponse, ServerError> {
    // Checked again inside the service; rejecting here avoids buffering
    // uploads for anonymous callers.
    session.require_admin()?;

    let draft = read_draft(multipart).await?;
    let card = state.service.create_card(&session, draft).await?;
    Ok((StatusCode::CREATED, Json(card)))
}

/// Buffer the multipart form into a [`CardDraft`].
async fn read_draft(mut multipart: Multipart) -> Result<CardDraft, ServerError> {
    let mut draft = CardDraft::default();

    while let Some(field) = multipart.next_field().await.map_err(map_multipart_error)? {
        match field.name().unwrap_or_default() {
            "title" => draft.title = field.text().await.map_err(map_multipart_error)?,
            "description" => {
                draft.description = field.text().await.map_err(map_multipart_error)?;
            }
            "files" => {
                // Browsers submit an empty part when no file is selected.
                let name = field.file_name().unwrap_or_default().to_owned();
                if name.is_empty() {
                    continue;
                }
                let bytes = field.bytes().await.map_err(map_multipart_error)?;
                draft.files.push(UploadedFile {
                    name,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {}
        }
    }

    Ok(draft)
}

/// Body-limit overflows surface as 413; everything else is a malformed
/// request.
fn map_multipart_error(e: MultipartError) -> ServerError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ServerError::PayloadTooLarge
    } else {
        ServerError::Validation(e.body_text())
    }
}
