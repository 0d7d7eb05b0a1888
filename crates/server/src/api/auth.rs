use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::SET_COOKIE;
use axum::response::IntoResponse;

use crate::error::ServerError;
use crate::session::{SessionSigner, password_matches};

use super::AppState;
use super::schemas::{AuthResponse, ErrorResponse, LoginRequest};

/// `POST /v1/auth/login` -- establish an admin session.
///
/// Compares the submitted password against the configured admin password and
/// sets the signed session cookie on success. When no admin password is
/// configured, login is disabled and every attempt fails.
#[utoipa::path(
    post,
    path = "/v1/auth/login",
    tag = "Auth",
    summary = "Admin login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session established", body = AuthResponse),
        (status = 401, description = "Wrong password", body = ErrorResponse),
        (status = 500, description = "Admin password not configured", body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServerError> {
    let Some(expected) = state.admin_password.as_deref() else {
        return Err(ServerError::Config("admin password is not configured".into()));
    };

    if !password_matches(&request.password, expected) {
        return Err(ServerError::InvalidCredentials);
    }

    let cookie = state.sessions.login_cookie();
    Ok((
        StatusCode::OK,
        [(SET_COOKIE, cookie)],
        Json(AuthResponse {
            status: "ok".into(),
        }),
    ))
}

/// `POST /v1/auth/logout` -- clear the admin session cookie.
#[utoipa::path(
    post,
    path = "/v1/auth/logout",
    tag = "Auth",
    summary = "Admin logout",
    responses(
        (status = 200, description = "Session cleared", body = AuthResponse)
    )
)]
pub async fn logout() -> impl IntoResponse {
    (
        StatusCode::OK,
        [(SET_COOKIE, SessionSigner::logout_cookie())],
        Json(AuthResponse {
            status: "ok".into(),
        }),
    )
}
