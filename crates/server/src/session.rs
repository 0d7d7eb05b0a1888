//! Admin session guard.
//!
//! The admin session is a single boolean: "this browser holds an admin
//! session". It is carried by an HMAC-SHA256-signed, expiring cookie of the
//! form `pinboard_session=admin.<expires_at>.<signature>`; no server-side
//! session state exists. [`AdminSession`] is the value object handed to
//! guarded operations, reconstructed per request by its axum extractor.

use axum::extract::{FromRef, FromRequestParts};
use axum::http::HeaderMap;
use axum::http::header::COOKIE;
use axum::http::request::Parts;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

use crate::api::AppState;
use crate::error::ServerError;

type HmacSha256 = Hmac<Sha256>;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "pinboard_session";

/// Marker bound into the signed cookie payload.
const SESSION_SUBJECT: &str = "admin";

/// Compare a candidate password against the configured one without leaking
/// a prefix match through timing. Both sides are hashed first, so the final
/// equality check runs over fixed-length unpredictable data.
#[must_use]
pub fn password_matches(candidate: &str, expected: &str) -> bool {
    Sha256::digest(candidate.as_bytes()) == Sha256::digest(expected.as_bytes())
}

/// Issues and verifies signed session cookies.
pub struct SessionSigner {
    secret: Vec<u8>,
    ttl_seconds: u64,
}

impl SessionSigner {
    /// Create a signer from an opaque secret and a session lifetime.
    #[must_use]
    pub fn new(secret: &str, ttl_seconds: u64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl_seconds,
        }
    }

    fn mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key size")
    }

    fn signature(&self, expires_at: i64) -> String {
        let mut mac = self.mac();
        mac.update(format!("{SESSION_SUBJECT}.{expires_at}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Issue a fresh admin session cookie value.
    #[must_use]
    pub fn issue(&self) -> String {
        let expires_at = Utc::now().timestamp() + i64::try_from(self.ttl_seconds).unwrap_or(i64::MAX);
        let sig = self.signature(expires_at);
        format!("{SESSION_SUBJECT}.{expires_at}.{sig}")
    }

    /// Verify a cookie value: well-formed, unexpired, and carrying a valid
    /// signature. Signature comparison is constant-time.
    #[must_use]
    pub fn verify(&self, value: &str) -> bool {
        let mut parts = value.splitn(3, '.');
        let (Some(subject), Some(expires_at), Some(sig)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return false;
        };
        if subject != SESSION_SUBJECT {
            return false;
        }
        let Ok(expires_at) = expires_at.parse::<i64>() else {
            return false;
        };
        if expires_at < Utc::now().timestamp() {
            return false;
        }
        let Ok(sig_bytes) = hex::decode(sig) else {
            return false;
        };

        let mut mac = self.mac();
        mac.update(format!("{SESSION_SUBJECT}.{expires_at}").as_bytes());
        mac.verify_slice(&sig_bytes).is_ok()
    }

    /// `Set-Cookie` header value establishing an admin session.
    #[must_use]
    pub fn login_cookie(&self) -> String {
        format!(
            "{SESSION_COOKIE}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
            self.issue(),
            self.ttl_seconds
        )
    }

    /// `Set-Cookie` header value clearing the session.
    #[must_use]
    pub fn logout_cookie() -> String {
        format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
    }
}

/// Per-request admin session flag.
///
/// Extracted from the session cookie on every request; absent or invalid
/// cookies yield `is_admin = false` rather than a rejection, since most
/// routes are public.
#[derive(Debug, Clone, Copy)]
pub struct AdminSession {
    /// Whether this request carries a valid admin session.
    pub is_admin: bool,
}

impl AdminSession {
    /// A session with the admin flag unset.
    #[must_use]
    pub fn anonymous() -> Self {
        Self { is_admin: false }
    }

    /// A session with the admin flag set (for tests and internal callers).
    #[must_use]
    pub fn admin() -> Self {
        Self { is_admin: true }
    }

    /// Gate for admin-only operations.
    pub fn require_admin(&self) -> Result<(), ServerError> {
        if self.is_admin {
            Ok(())
        } else {
            Err(ServerError::Unauthorized)
        }
    }
}

/// Extract the raw session cookie value from request headers.
fn session_cookie_value(headers: &HeaderMap) -> Option<String> {
    for header in headers.get_all(COOKIE) {
        let Ok(raw) = header.to_str() else { continue };
        for pair in raw.split(';') {
            if let Some((name, value)) = pair.trim().split_once('=')
                && name == SESSION_COOKIE
            {
                return Some(value.to_owned());
            }
        }
    }
    None
}

impl<S> FromRequestParts<S> for AdminSession
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);
        let is_admin = session_cookie_value(&parts.headers)
            .is_some_and(|value| app.sessions.verify(&value));
        Ok(Self { is_admin })
    }
}
