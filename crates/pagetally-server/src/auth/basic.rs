use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use subtle::ConstantTimeEq;

use pagetally_core::config::AuthMode;

use crate::{error::AppError, state::AppState};

/// Username and password from an `Authorization: Basic ...` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Parse the `Authorization` header. Any malformed value is `None`.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }
        let decoded = STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;
        Some(Self {
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    /// Constant-time comparison against the configured pair. Both halves are
    /// always compared.
    pub fn matches(&self, username: &str, password: &str) -> bool {
        let user_ok = self.username.as_bytes().ct_eq(username.as_bytes());
        let pass_ok = self.password.as_bytes().ct_eq(password.as_bytes());
        (user_ok & pass_ok).into()
    }
}

/// Middleware guarding `/admin/*`.
///
/// With `PAGETALLY_AUTH=none` every request passes through.
pub async fn require_admin(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let AuthMode::Basic { username, password } = &state.config.auth_mode {
        let allowed = Credentials::from_headers(request.headers())
            .is_some_and(|c| c.matches(username, password));
        if !allowed {
            tracing::debug!(path = %request.uri().path(), "Admin credentials rejected");
            return Err(AppError::Unauthorized);
        }
    }
    Ok(next.run(request).await)
}
