use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::error;

use crate::auth::claims::peek_claims;
use crate::errors::AppError;
use crate::state::AppState;

/// The verified caller. Add it to a handler's arguments to require a bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub uid: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        let token = bearer_token(header)
            .ok_or_else(|| AppError::Unauthorized("Missing Bearer token".to_string()))?;

        match state.verifier.verify(token).await {
            Ok(uid) => Ok(AuthUser { uid }),
            Err(e) => {
                let peeked = peek_claims(token).unwrap_or_default();
                error!(
                    "Token verification failed: {e} | project_id={} | aud={:?} | iss={:?}",
                    state.config.firebase_project_id, peeked.aud, peeked.iss
                );
                Err(AppError::Unauthorized("Invalid or expired token".to_string()))
            }
        }
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
/// The scheme is matched case-insensitively; an empty token counts as missing.
fn bearer_token(header: Option<&str>) -> Option<&str> {
    let header = header?;
    let (scheme, token) = header.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
