//! Unverified JWT payload decoding.
//!
//! Used for cheap pre-checks before the remote lookup and for logging
//! `aud`/`iss` when verification fails. Never trust these claims on their own.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::Deserialize;

use crate::auth::AuthError;

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PeekedClaims {
    pub aud: Option<String>,
    pub iss: Option<String>,
    pub sub: Option<String>,
    pub exp: Option<i64>,
}

/// Decodes the payload segment of a compact JWT without checking the signature.
pub fn peek_claims(token: &str) -> Option<PeekedClaims> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_)) => payload,
        _ => return None,
    };
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Checks audience, issuer and expiry against the configured identity project.
pub fn check_claims(claims: &PeekedClaims, project_id: &str, now: i64) -> Result<(), AuthError> {
    if claims.aud.as_deref() != Some(project_id) {
        return Err(AuthError::AudienceMismatch);
    }
    let expected_issuer = format!("https://securetoken.google.com/{project_id}");
    if claims.iss.as_deref() != Some(expected_issuer.as_str()) {
        return Err(AuthError::IssuerMismatch);
    }
    match claims.exp {
        Some(exp) if exp > now => Ok(()),
        _ => Err(AuthError::Expired),
    }
}

#[cfg(test)]
pub(crate) fn encode_test_token(payload: &serde_json::Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"RS256","typ":"JWT"}"#);
    let body = URL_SAFE_NO_PAD.encode(payload.to_string());
    format!("{header}.{body}.signature")
}
