//! Bearer-token identity verification.
//!
//! `AppState` holds an `Arc<dyn TokenVerifier>`; handlers only ever see the
//! resulting `AuthUser`. The production verifier pre-checks the token's claims
//! locally, then asks the identity toolkit to confirm it.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod claims;
pub mod extractor;

pub use extractor::AuthUser;

use self::claims::{check_claims, peek_claims};

const IDENTITY_TOOLKIT_LOOKUP_URL: &str =
    "https://identitytoolkit.googleapis.com/v1/accounts:lookup";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token is not a decodable JWT")]
    Malformed,

    #[error("token audience does not match the project")]
    AudienceMismatch,

    #[error("token issuer does not match the project")]
    IssuerMismatch,

    #[error("token has expired")]
    Expired,

    #[error("identity provider rejected the token: {0}")]
    Rejected(String),

    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Returns the verified uid of the token's owner.
    async fn verify(&self, token: &str) -> Result<String, AuthError>;
}

/// Verifies Firebase ID tokens via the identity-toolkit `accounts:lookup` endpoint.
pub struct FirebaseTokenVerifier {
    client: Client,
    project_id: String,
    web_api_key: String,
}

impl FirebaseTokenVerifier {
    pub fn new(project_id: String, web_api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
            project_id,
            web_api_key,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
}

#[async_trait]
impl TokenVerifier for FirebaseTokenVerifier {
    async fn verify(&self, token: &str) -> Result<String, AuthError> {
        let claims = peek_claims(token).ok_or(AuthError::Malformed)?;
        check_claims(&claims, &self.project_id, chrono::Utc::now().timestamp())?;

        let response = self
            .client
            .post(IDENTITY_TOOLKIT_LOOKUP_URL)
            .query(&[("key", self.web_api_key.as_str())])
            .json(&LookupRequest { id_token: token })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Rejected(format!("{status}: {body}")));
        }

        let lookup: LookupResponse = response.json().await?;
        let uid = lookup
            .users
            .into_iter()
            .next()
            .map(|u| u.local_id)
            .ok_or_else(|| AuthError::Rejected("no user for token".to_string()))?;

        if claims.sub.as_deref().is_some_and(|sub| sub != uid) {
            return Err(AuthError::Rejected("subject does not match account".to_string()));
        }

        Ok(uid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_firebase_verifier_rejects_malformed_before_network() {
        let verifier = FirebaseTokenVerifier::new("manthan-dev".into(), "key".into());
        let result = verifier.verify("garbage").await;
        assert!(matches!(result, Err(AuthError::Malformed)));
    }

    #[tokio::test]
    async fn test_firebase_verifier_rejects_foreign_audience_before_network() {
        let verifier = FirebaseTokenVerifier::new("manthan-dev".into(), "key".into());
        let token = claims::encode_test_token(&json!({
            "aud": "someone-else",
            "iss": "https://securetoken.google.com/someone-else",
            "exp": 4_000_000_000i64
        }));
        let result = verifier.verify(&token).await;
        assert!(matches!(result, Err(AuthError::AudienceMismatch)));
    }

    #[test]
    fn test_lookup_response_parses_local_id() {
        let body = r#"{"kind":"identitytoolkit#GetAccountInfoResponse","users":[{"localId":"abc123","email":"a@b.c"}]}"#;
        let parsed: LookupResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.users[0].local_id, "abc123");
    }
}
