use std::sync::Arc;

use sqlx::PgPool;

use crate::auth::TokenVerifier;
use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::projects::snapshot::SnapshotStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    pub config: Config,
    /// Pluggable identity verifier. Default: FirebaseTokenVerifier.
    pub verifier: Arc<dyn TokenVerifier>,
    /// Markdown draft snapshots; `None` when no bucket is configured.
    pub snapshots: Option<SnapshotStore>,
}
