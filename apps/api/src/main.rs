mod auth;
mod config;
mod db;
mod errors;
mod extract;
mod llm_client;
mod models;
mod pitch;
mod projects;
mod routes;
mod stages;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::FirebaseTokenVerifier;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::projects::snapshot::SnapshotStore;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Manthan Creator Suite API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL document store
    let db = create_pool(&config.database_url).await?;

    // Initialize LLM client
    let llm = LlmClient::new(config.openai_api_key.clone(), &config.openai_base_url);
    if llm.is_configured() {
        info!(
            "LLM client initialized (pitch model: {}, temperature: {})",
            config.openai_model, config.openai_temperature
        );
    } else {
        warn!("OPENAI_API_KEY not set; generators will use template output");
    }

    // Initialize identity verification
    let verifier = Arc::new(FirebaseTokenVerifier::new(
        config.firebase_project_id.clone(),
        config.firebase_web_api_key.clone(),
    ));
    info!(
        "Token verifier initialized (project: {})",
        config.firebase_project_id
    );

    // Initialize draft snapshots (optional)
    let snapshots = match &config.snapshots {
        Some(snapshot_config) => {
            info!("Draft snapshots enabled (bucket: {})", snapshot_config.bucket);
            Some(SnapshotStore::connect(snapshot_config).await)
        }
        None => None,
    };

    info!("Pitch autosave: {}", config.autosave);

    // Build app state
    let state = AppState {
        db,
        llm,
        config: config.clone(),
        verifier,
        snapshots,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
