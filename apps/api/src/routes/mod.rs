pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::pitch::handlers as pitch;
use crate::projects::handlers as projects;
use crate::stages::handlers as stages;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        // Projects
        .route(
            "/api/projects",
            get(projects::handle_list_projects).post(projects::handle_create_project),
        )
        .route("/api/projects/:id", get(projects::handle_get_project))
        // Pitch packaging
        .route("/api/pitch/generate", post(pitch::handle_generate_pitch))
        .route("/api/pitch/packs", get(pitch::handle_list_pitch_packs))
        // Staged drafting
        .route("/api/stage/generate", post(stages::handle_stage_generate))
        .route("/api/stage/choose", post(stages::handle_stage_choose))
        .with_state(state)
}
