//! Axum route handlers for staged drafting.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::llm_client::Engine;
use crate::models::stage::Candidate;
use crate::projects::models::{non_blank, parse_project_id};
use crate::projects::store::get_owned_project;
use crate::stages::orchestrator::{
    approve_candidate, build_stage_prompt, generate_candidates, placeholder_candidates,
    previous_approved_text,
};
use crate::stages::stage::Stage;
use crate::stages::store::{
    insert_candidate_set, latest_approval, latest_approvals, latest_candidate_set,
    record_approval, ApprovalParams,
};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StageGenerateRequest {
    pub project_id: String,
    pub stage: Stage,
    pub tweak: Option<String>,
    pub engine: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StageGenerateResponse {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct StageChooseRequest {
    pub project_id: String,
    pub stage: Stage,
    pub chosen_id: String,
    pub edits: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StageChooseResponse {
    pub ok: bool,
    pub next: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot_key: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/stage/generate
///
/// Produces up to three candidate drafts for a stage and stores the set.
/// Stages after the outline build on the previous stage's approved text.
pub async fn handle_stage_generate(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<StageGenerateRequest>,
) -> Result<Json<StageGenerateResponse>, AppError> {
    let project_id = parse_project_id(&req.project_id)?;
    let project = get_owned_project(&state.db, project_id, &user.uid)
        .await?
        .ok_or_else(AppError::project_not_found)?;

    let engine = Engine::from_request(req.engine.as_deref());
    let tweak = non_blank(req.tweak);

    let previous_approval = match req.stage.previous() {
        None => None,
        Some(previous) => latest_approval(&state.db, project.id, previous)
            .await?
            .map(|a| a.approved_text),
    };
    let approved_text = previous_approved_text(req.stage, previous_approval)?;

    let candidates = if state.llm.is_configured() {
        let prompt = build_stage_prompt(req.stage, &project, &approved_text, tweak.as_deref());
        generate_candidates(&state.llm, &prompt, engine).await?
    } else {
        placeholder_candidates(req.stage, req.engine.as_deref(), tweak.as_deref())
    };

    let set_id = insert_candidate_set(
        &state.db,
        project.id,
        req.stage,
        engine,
        tweak.as_deref(),
        &candidates,
    )
    .await?;

    info!(
        "Generated {} candidates (set {set_id}) for project {} stage {} on {}",
        candidates.len(),
        project.id,
        req.stage,
        engine.model()
    );

    Ok(Json(StageGenerateResponse { candidates }))
}

/// POST /api/stage/choose
///
/// Approves one candidate from the latest set (optionally with edits) and
/// advances the project to the next stage.
pub async fn handle_stage_choose(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<StageChooseRequest>,
) -> Result<Json<StageChooseResponse>, AppError> {
    let project_id = parse_project_id(&req.project_id)?;
    let mut project = get_owned_project(&state.db, project_id, &user.uid)
        .await?
        .ok_or_else(AppError::project_not_found)?;

    let set = latest_candidate_set(&state.db, project.id, req.stage)
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!("No {} candidates generated yet", req.stage))
        })?;
    let draft = approve_candidate(&set.candidates.0, &req.chosen_id, req.edits)?;

    let next = req.stage.next_label();
    record_approval(
        &state.db,
        ApprovalParams {
            project_id: project.id,
            stage: req.stage,
            candidate_id: &draft.candidate_id,
            approved_text: &draft.text,
            edited: draft.edited,
        },
        next,
    )
    .await?;
    project.stage = next.to_string();
    info!(
        "Project {} approved {} candidate {}; now at {next}",
        project.id, req.stage, draft.candidate_id
    );

    let snapshot_key = match &state.snapshots {
        Some(snapshots) => {
            let approvals = latest_approvals(&state.db, project.id).await?;
            match snapshots.write_snapshot(&project, req.stage, &approvals).await {
                Ok(key) => Some(key),
                Err(e) => {
                    warn!("Draft snapshot for project {} failed: {e}", project.id);
                    None
                }
            }
        }
        None => None,
    };

    Ok(Json(StageChooseResponse {
        ok: true,
        next,
        snapshot_key,
    }))
}
