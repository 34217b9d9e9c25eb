use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::llm_client::Engine;
use crate::models::stage::{Candidate, StageApprovalRow, StageCandidatesRow};
use crate::projects::store::update_stage;
use crate::stages::stage::Stage;

/// Appends a generated candidate set. Earlier sets for the stage are kept.
pub async fn insert_candidate_set(
    pool: &PgPool,
    project_id: Uuid,
    stage: Stage,
    engine: Engine,
    tweak: Option<&str>,
    candidates: &[Candidate],
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO stage_candidates (id, project_id, stage, engine, tweak, candidates)
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(id)
    .bind(project_id)
    .bind(stage.as_str())
    .bind(engine.model())
    .bind(tweak)
    .bind(Json(candidates))
    .execute(pool)
    .await?;

    info!(
        "Stored {} {} candidates for project {project_id}",
        candidates.len(),
        stage
    );
    Ok(id)
}

/// The most recently generated candidate set for a stage.
pub async fn latest_candidate_set(
    pool: &PgPool,
    project_id: Uuid,
    stage: Stage,
) -> Result<Option<StageCandidatesRow>, sqlx::Error> {
    sqlx::query_as::<_, StageCandidatesRow>(
        r#"
        SELECT * FROM stage_candidates
        WHERE project_id = $1 AND stage = $2
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(project_id)
    .bind(stage.as_str())
    .fetch_optional(pool)
    .await
}

/// Parameters for recording an approval.
pub struct ApprovalParams<'a> {
    pub project_id: Uuid,
    pub stage: Stage,
    pub candidate_id: &'a str,
    pub approved_text: &'a str,
    pub edited: bool,
}

/// Appends an approval. Never UPDATEs earlier approvals.
pub async fn insert_approval<'e>(
    executor: impl PgExecutor<'e>,
    params: ApprovalParams<'_>,
) -> Result<StageApprovalRow, sqlx::Error> {
    sqlx::query_as::<_, StageApprovalRow>(
        r#"
        INSERT INTO stage_approvals
            (id, project_id, stage, candidate_id, approved_text, edited)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(params.project_id)
    .bind(params.stage.as_str())
    .bind(params.candidate_id)
    .bind(params.approved_text)
    .bind(params.edited)
    .fetch_one(executor)
    .await
}

/// Appends the approval and advances the project to `next` in one transaction.
pub async fn record_approval(
    pool: &PgPool,
    params: ApprovalParams<'_>,
    next: &str,
) -> Result<StageApprovalRow, sqlx::Error> {
    let project_id = params.project_id;
    let mut tx = pool.begin().await?;
    let approval = insert_approval(&mut *tx, params).await?;
    update_stage(&mut *tx, project_id, next).await?;
    tx.commit().await?;
    Ok(approval)
}

pub async fn latest_approval(
    pool: &PgPool,
    project_id: Uuid,
    stage: Stage,
) -> Result<Option<StageApprovalRow>, sqlx::Error> {
    sqlx::query_as::<_, StageApprovalRow>(
        r#"
        SELECT * FROM stage_approvals
        WHERE project_id = $1 AND stage = $2
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(project_id)
    .bind(stage.as_str())
    .fetch_optional(pool)
    .await
}

/// Latest approval per stage, sorted into stage order.
pub async fn latest_approvals(
    pool: &PgPool,
    project_id: Uuid,
) -> Result<Vec<StageApprovalRow>, sqlx::Error> {
    let mut approvals = sqlx::query_as::<_, StageApprovalRow>(
        r#"
        SELECT DISTINCT ON (stage) *
        FROM stage_approvals
        WHERE project_id = $1
        ORDER BY stage, created_at DESC
        "#,
    )
    .bind(project_id)
    .fetch_all(pool)
    .await?;

    approvals.sort_by_key(|a| stage_rank(&a.stage));
    Ok(approvals)
}

fn stage_rank(label: &str) -> usize {
    Stage::ALL
        .iter()
        .position(|s| s.as_str() == label)
        .unwrap_or(Stage::ALL.len())
}
