use sqlx::{PgExecutor, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::models::project::ProjectRow;
use crate::projects::models::ProjectIn;

/// Returns the caller's projects ordered by title.
pub async fn list_projects(pool: &PgPool, owner_uid: &str) -> Result<Vec<ProjectRow>, sqlx::Error> {
    sqlx::query_as::<_, ProjectRow>(
        "SELECT * FROM projects WHERE owner_uid = $1 ORDER BY title ASC, created_at ASC",
    )
    .bind(owner_uid)
    .fetch_all(pool)
    .await
}

/// Inserts a project owned by `owner_uid` at the first stage.
pub async fn insert_project(
    pool: &PgPool,
    owner_uid: &str,
    input: &ProjectIn,
) -> Result<ProjectRow, sqlx::Error> {
    let project = sqlx::query_as::<_, ProjectRow>(
        r#"
        INSERT INTO projects
            (id, owner_uid, title, logline, genre, tone, creator_name, language, stage)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'outline')
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_uid)
    .bind(&input.title)
    .bind(&input.logline)
    .bind(&input.genre)
    .bind(&input.tone)
    .bind(&input.creator_name)
    .bind(&input.language)
    .fetch_one(pool)
    .await?;

    info!("Created project {} for owner {}", project.id, owner_uid);
    Ok(project)
}

/// Fetches a project only if `owner_uid` owns it.
pub async fn get_owned_project(
    pool: &PgPool,
    project_id: Uuid,
    owner_uid: &str,
) -> Result<Option<ProjectRow>, sqlx::Error> {
    sqlx::query_as::<_, ProjectRow>("SELECT * FROM projects WHERE id = $1 AND owner_uid = $2")
        .bind(project_id)
        .bind(owner_uid)
        .fetch_optional(pool)
        .await
}

/// Advances the project's stage label. The only in-place update in the schema.
pub async fn update_stage<'e>(
    executor: impl PgExecutor<'e>,
    project_id: Uuid,
    stage: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE projects SET stage = $1 WHERE id = $2")
        .bind(stage)
        .bind(project_id)
        .execute(executor)
        .await?;
    Ok(())
}
