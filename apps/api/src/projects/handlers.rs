use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::models::project::ProjectRow;
use crate::projects::models::{parse_project_id, ProjectDetail, ProjectIn};
use crate::projects::store::{get_owned_project, insert_project, list_projects};
use crate::stages::store::latest_approvals;
use crate::state::AppState;

/// GET /api/projects
pub async fn handle_list_projects(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ProjectRow>>, AppError> {
    Ok(Json(list_projects(&state.db, &user.uid).await?))
}

/// POST /api/projects
pub async fn handle_create_project(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<ProjectIn>,
) -> Result<(StatusCode, Json<ProjectRow>), AppError> {
    let input = req.normalized()?;
    let project = insert_project(&state.db, &user.uid, &input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/projects/:id
pub async fn handle_get_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ProjectDetail>, AppError> {
    let id = parse_project_id(&id)?;
    let project = get_owned_project(&state.db, id, &user.uid)
        .await?
        .ok_or_else(AppError::project_not_found)?;
    let approvals = latest_approvals(&state.db, project.id).await?;
    Ok(Json(ProjectDetail { project, approvals }))
}
