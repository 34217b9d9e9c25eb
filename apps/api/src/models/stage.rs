use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One alternative draft offered for a stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub meta: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StageCandidatesRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub stage: String,
    pub engine: String,
    pub tweak: Option<String>,
    pub candidates: Json<Vec<Candidate>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StageApprovalRow {
    pub id: Uuid,
    pub project_id: Uuid,
    pub stage: String,
    pub candidate_id: String,
    pub approved_text: String,
    pub edited: bool,
    pub created_at: DateTime<Utc>,
}
