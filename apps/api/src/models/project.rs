use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub owner_uid: String,
    pub title: String,
    pub logline: String,
    pub genre: Option<String>,
    pub tone: Option<String>,
    pub creator_name: Option<String>,
    pub language: Option<String>,
    pub stage: String,
    pub created_at: DateTime<Utc>,
}
