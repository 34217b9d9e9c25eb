use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PitchPackRow {
    pub id: Uuid,
    pub owner_uid: String,
    pub idea: Value,
    pub pack: Value,
    pub quality: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
