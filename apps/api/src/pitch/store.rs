use serde_json::Value;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::pitch::PitchPackRow;

/// Persists a generated pack with the idea and quality report it came from.
pub async fn insert_pitch_pack(
    pool: &PgPool,
    owner_uid: &str,
    idea: &Value,
    pack: &Value,
    quality: &Value,
) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO pitch_packs (id, owner_uid, idea, pack, quality)
        VALUES ($1, $2, $3, $4, $5)
        "#,
    )
    .bind(id)
    .bind(owner_uid)
    .bind(idea)
    .bind(pack)
    .bind(quality)
    .execute(pool)
    .await?;

    info!("Saved pitch pack {id} for owner {owner_uid}");
    Ok(id)
}

/// The caller's saved packs, newest first.
pub async fn list_pitch_packs(pool: &PgPool, owner_uid: &str) -> Result<Vec<PitchPackRow>, sqlx::Error> {
    sqlx::query_as::<_, PitchPackRow>(
        "SELECT * FROM pitch_packs WHERE owner_uid = $1 ORDER BY created_at DESC",
    )
    .bind(owner_uid)
    .fetch_all(pool)
    .await
}
