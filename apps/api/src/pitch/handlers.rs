//! Axum route handlers for pitch packaging.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::models::pitch::PitchPackRow;
use crate::pitch::generator::{
    generate_pitch_pack, PackSource, PitchIdea, PitchPack, DEFAULT_GENRE, DEFAULT_TONE,
};
use crate::pitch::quality::{assess, QualityInput, QualityReport};
use crate::pitch::store::{insert_pitch_pack, list_pitch_packs};
use crate::projects::models::non_blank;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PitchRequest {
    pub title: String,
    pub logline: String,
    pub genre: Option<String>,
    pub tone: Option<String>,
}

/// The idea as the caller sent it (trimmed), without defaults. Saved with the pack.
#[derive(Debug, Serialize)]
struct SuppliedIdea<'a> {
    title: &'a str,
    logline: &'a str,
    genre: Option<&'a str>,
    tone: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub struct PitchResponse {
    #[serde(flatten)]
    pub pack: PitchPack,
    pub quality: QualityReport,
    pub source: PackSource,
    /// Id of the autosaved record; `null` when autosave is off or failed.
    pub doc_id: Option<Uuid>,
}

/// POST /api/pitch/generate
///
/// Model pack when available, template pack otherwise; always scored and,
/// when enabled, autosaved under the caller.
pub async fn handle_generate_pitch(
    State(state): State<AppState>,
    user: AuthUser,
    ApiJson(req): ApiJson<PitchRequest>,
) -> Result<Json<PitchResponse>, AppError> {
    let title = req.title.trim().to_string();
    let logline = req.logline.trim().to_string();
    if title.is_empty() || logline.is_empty() {
        return Err(AppError::Validation(
            "title and logline cannot be empty".to_string(),
        ));
    }
    let supplied_genre = non_blank(req.genre);
    let supplied_tone = non_blank(req.tone);

    let idea = PitchIdea {
        title,
        logline,
        genre: supplied_genre
            .clone()
            .unwrap_or_else(|| DEFAULT_GENRE.to_string()),
        tone: supplied_tone
            .clone()
            .unwrap_or_else(|| DEFAULT_TONE.to_string()),
    };

    let (pack, source) = generate_pitch_pack(
        &state.llm,
        &state.config.openai_model,
        state.config.openai_temperature,
        &idea,
    )
    .await;

    let quality = assess(&QualityInput {
        title: &idea.title,
        logline: &idea.logline,
        genre: supplied_genre.as_deref(),
        tone: supplied_tone.as_deref(),
        beat_count: pack.beat_sheet.len(),
        synopsis: &pack.synopsis,
    });

    let doc_id = if state.config.autosave {
        let supplied = SuppliedIdea {
            title: &idea.title,
            logline: &idea.logline,
            genre: supplied_genre.as_deref(),
            tone: supplied_tone.as_deref(),
        };
        autosave(&state, &user.uid, &supplied, &pack, &quality).await
    } else {
        None
    };

    Ok(Json(PitchResponse {
        pack,
        quality,
        source,
        doc_id,
    }))
}

/// GET /api/pitch/packs
pub async fn handle_list_pitch_packs(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<PitchPackRow>>, AppError> {
    Ok(Json(list_pitch_packs(&state.db, &user.uid).await?))
}

/// Autosave never fails the request; errors are logged and yield `None`.
async fn autosave(
    state: &AppState,
    owner_uid: &str,
    idea: &SuppliedIdea<'_>,
    pack: &PitchPack,
    quality: &QualityReport,
) -> Option<Uuid> {
    let (idea, pack, quality) = match to_documents(idea, pack, quality) {
        Ok(values) => values,
        Err(e) => {
            warn!("Pitch autosave skipped, serialization failed: {e}");
            return None;
        }
    };

    match insert_pitch_pack(&state.db, owner_uid, &idea, &pack, &quality).await {
        Ok(id) => Some(id),
        Err(e) => {
            warn!("Pitch autosave failed: {e}");
            None
        }
    }
}

fn to_documents(
    idea: &SuppliedIdea<'_>,
    pack: &PitchPack,
    quality: &QualityReport,
) -> serde_json::Result<(Value, Value, Value)> {
    Ok((
        serde_json::to_value(idea)?,
        serde_json::to_value(pack)?,
        serde_json::to_value(quality)?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pitch::generator::template_pack;
    use crate::pitch::quality::QualityLabel;

    #[test]
    fn test_pitch_response_flattens_pack() {
        let idea = PitchIdea {
            title: "Dhuaan".to_string(),
            logline: "A fireman hides a secret.".to_string(),
            genre: DEFAULT_GENRE.to_string(),
            tone: DEFAULT_TONE.to_string(),
        };
        let response = PitchResponse {
            pack: template_pack(&idea),
            quality: QualityReport {
                score: 50,
                label: QualityLabel::NeedsWork,
                reasons: vec![],
            },
            source: PackSource::Template,
            doc_id: None,
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["title"], "Dhuaan");
        assert_eq!(value["beat_sheet"].as_array().unwrap().len(), 10);
        assert_eq!(value["source"], "template");
        assert_eq!(value["quality"]["label"], "Needs work");
        assert!(value["doc_id"].is_null());
    }

    #[test]
    fn test_saved_idea_keeps_missing_genre_and_tone() {
        let supplied = SuppliedIdea {
            title: "Dhuaan",
            logline: "A fireman hides a secret.",
            genre: Some("Thriller"),
            tone: None,
        };
        let idea = PitchIdea {
            title: supplied.title.to_string(),
            logline: supplied.logline.to_string(),
            genre: "Thriller".to_string(),
            tone: DEFAULT_TONE.to_string(),
        };
        let quality = QualityReport {
            score: 75,
            label: QualityLabel::Decent,
            reasons: vec!["No tone provided".to_string()],
        };
        let (saved, pack, _) = to_documents(&supplied, &template_pack(&idea), &quality).unwrap();

        assert_eq!(saved["genre"], "Thriller");
        assert!(saved["tone"].is_null());
        // The generated pack still reflects the default tone.
        assert!(pack["synopsis"]
            .as_str()
            .unwrap()
            .contains(&DEFAULT_TONE.to_lowercase()));
    }
}
