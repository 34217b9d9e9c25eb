//! Pitch packaging: title + logline → synopsis, beat sheet and deck outline.
//!
//! The model is tried first when configured. Any failure, or a pack missing one of
//! its three parts, falls back to the deterministic template pack.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::llm_client::prompts::system_prompt;
use crate::llm_client::{ChatOptions, LlmClient};
use crate::pitch::prompts::{
    PACKAGING_ROLE, PITCH_PROMPT_TEMPLATE, TEMPLATE_BEAT_SHEET, TEMPLATE_DECK_OUTLINE,
};

pub const MAX_BEATS: usize = 10;
pub const MAX_DECK_SECTIONS: usize = 8;
pub const DEFAULT_GENRE: &str = "Drama";
pub const DEFAULT_TONE: &str = "Grounded, character-driven";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A trimmed pitch idea with defaults applied.
#[derive(Debug, Clone)]
pub struct PitchIdea {
    pub title: String,
    pub logline: String,
    pub genre: String,
    pub tone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchPack {
    pub title: String,
    pub logline: String,
    pub synopsis: String,
    pub beat_sheet: Vec<String>,
    pub deck_outline: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackSource {
    Model,
    Template,
}

/// Loosely-typed model output. Lists may hold non-string items.
#[derive(Debug, Default, Deserialize)]
struct RawPack {
    title: Option<String>,
    logline: Option<String>,
    synopsis: Option<Value>,
    beat_sheet: Option<Vec<Value>>,
    deck_outline: Option<Vec<Value>>,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation
// ────────────────────────────────────────────────────────────────────────────

/// Returns the model pack when available and complete, else the template pack.
pub async fn generate_pitch_pack(
    llm: &LlmClient,
    model: &str,
    temperature: f32,
    idea: &PitchIdea,
) -> (PitchPack, PackSource) {
    if llm.is_configured() {
        match generate_with_model(llm, model, temperature, idea).await {
            Some(pack) => {
                info!("Pitch pack generated by {model} for '{}'", idea.title);
                return (pack, PackSource::Model);
            }
            None => warn!("Model pitch pack unusable, using template for '{}'", idea.title),
        }
    }
    (template_pack(idea), PackSource::Template)
}

async fn generate_with_model(
    llm: &LlmClient,
    model: &str,
    temperature: f32,
    idea: &PitchIdea,
) -> Option<PitchPack> {
    let input_json = serde_json::to_string_pretty(&json!({
        "title": idea.title,
        "logline": idea.logline,
        "genre": idea.genre,
        "tone": idea.tone,
    }))
    .ok()?;
    let prompt = PITCH_PROMPT_TEMPLATE.replace("{input_json}", &input_json);
    let system = system_prompt(PACKAGING_ROLE, true);
    let options = ChatOptions {
        model,
        temperature,
        json_mode: true,
    };

    match llm.call_json::<RawPack>(&prompt, &system, options).await {
        Ok(raw) => normalize_pack(raw, idea),
        Err(e) => {
            warn!("Pitch generation failed: {e}");
            None
        }
    }
}

/// Fills missing title/logline from the idea and clamps the lists.
/// Returns `None` if synopsis, beat sheet or deck outline ends up empty.
fn normalize_pack(raw: RawPack, idea: &PitchIdea) -> Option<PitchPack> {
    let pack = PitchPack {
        title: non_empty_or(raw.title, &idea.title),
        logline: non_empty_or(raw.logline, &idea.logline),
        synopsis: raw.synopsis.map(value_to_text).unwrap_or_default(),
        beat_sheet: clamp_list(raw.beat_sheet, MAX_BEATS),
        deck_outline: clamp_list(raw.deck_outline, MAX_DECK_SECTIONS),
    };

    let complete = !pack.synopsis.is_empty()
        && !pack.beat_sheet.is_empty()
        && !pack.deck_outline.is_empty();
    complete.then_some(pack)
}

/// Deterministic pack built from the idea alone.
pub fn template_pack(idea: &PitchIdea) -> PitchPack {
    let synopsis = format!(
        "**{}** is a {} told with a {} tone. The core premise is: {} \
         Act I establishes the world and immediate stakes from this premise; \
         Act II escalates with choices that logically follow; \
         Act III resolves the tension in a way that pays off the premise.",
        idea.title,
        idea.genre.to_lowercase(),
        idea.tone.to_lowercase(),
        idea.logline
    );

    PitchPack {
        title: idea.title.clone(),
        logline: idea.logline.clone(),
        synopsis,
        beat_sheet: TEMPLATE_BEAT_SHEET.iter().map(|s| s.to_string()).collect(),
        deck_outline: TEMPLATE_DECK_OUTLINE.iter().map(|s| s.to_string()).collect(),
    }
}

fn clamp_list(items: Option<Vec<Value>>, max: usize) -> Vec<String> {
    items
        .unwrap_or_default()
        .into_iter()
        .map(value_to_text)
        .take(max)
        .collect()
}

fn value_to_text(value: Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

fn non_empty_or(value: Option<String>, fallback: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
