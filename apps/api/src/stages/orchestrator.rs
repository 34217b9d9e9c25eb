//! Stage drafting: turns a project and the previous approval into candidate drafts.
//!
//! Flow: build prompt → up to MAX_CANDIDATE_CALLS identical LLM calls → parse options
//! → number candidates. Without an API key, placeholder candidates are returned instead.

use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::prompts::system_prompt;
use crate::llm_client::{parse_json_loose, ChatOptions, Engine, LlmClient};
use crate::models::project::ProjectRow;
use crate::models::stage::Candidate;
use crate::projects::models::non_blank;
use crate::stages::prompts::{stage_template, STAGE_ROLE};
use crate::stages::stage::Stage;

pub const CANDIDATES_PER_STAGE: usize = 3;
const MAX_CANDIDATE_CALLS: usize = 3;
const STAGE_TEMPERATURE: f32 = 0.9;
const DEFAULT_LANGUAGE: &str = "en";

#[derive(Debug, Deserialize)]
struct OptionsEnvelope {
    options: Vec<DraftOption>,
}

#[derive(Debug, Deserialize)]
struct DraftOption {
    #[serde(default)]
    label: Option<String>,
    text: String,
}

/// What a stage approval records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovedDraft {
    pub candidate_id: String,
    pub text: String,
    pub edited: bool,
}

/// Stages after the outline build on the previous stage's approved text;
/// generating one before that approval exists is a conflict.
pub fn previous_approved_text(
    stage: Stage,
    previous_approval: Option<String>,
) -> Result<String, AppError> {
    match stage.previous() {
        None => Ok(String::new()),
        Some(previous) => previous_approval.ok_or_else(|| {
            AppError::Conflict(format!(
                "Approve the {previous} stage before generating {stage}"
            ))
        }),
    }
}

/// Looks `chosen_id` up in the latest candidate set only. Non-blank edits
/// replace the candidate's text.
pub fn approve_candidate(
    latest: &[Candidate],
    chosen_id: &str,
    edits: Option<String>,
) -> Result<ApprovedDraft, AppError> {
    let chosen = latest
        .iter()
        .find(|c| c.id == chosen_id)
        .ok_or_else(|| AppError::NotFound(format!("Candidate {chosen_id} not found")))?;

    let edits = non_blank(edits);
    Ok(ApprovedDraft {
        candidate_id: chosen.id.clone(),
        edited: edits.is_some(),
        text: edits.unwrap_or_else(|| chosen.text.clone()),
    })
}

/// Fills the stage template from the project, the approved text of the previous stage
/// and an optional user tweak.
pub fn build_stage_prompt(
    stage: Stage,
    project: &ProjectRow,
    approved_text: &str,
    tweak: Option<&str>,
) -> String {
    let tweak_line = tweak
        .map(|t| format!("User tweak: {t}"))
        .unwrap_or_default();
    fill_template(
        &stage_template(stage),
        &[
            ("title", project.title.as_str()),
            ("logline", project.logline.as_str()),
            ("genre", project.genre.as_deref().unwrap_or("")),
            (
                "language",
                project.language.as_deref().unwrap_or(DEFAULT_LANGUAGE),
            ),
            ("approved_text", approved_text),
            ("tweak", tweak_line.as_str()),
        ],
    )
}

/// Calls the LLM until three candidates are collected or the call budget runs out.
pub async fn generate_candidates(
    llm: &LlmClient,
    prompt: &str,
    engine: Engine,
) -> Result<Vec<Candidate>, AppError> {
    let system = system_prompt(STAGE_ROLE, false);
    let options = ChatOptions {
        model: engine.model(),
        temperature: STAGE_TEMPERATURE,
        json_mode: true,
    };

    let mut candidates: Vec<Candidate> = Vec::with_capacity(CANDIDATES_PER_STAGE);

    for attempt in 1..=MAX_CANDIDATE_CALLS {
        let text = match llm.call(prompt, &system, options).await {
            Ok(text) => text,
            Err(e) if candidates.is_empty() => {
                return Err(AppError::Llm(format!("Stage generation failed: {e}")));
            }
            Err(e) => {
                warn!(
                    "Stage call {attempt}/{MAX_CANDIDATE_CALLS} failed, keeping {} candidates: {e}",
                    candidates.len()
                );
                break;
            }
        };

        let room = CANDIDATES_PER_STAGE - candidates.len();
        for (label, body) in parse_options(&text).into_iter().take(room) {
            let n = candidates.len() + 1;
            candidates.push(Candidate {
                id: candidate_id(n),
                text: body,
                meta: candidate_meta(label, engine),
            });
        }

        if candidates.len() >= CANDIDATES_PER_STAGE {
            break;
        }
        info!(
            "Stage call {attempt}/{MAX_CANDIDATE_CALLS} yielded {} of {CANDIDATES_PER_STAGE} candidates",
            candidates.len()
        );
    }

    if candidates.is_empty() {
        return Err(AppError::Llm(
            "Stage generation returned no usable options".to_string(),
        ));
    }
    Ok(candidates)
}

/// Candidates returned when no LLM key is configured. `engine` is echoed as the
/// caller sent it, defaulting to the mini model's name.
pub fn placeholder_candidates(
    stage: Stage,
    engine: Option<&str>,
    tweak: Option<&str>,
) -> Vec<Candidate> {
    let engine = engine
        .filter(|e| !e.is_empty())
        .unwrap_or(Engine::Gpt5Mini.model());
    let base = format!("[{}] engine={engine}", stage.as_str().to_uppercase());
    let steer = tweak.map(|t| format!(" | tweak: {t}")).unwrap_or_default();
    ["A", "B", "C"]
        .iter()
        .enumerate()
        .map(|(i, letter)| Candidate {
            id: format!("c{}", i + 1),
            text: format!("{base} — Option {letter}{steer}"),
            meta: Map::new(),
        })
        .collect()
}

/// Reads `{"options": [...]}` JSON, falling back to blank-line separated paragraphs.
fn parse_options(text: &str) -> Vec<(Option<String>, String)> {
    if let Ok(envelope) = parse_json_loose::<OptionsEnvelope>(text) {
        let options: Vec<_> = envelope
            .options
            .into_iter()
            .map(|o| (o.label, o.text.trim().to_string()))
            .filter(|(_, t)| !t.is_empty())
            .collect();
        if !options.is_empty() {
            return options;
        }
    }

    split_paragraphs(text)
        .into_iter()
        .map(|p| (None, p))
        .collect()
}

fn split_paragraphs(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn candidate_id(n: usize) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("opt{n}-{}", &suffix[..6])
}

fn candidate_meta(label: Option<String>, engine: Engine) -> Map<String, Value> {
    let mut meta = Map::new();
    meta.insert("engine".to_string(), json!(engine.model()));
    if let Some(label) = label.filter(|l| !l.trim().is_empty()) {
        meta.insert("label".to_string(), json!(label.trim()));
    }
    meta
}

/// Single-pass `{key}` substitution. Values are never re-scanned, so user text
/// containing braces is inserted verbatim.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replacement = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match replacement {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use axum::{http::StatusCode, routing::post, Json, Router};
    use chrono::Utc;
    use tokio::net::TcpListener;

    fn project(language: Option<&str>) -> ProjectRow {
        ProjectRow {
            id: Uuid::new_v4(),
            owner_uid: "uid-1".to_string(),
            title: "Dhuaan".to_string(),
            logline: "A Mumbai fireman hides that he started the fire he is famous for stopping."
                .to_string(),
            genre: Some("Thriller".to_string()),
            tone: None,
            creator_name: None,
            language: language.map(str::to_string),
            stage: "outline".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_outline_prompt_interpolates_project() {
        let prompt = build_stage_prompt(Stage::Outline, &project(Some("Hindi")), "", None);
        assert!(prompt.contains("Title: Dhuaan"));
        assert!(prompt.contains("Genre: Thriller, Language: Hindi"));
        assert!(prompt.contains("culturally authentic for Hindi"));
        assert!(!prompt.contains("User tweak"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_language_defaults_to_en() {
        let prompt = build_stage_prompt(Stage::Dialogue, &project(None), "INT. STATION", None);
        assert!(prompt.contains("Keep the language en"));
    }

    #[test]
    fn test_prompt_includes_approved_text_and_tweak() {
        let prompt = build_stage_prompt(
            Stage::Onepager,
            &project(None),
            "Act I: the fire.",
            Some("more monsoon"),
        );
        assert!(prompt.contains("Approved outline:\nAct I: the fire."));
        assert!(prompt.contains("User tweak: more monsoon"));
    }

    #[test]
    fn test_fill_template_does_not_rescan_values() {
        let filled = fill_template("{a} and {b}", &[("a", "{b}"), ("b", "x")]);
        assert_eq!(filled, "{b} and x");
    }

    #[test]
    fn test_fill_template_keeps_unknown_placeholders() {
        assert_eq!(fill_template("{json} {a}", &[("a", "1")]), "{json} 1");
        assert_eq!(fill_template("open { only", &[]), "open { only");
    }

    #[test]
    fn test_parse_options_json() {
        let text = r#"{"options":[{"label":"Grounded","text":"Option one"},{"label":"Pulpy","text":"Option two"}]}"#;
        let options = parse_options(text);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0], (Some("Grounded".to_string()), "Option one".to_string()));
    }

    #[test]
    fn test_parse_options_paragraph_fallback() {
        let text = "First idea.\n\n\n  Second idea.  \r\n\r\nThird idea.\n\nFourth idea.";
        let options = parse_options(text);
        let bodies: Vec<_> = options.iter().map(|(_, t)| t.as_str()).collect();
        assert_eq!(
            bodies,
            vec!["First idea.", "Second idea.", "Third idea.", "Fourth idea."]
        );
        assert!(options.iter().all(|(label, _)| label.is_none()));
    }

    #[test]
    fn test_parse_options_empty_json_falls_back() {
        let options = parse_options(r#"{"options": []}"#);
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn test_candidate_id_shape() {
        let id = candidate_id(2);
        assert!(id.starts_with("opt2-"));
        assert_eq!(id.len(), "opt2-".len() + 6);
        assert!(id["opt2-".len()..].chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_placeholder_candidates() {
        let candidates = placeholder_candidates(Stage::Outline, None, Some("darker"));
        assert_eq!(candidates.len(), 3);
        assert_eq!(candidates[0].id, "c1");
        assert_eq!(
            candidates[1].text,
            "[OUTLINE] engine=gpt-5-mini — Option B | tweak: darker"
        );
    }

    #[test]
    fn test_placeholder_echoes_requested_engine() {
        let candidates = placeholder_candidates(Stage::Script, Some("claude"), None);
        assert_eq!(candidates[2].text, "[SCRIPT] engine=claude — Option C");
        let blank = placeholder_candidates(Stage::Script, Some(""), None);
        assert_eq!(blank[0].text, "[SCRIPT] engine=gpt-5-mini — Option A");
    }

    fn candidate(id: &str, text: &str) -> Candidate {
        Candidate {
            id: id.to_string(),
            text: text.to_string(),
            meta: Map::new(),
        }
    }

    #[test]
    fn test_outline_needs_no_previous_approval() {
        assert_eq!(previous_approved_text(Stage::Outline, None).unwrap(), "");
    }

    #[test]
    fn test_later_stage_without_previous_approval_conflicts() {
        match previous_approved_text(Stage::Screenplay, None) {
            Err(AppError::Conflict(msg)) => {
                assert_eq!(msg, "Approve the onepager stage before generating screenplay")
            }
            other => panic!("unexpected result: {other:?}"),
        }
        let text =
            previous_approved_text(Stage::Screenplay, Some("One page.".to_string())).unwrap();
        assert_eq!(text, "One page.");
    }

    #[test]
    fn test_approve_candidate_uses_candidate_text() {
        let latest = [candidate("opt1-aaaaaa", "First"), candidate("opt2-bbbbbb", "Second")];
        let draft = approve_candidate(&latest, "opt2-bbbbbb", Some("   ".to_string())).unwrap();
        assert_eq!(
            draft,
            ApprovedDraft {
                candidate_id: "opt2-bbbbbb".to_string(),
                text: "Second".to_string(),
                edited: false,
            }
        );
    }

    #[test]
    fn test_approve_candidate_edits_replace_text() {
        let latest = [candidate("c1", "[OUTLINE] engine=gpt-5 — Option A")];
        let draft = approve_candidate(&latest, "c1", Some("  My own outline. ".to_string())).unwrap();
        assert_eq!(draft.text, "My own outline.");
        assert!(draft.edited);
    }

    #[test]
    fn test_approve_candidate_ignores_older_sets() {
        // An id from an earlier generation is not in the latest set.
        let latest = [candidate("opt1-cccccc", "Newest")];
        match approve_candidate(&latest, "opt1-aaaaaa", None) {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Candidate opt1-aaaaaa not found"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    /// Serves scripted chat-completion replies in order, then 500s. Returns the
    /// base URL and a call counter.
    async fn spawn_chat_stub(replies: Vec<String>) -> (String, Arc<AtomicUsize>) {
        let replies = Arc::new(Mutex::new(VecDeque::from(replies)));
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let app = Router::new().route(
            "/chat/completions",
            post(move || {
                let replies = replies.clone();
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    let reply = replies.lock().unwrap().pop_front();
                    match reply {
                        Some(content) => (
                            StatusCode::OK,
                            Json(json!({"choices": [{"message": {"content": content}}]})),
                        ),
                        None => (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            Json(json!({"error": {"message": "upstream unavailable"}})),
                        ),
                    }
                }
            }),
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}"), calls)
    }

    fn options_reply(texts: &[&str]) -> String {
        let options: Vec<Value> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| json!({"label": format!("Take {}", i + 1), "text": t}))
            .collect();
        json!({ "options": options }).to_string()
    }

    #[tokio::test]
    async fn test_generate_candidates_calls_until_three() {
        let (base_url, calls) = spawn_chat_stub(vec![
            options_reply(&["One"]),
            options_reply(&["Two"]),
            options_reply(&["Three"]),
            options_reply(&["Never requested"]),
        ])
        .await;
        let llm = LlmClient::new(Some("test-key".to_string()), base_url);

        let candidates = generate_candidates(&llm, "prompt", Engine::Gpt5).await.unwrap();

        let texts: Vec<_> = candidates.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["One", "Two", "Three"]);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(candidates[2].id.starts_with("opt3-"));
        assert_eq!(candidates[0].meta["engine"], "gpt-5");
    }

    #[tokio::test]
    async fn test_generate_candidates_trims_extras_across_calls() {
        let (base_url, calls) = spawn_chat_stub(vec![
            options_reply(&["One", "Two"]),
            options_reply(&["Three", "Four"]),
        ])
        .await;
        let llm = LlmClient::new(Some("test-key".to_string()), base_url);

        let candidates = generate_candidates(&llm, "prompt", Engine::Gpt5Mini)
            .await
            .unwrap();

        let texts: Vec<_> = candidates.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["One", "Two", "Three"]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(candidates[2].meta["label"], "Take 1");
    }

    #[tokio::test]
    async fn test_generate_candidates_keeps_partial_set_when_later_call_fails() {
        let (base_url, calls) = spawn_chat_stub(vec![options_reply(&["Only one"])]).await;
        let llm = LlmClient::new(Some("test-key".to_string()), base_url);

        let candidates = generate_candidates(&llm, "prompt", Engine::Gpt5Mini)
            .await
            .unwrap();

        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].text, "Only one");
        // One success, then the second call exhausts its retries.
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_generate_candidates_without_key_is_llm_error() {
        let llm = LlmClient::new(None, "http://localhost:9");
        let result = generate_candidates(&llm, "prompt", Engine::Gpt5).await;
        assert!(matches!(result, Err(AppError::Llm(_))));
    }
}
