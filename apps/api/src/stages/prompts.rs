// All LLM prompt constants for staged drafting.

use crate::stages::stage::Stage;

/// Role line for the writer-room system prompt. Composed with the shared fragments.
pub const STAGE_ROLE: &str = "You are Manthan's writer-room engine. \
    Write in the user's language and always offer three concise, distinct options, \
    each with a short label. \
    Return a JSON object of the form {\"options\": [{\"label\": \"...\", \"text\": \"...\"}]}.";

/// Shared header for every stage. Replace: {title}, {logline}, {genre}, {language}, {tweak}
const PROJECT_HEADER: &str = "Title: {title}
Logline: {logline}
Genre: {genre}, Language: {language}
{tweak}";

const OUTLINE_TASK: &str = "Task: Produce three different high-level story outlines \
(Acts I-III with 6-10 beats in total). Each option must feel culturally authentic for \
{language}. Avoid generic phrasing.";

const ONEPAGER_TASK: &str = "Approved outline:
{approved_text}

Task: Write three distinct one-page treatments (400 words or fewer). Keep the {genre} tone.";

const SCREENPLAY_TASK: &str = "Approved one-pager:
{approved_text}

Task: Generate three alternative scene-beat breakdowns for a pilot or feature (12-18 beats).";

const SCRIPT_TASK: &str = "Approved scene beats:
{approved_text}

Task: Produce three versions of the opening script pages in industry format \
(INT./EXT. sluglines, character cues).";

const DIALOGUE_TASK: &str = "Approved script segment:
{approved_text}

Task: Offer three dialogue passes: (A) grounded, (B) heightened or comic, \
(C) rich in regional colloquialisms. Keep the language {language}.";

pub fn task_template(stage: Stage) -> &'static str {
    match stage {
        Stage::Outline => OUTLINE_TASK,
        Stage::Onepager => ONEPAGER_TASK,
        Stage::Screenplay => SCREENPLAY_TASK,
        Stage::Script => SCRIPT_TASK,
        Stage::Dialogue => DIALOGUE_TASK,
    }
}

pub fn stage_template(stage: Stage) -> String {
    format!("{PROJECT_HEADER}\n\n{}", task_template(stage))
}
