// All LLM prompt constants for pitch packaging.

/// Role line for the packaging system prompt. Composed with the shared fragments.
pub const PACKAGING_ROLE: &str = "You are the Packaging Agent for Project Manthan.";

/// Pitch prompt template. Replace `{input_json}` before sending.
pub const PITCH_PROMPT_TEMPLATE: &str = r#"Return ONLY a JSON object with this EXACT schema:
{
  "title": "string",
  "logline": "string",
  "synopsis": "200-300 words",
  "beat_sheet": ["exactly 10 beats"],
  "deck_outline": ["exactly 8 deck sections"]
}

Every beat must logically pay off the precise premise in the logline.
Prefer Indian settings and tone.

INPUT:
{input_json}"#;

/// Beats used when the model is unavailable or returns an unusable pack.
pub const TEMPLATE_BEAT_SHEET: [&str; 10] = [
    "Opening Image — show the world implied by the logline.",
    "Theme Stated — a line tied to the inner conflict.",
    "Catalyst — inciting event that activates the premise.",
    "Debate — the cost of engaging the premise.",
    "Break into Two — decisive step that embodies the premise.",
    "Midpoint — reversal or reveal that reframes the stakes.",
    "Bad Guys Close In — pressure tied to the premise.",
    "All Is Lost — the premise appears unwinnable.",
    "Break into Three — insight earned from contradictions.",
    "Finale — specific payoff rooted in the logline.",
];

pub const TEMPLATE_DECK_OUTLINE: [&str; 8] = [
    "Cover: Title & logline (premise-centered).",
    "Overview: Why now (market and audience in India).",
    "World & Characters: 3-5 leads with premise-tied arcs.",
    "Story: 1-page synopsis referencing the logline.",
    "Beat Board: The 10 beats above.",
    "Lookbook: Visual references (India-specific).",
    "Market & Comps: Relevant Indian films and OTT titles.",
    "Team & Next Steps: Attachments, timeline, budget.",
];
