// Cross-cutting prompt fragments. Each generator keeps its own prompts.rs
// alongside it and composes these where needed.

/// Appended to system prompts whose caller parses the reply as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Voice shared by every creative generator.
pub const CULTURAL_GROUNDING: &str = "Write culturally specific, buyer-ready material \
    for Indian film and series (Hindi, Tamil, Telugu and beyond). \
    Stay tightly grounded in the given title and logline; avoid generic boilerplate.";

/// Joins a role line with the shared fragments into one system prompt.
pub fn system_prompt(role: &str, json_only: bool) -> String {
    let mut prompt = format!("{role} {CULTURAL_GROUNDING}");
    if json_only {
        prompt.push(' ');
        prompt.push_str(JSON_ONLY_INSTRUCTION);
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_appends_json_instruction() {
        let prompt = system_prompt("You are a packaging agent.", true);
        assert!(prompt.starts_with("You are a packaging agent."));
        assert!(prompt.ends_with(JSON_ONLY_INSTRUCTION));
    }

    #[test]
    fn test_system_prompt_without_json() {
        let prompt = system_prompt("You are a writer.", false);
        assert!(!prompt.contains("valid JSON"));
        assert!(prompt.contains(CULTURAL_GROUNDING));
    }
}
