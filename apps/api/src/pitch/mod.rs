// Pitch packaging: idea → synopsis, beat sheet, deck outline, quality report.
// All LLM calls go through llm_client; the template pack keeps the endpoint useful without a key.

pub mod generator;
pub mod handlers;
pub mod prompts;
pub mod quality;
pub mod store;
