// Staged drafting: outline → one-pager → screenplay → script → dialogue.
// All LLM calls go through llm_client; candidate sets and approvals are append-only.

pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod stage;
pub mod store;
