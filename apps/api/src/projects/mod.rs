// Projects: the owned container for staged drafts.
// Ownership is enforced in every query; a foreign project is indistinguishable from a missing one.

pub mod handlers;
pub mod models;
pub mod snapshot;
pub mod store;
