pub mod pitch;
pub mod project;
pub mod stage;
