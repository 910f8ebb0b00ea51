// Models module for Taskdeck
// All fields use camelCase for consistency

pub mod common;
pub mod config;
pub mod project;
pub mod stats;
pub mod task;

pub use common::{Priority, normalizeTags};
pub use config::{Settings, SettingsOverride};
pub use project::{Project, DEFAULT_PROJECT_COLOR};
pub use stats::TaskStats;
pub use task::{Task, TaskDraft};
