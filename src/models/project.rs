// Project model

use serde::{Deserialize, Serialize};

pub const DEFAULT_PROJECT_COLOR: &str = "#8B5CF6";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    /// Any text; only used for UI tagging
    pub color: String,
}

impl Project {
    /// Seed set used when nothing has been persisted yet
    pub fn defaults() -> Vec<Project> {
        vec![
            Project {
                id: "default".to_string(),
                name: "Personal".to_string(),
                color: DEFAULT_PROJECT_COLOR.to_string(),
            },
            Project {
                id: "work".to_string(),
                name: "Work".to_string(),
                color: "#0EA5E9".to_string(),
            },
        ]
    }
}
