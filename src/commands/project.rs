// Project commands

use serde::{Deserialize, Serialize};

use crate::storage::StorageState;

#[derive(Debug, Clone, Serialize)]
pub struct ProjectInfo {
    pub id: String,
    pub name: String,
    pub color: String,
    pub taskCount: usize,
}

pub fn getProjects(storage: &StorageState) -> Vec<ProjectInfo> {
    let store = storage.store.read();
    store
        .projects()
        .iter()
        .map(|p| ProjectInfo {
            id: p.id.clone(),
            name: p.name.clone(),
            color: p.color.clone(),
            taskCount: store.getTasksByProject(Some(&p.id)).len(),
        })
        .collect()
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateProjectInput {
    pub name: String,
    pub color: Option<String>,
}

pub fn createProject(storage: &StorageState, input: CreateProjectInput) -> Result<ProjectInfo, String> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err("Project name is required".to_string());
    }
    let color = input
        .color
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| storage.effectiveSettings().defaultProjectColor);

    let project = storage.store.write().addProject(name, &color);
    Ok(ProjectInfo {
        id: project.id,
        name: project.name,
        color: project.color,
        taskCount: 0,
    })
}

/// Tasks in the project keep their projectId
pub fn deleteProject(storage: &StorageState, id: &str) -> Result<(), String> {
    if storage.store.write().deleteProject(id) {
        Ok(())
    } else {
        Err("Project not found".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::task::{CreateTaskInput, createTask, getTaskById};
    use crate::models::{Settings, DEFAULT_PROJECT_COLOR};
    use crate::persistence::MemoryBackend;
    use crate::storage::Storage;
    use std::sync::Arc;

    fn storage() -> StorageState {
        Arc::new(Storage::withBackend(Settings::default(), Box::new(MemoryBackend::new())))
    }

    #[test]
    fn create_trims_name_and_defaults_color() {
        let storage = storage();
        let project = createProject(&storage, CreateProjectInput { name: "  Side gig ".into(), color: None }).unwrap();
        assert_eq!(project.name, "Side gig");
        assert_eq!(project.color, DEFAULT_PROJECT_COLOR);
        assert!(createProject(&storage, CreateProjectInput { name: " ".into(), color: None }).is_err());
        assert_eq!(getProjects(&storage).len(), 3);
    }

    #[test]
    fn delete_keeps_task_reference() {
        let storage = storage();
        let task = createTask(
            &storage,
            CreateTaskInput { title: "Report".into(), projectId: Some("work".into()), ..Default::default() },
        )
        .unwrap();
        assert_eq!(getProjects(&storage)[1].taskCount, 1);

        deleteProject(&storage, "work").unwrap();
        let after = getTaskById(&storage, &task.id).unwrap();
        assert_eq!(after.projectId.as_deref(), Some("work"));
        assert!(after.projectName.is_none());
        assert!(deleteProject(&storage, "work").is_err());
    }
}
