// Task commands - validation boundary above the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Priority, Task, TaskDraft, normalizeTags};
use crate::query::{TaskQuery, TaskView, searchTasks as searchInTasks};
use crate::storage::StorageState;
use crate::store::{TaskStore, Toggle};
use super::common::{cleanDescription, cleanProjectId, parseDueDate, parsePriority, requireTitle};

#[derive(Debug, Clone, Serialize)]
pub struct TaskInfo {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub priority: Priority,
    pub dueDate: Option<DateTime<Utc>>,
    pub createdAt: DateTime<Utc>,
    pub tags: Vec<String>,
    pub projectId: Option<String>,
    pub projectName: Option<String>,
    pub projectColor: Option<String>,
    pub isOverdue: bool,
}

impl TaskInfo {
    /// Decorate with the referenced project, if it still exists
    pub fn build(t: &Task, store: &TaskStore, now: DateTime<Utc>) -> Self {
        let project = t.projectId.as_deref().and_then(|id| store.getProjectById(id));
        Self {
            id: t.id.clone(),
            title: t.title.clone(),
            description: t.description.clone(),
            completed: t.completed,
            priority: t.priority,
            dueDate: t.dueDate,
            createdAt: t.createdAt,
            tags: t.tags.clone(),
            projectId: t.projectId.clone(),
            projectName: project.map(|p| p.name.clone()),
            projectColor: project.map(|p| p.color.clone()),
            isOverdue: t.isOverdue(now),
        }
    }
}

pub(crate) fn infoList<'a>(tasks: impl IntoIterator<Item = &'a Task>, store: &TaskStore) -> Vec<TaskInfo> {
    let now = Utc::now();
    tasks.into_iter().map(|t| TaskInfo::build(t, store, now)).collect()
}

#[derive(Debug, Default, Deserialize)]
pub struct TasksFilterInput {
    pub search: Option<String>,
    /// all | pending | completed
    pub view: Option<String>,
    pub priority: Option<String>,
    pub projectId: Option<String>,
    pub tag: Option<String>,
}

pub fn getTasks(storage: &StorageState, input: TasksFilterInput) -> Result<Vec<TaskInfo>, String> {
    tracing::debug!("[getTasks] Called with {:?}", input);

    let view = match input.view.as_deref() {
        Some(v) if !v.trim().is_empty() => TaskView::fromName(v).ok_or_else(|| format!("Invalid view: {}", v))?,
        _ => TaskView::All,
    };
    let query = TaskQuery {
        search: input.search,
        view,
        priority: parsePriority(input.priority.as_deref())?,
        projectId: cleanProjectId(input.projectId),
    };

    let store = storage.store.read();
    let tasks = query
        .apply(store.tasks())
        .into_iter()
        .filter(|t| input.tag.as_deref().is_none_or(|tag| t.hasTag(tag)));
    Ok(infoList(tasks, &store))
}

pub fn getTaskById(storage: &StorageState, id: &str) -> Option<TaskInfo> {
    let store = storage.store.read();
    store.getTaskById(id).map(|t| TaskInfo::build(t, &store, Utc::now()))
}

pub fn searchTasks(storage: &StorageState, query: &str) -> Vec<TaskInfo> {
    let store = storage.store.read();
    infoList(searchInTasks(store.tasks(), query), &store)
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    /// RFC 3339 timestamp or YYYY-MM-DD
    pub dueDate: Option<String>,
    pub tags: Option<Vec<String>>,
    pub projectId: Option<String>,
}

pub fn createTask(storage: &StorageState, input: CreateTaskInput) -> Result<TaskInfo, String> {
    let title = requireTitle(&input.title)?;
    let dueDate = input.dueDate.as_deref().map(parseDueDate).transpose()?;

    let draft = TaskDraft {
        title,
        description: cleanDescription(input.description),
        completed: false,
        priority: parsePriority(input.priority.as_deref())?.unwrap_or_default(),
        dueDate,
        tags: normalizeTags(input.tags.unwrap_or_default()),
        projectId: cleanProjectId(input.projectId),
    };

    let mut store = storage.store.write();
    let task = store.addTask(draft);
    Ok(TaskInfo::build(&task, &store, Utc::now()))
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskInput {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub priority: Option<String>,
    /// Empty string clears the due date
    pub dueDate: Option<String>,
    pub tags: Option<Vec<String>>,
    /// Empty string or "none" unassigns the task
    pub projectId: Option<String>,
}

pub fn updateTask(storage: &StorageState, input: UpdateTaskInput) -> Result<TaskInfo, String> {
    let mut store = storage.store.write();
    let mut task = store.getTaskById(&input.id).cloned().ok_or("Task not found")?;

    if let Some(title) = input.title {
        task.title = requireTitle(&title)?;
    }
    if let Some(description) = input.description {
        task.description = cleanDescription(Some(description));
    }
    if let Some(completed) = input.completed {
        task.completed = completed;
    }
    if let Some(priority) = parsePriority(input.priority.as_deref())? {
        task.priority = priority;
    }
    if let Some(due) = input.dueDate {
        task.dueDate = if due.trim().is_empty() { None } else { Some(parseDueDate(&due)?) };
    }
    if let Some(tags) = input.tags {
        task.tags = tags;
    }
    if input.projectId.is_some() {
        task.projectId = cleanProjectId(input.projectId);
    }

    let id = task.id.clone();
    store.updateTask(task);
    let updated = store.getTaskById(&id).ok_or("Task not found")?;
    Ok(TaskInfo::build(updated, &store, Utc::now()))
}

pub fn deleteTask(storage: &StorageState, id: &str) -> Result<(), String> {
    tracing::debug!("[deleteTask] Called with id: {}", id);
    if storage.store.write().deleteTask(id) {
        Ok(())
    } else {
        Err("Task not found".to_string())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleInfo {
    pub id: String,
    pub completed: bool,
    /// Only set when the task went from open to completed
    pub message: Option<String>,
}

pub fn toggleTask(storage: &StorageState, id: &str) -> Result<ToggleInfo, String> {
    let toggle = storage.store.write().toggleTaskCompletion(id).ok_or("Task not found")?;
    Ok(ToggleInfo {
        id: id.to_string(),
        completed: toggle == Toggle::Completed,
        message: (toggle == Toggle::Completed).then(|| "Task completed! 🎉".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Settings;
    use crate::persistence::MemoryBackend;
    use crate::storage::Storage;
    use std::sync::Arc;

    fn storage() -> StorageState {
        Arc::new(Storage::withBackend(Settings::default(), Box::new(MemoryBackend::new())))
    }

    fn create(storage: &StorageState, title: &str) -> TaskInfo {
        createTask(storage, CreateTaskInput { title: title.into(), ..Default::default() }).unwrap()
    }

    #[test]
    fn create_rejects_blank_title() {
        let storage = storage();
        let err = createTask(&storage, CreateTaskInput { title: "  ".into(), ..Default::default() }).unwrap_err();
        assert_eq!(err, "Title is required");
        assert!(storage.store.read().tasks().is_empty());
    }

    #[test]
    fn create_decorates_with_project() {
        let storage = storage();
        let info = createTask(
            &storage,
            CreateTaskInput {
                title: " Standup ".into(),
                priority: Some("high".into()),
                dueDate: Some("2020-01-01".into()),
                tags: Some(vec!["daily".into(), "daily".into()]),
                projectId: Some("work".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(info.title, "Standup");
        assert_eq!(info.priority, Priority::High);
        assert_eq!(info.tags, vec!["daily"]);
        assert_eq!(info.projectName.as_deref(), Some("Work"));
        assert!(info.isOverdue);
    }

    #[test]
    fn dangling_project_is_not_decorated() {
        let storage = storage();
        let info = createTask(
            &storage,
            CreateTaskInput { title: "Orphan".into(), projectId: Some("gone".into()), ..Default::default() },
        )
        .unwrap();
        assert_eq!(info.projectId.as_deref(), Some("gone"));
        assert!(info.projectName.is_none());
    }

    #[test]
    fn update_patches_only_given_fields() {
        let storage = storage();
        let created = create(&storage, "Draft");
        let updated = updateTask(
            &storage,
            UpdateTaskInput {
                id: created.id.clone(),
                description: Some("More detail".into()),
                projectId: Some("none".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(updated.title, "Draft");
        assert_eq!(updated.description.as_deref(), Some("More detail"));
        assert_eq!(updated.createdAt, created.createdAt);
        assert!(updated.projectId.is_none());
    }

    #[test]
    fn unknown_ids_are_reported() {
        let storage = storage();
        assert_eq!(
            updateTask(&storage, UpdateTaskInput { id: "x".into(), ..Default::default() }).unwrap_err(),
            "Task not found"
        );
        assert!(deleteTask(&storage, "x").is_err());
        assert!(toggleTask(&storage, "x").is_err());
    }

    #[test]
    fn toggle_announces_completion_only() {
        let storage = storage();
        let task = create(&storage, "Ship it");
        let first = toggleTask(&storage, &task.id).unwrap();
        assert!(first.completed);
        assert!(first.message.is_some());
        let second = toggleTask(&storage, &task.id).unwrap();
        assert!(!second.completed);
        assert!(second.message.is_none());
    }

    #[test]
    fn get_tasks_applies_filters() {
        let storage = storage();
        let a = create(&storage, "Buy milk");
        create(&storage, "Write essay");
        toggleTask(&storage, &a.id).unwrap();

        let pending = getTasks(&storage, TasksFilterInput { view: Some("pending".into()), ..Default::default() }).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].title, "Write essay");

        let found = getTasks(&storage, TasksFilterInput { search: Some("MILK".into()), ..Default::default() }).unwrap();
        assert_eq!(found.len(), 1);
        assert!(getTasks(&storage, TasksFilterInput { view: Some("later".into()), ..Default::default() }).is_err());
        assert_eq!(searchTasks(&storage, "essay").len(), 1);
    }
}
