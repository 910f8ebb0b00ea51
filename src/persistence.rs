// Load/save hooks for the task store
// Collections are persisted independently as JSON arrays

use parking_lot::RwLock;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::Result;
use crate::models::{Project, Task};

pub const TASKS_FILE: &str = "tasks.json";
pub const PROJECTS_FILE: &str = "projects.json";

/// Where the store's collections live between sessions.
///
/// A load returning `Ok(None)` means nothing has been persisted yet, which is
/// different from an empty collection: projects fall back to the seed set only
/// in the `None` case.
pub trait Persistence: Send + Sync {
    fn loadTasks(&self) -> Result<Option<Vec<Task>>>;
    fn loadProjects(&self) -> Result<Option<Vec<Project>>>;
    fn saveTasks(&self, tasks: &[Task]) -> Result<()>;
    fn saveProjects(&self, projects: &[Project]) -> Result<()>;
}

// ============================================
// JSON FILES
// ============================================

/// `tasks.json` and `projects.json` inside a data directory
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn readCollection<T: DeserializeOwned>(&self, filename: &str) -> Result<Option<Vec<T>>> {
        let path = self.dir.join(filename);
        if !path.exists() {
            tracing::debug!("[JsonFileBackend] {:?} does not exist", path);
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let items: Vec<T> = serde_json::from_str(&content)?;
        tracing::debug!("[JsonFileBackend] Loaded {} items from {:?}", items.len(), path);
        Ok(Some(items))
    }

    fn writeCollection<T: Serialize>(&self, filename: &str, items: &[T]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        let tmp = self.dir.join(format!(".{}.tmp", filename));
        let json = serde_json::to_string_pretty(items)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

impl Persistence for JsonFileBackend {
    fn loadTasks(&self) -> Result<Option<Vec<Task>>> {
        self.readCollection(TASKS_FILE)
    }

    fn loadProjects(&self) -> Result<Option<Vec<Project>>> {
        self.readCollection(PROJECTS_FILE)
    }

    fn saveTasks(&self, tasks: &[Task]) -> Result<()> {
        self.writeCollection(TASKS_FILE, tasks)
    }

    fn saveProjects(&self, projects: &[Project]) -> Result<()> {
        self.writeCollection(PROJECTS_FILE, projects)
    }
}

// ============================================
// IN MEMORY
// ============================================

/// Keeps the serialized text in memory, so loads go through the same parsing as files
#[derive(Default)]
pub struct MemoryBackend {
    tasks: RwLock<Option<String>>,
    projects: RwLock<Option<String>>,
    taskSaves: AtomicUsize,
    projectSaves: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate with raw JSON, as if written by an earlier session
    pub fn withJson(tasks: Option<&str>, projects: Option<&str>) -> Self {
        Self {
            tasks: RwLock::new(tasks.map(str::to_string)),
            projects: RwLock::new(projects.map(str::to_string)),
            ..Default::default()
        }
    }

    pub fn tasksJson(&self) -> Option<String> {
        self.tasks.read().clone()
    }

    pub fn projectsJson(&self) -> Option<String> {
        self.projects.read().clone()
    }

    pub fn taskSaves(&self) -> usize {
        self.taskSaves.load(Ordering::SeqCst)
    }

    pub fn projectSaves(&self) -> usize {
        self.projectSaves.load(Ordering::SeqCst)
    }
}

fn parseSlot<T: DeserializeOwned>(slot: &RwLock<Option<String>>) -> Result<Option<Vec<T>>> {
    match slot.read().as_deref() {
        Some(json) => Ok(Some(serde_json::from_str(json)?)),
        None => Ok(None),
    }
}

impl Persistence for MemoryBackend {
    fn loadTasks(&self) -> Result<Option<Vec<Task>>> {
        parseSlot(&self.tasks)
    }

    fn loadProjects(&self) -> Result<Option<Vec<Project>>> {
        parseSlot(&self.projects)
    }

    fn saveTasks(&self, tasks: &[Task]) -> Result<()> {
        *self.tasks.write() = Some(serde_json::to_string(tasks)?);
        self.taskSaves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn saveProjects(&self, projects: &[Project]) -> Result<()> {
        *self.projects.write() = Some(serde_json::to_string(projects)?);
        self.projectSaves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// Lets a caller keep a handle on the backend it gave to the store
impl<P: Persistence + ?Sized> Persistence for std::sync::Arc<P> {
    fn loadTasks(&self) -> Result<Option<Vec<Task>>> {
        (**self).loadTasks()
    }

    fn loadProjects(&self) -> Result<Option<Vec<Project>>> {
        (**self).loadProjects()
    }

    fn saveTasks(&self, tasks: &[Task]) -> Result<()> {
        (**self).saveTasks(tasks)
    }

    fn saveProjects(&self, projects: &[Project]) -> Result<()> {
        (**self).saveProjects(projects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, TaskDraft};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn sampleTasks() -> Vec<Task> {
        let created = Utc.with_ymd_and_hms(2026, 5, 4, 8, 0, 0).unwrap();
        let mut draft = TaskDraft::new("Pay rent");
        draft.description = Some("Before the 5th".into());
        draft.priority = Priority::High;
        draft.dueDate = Some(Utc.with_ymd_and_hms(2026, 5, 5, 17, 0, 0).unwrap());
        draft.tags = vec!["home".into(), "money".into()];
        draft.projectId = Some("default".into());
        vec![
            Task::fromDraft("a".into(), created, draft),
            Task::fromDraft("b".into(), created, TaskDraft::new("Call mom")),
        ]
    }

    #[test]
    fn file_backend_reports_absent_collections() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path());
        assert!(backend.loadTasks().unwrap().is_none());
        assert!(backend.loadProjects().unwrap().is_none());
    }

    #[test]
    fn file_backend_round_trips_all_fields() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::new(dir.path().join("nested"));
        let tasks = sampleTasks();
        backend.saveTasks(&tasks).unwrap();
        backend.saveProjects(&Project::defaults()).unwrap();

        let loadedTasks = backend.loadTasks().unwrap().unwrap();
        assert_eq!(loadedTasks, tasks);
        assert_eq!(loadedTasks[0].dueDate, tasks[0].dueDate);
        assert_eq!(backend.loadProjects().unwrap().unwrap(), Project::defaults());
        assert!(!dir.path().join("nested").join(".tasks.json.tmp").exists());
    }

    #[test]
    fn file_backend_rejects_corrupt_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(TASKS_FILE), "not json").unwrap();
        let backend = JsonFileBackend::new(dir.path());
        assert!(backend.loadTasks().is_err());
    }

    #[test]
    fn memory_backend_round_trips_through_text() {
        let backend = MemoryBackend::new();
        let tasks = sampleTasks();
        backend.saveTasks(&tasks).unwrap();
        assert!(backend.tasksJson().unwrap().contains("\"dueDate\":\"2026-05-05T17:00:00Z\""));
        assert_eq!(backend.loadTasks().unwrap().unwrap(), tasks);
        assert_eq!(backend.taskSaves(), 1);
        assert_eq!(backend.projectSaves(), 0);
    }
}
