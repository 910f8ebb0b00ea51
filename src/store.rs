// In-memory task store
// Sole writer of the task and project collections; every mutation is followed by a save

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{normalizeTags, Priority, Project, Task, TaskDraft, TaskStats};
use crate::persistence::Persistence;
use crate::query;

/// Generate new UUID
pub fn newId() -> String {
    Uuid::new_v4().to_string()
}

/// Outcome of flipping a task's completion flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// false -> true
    Completed,
    /// true -> false
    Reopened,
}

pub struct TaskStore {
    tasks: Vec<Task>,
    projects: Vec<Project>,
    backend: Box<dyn Persistence>,
}

impl TaskStore {
    /// Hydrate from the load hook. Absent tasks start empty, absent projects get the seed set.
    pub fn load(backend: Box<dyn Persistence>) -> Self {
        let tasks = match backend.loadTasks() {
            Ok(Some(tasks)) => tasks,
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!("[TaskStore::load] Failed to load tasks, starting empty: {}", e);
                Vec::new()
            }
        };
        let projects = match backend.loadProjects() {
            Ok(Some(projects)) => projects,
            Ok(None) => {
                tracing::info!("[TaskStore::load] No saved projects, seeding defaults");
                Project::defaults()
            }
            Err(e) => {
                tracing::warn!("[TaskStore::load] Failed to load projects, using defaults: {}", e);
                Project::defaults()
            }
        };
        tracing::info!("[TaskStore::load] Loaded {} tasks and {} projects", tasks.len(), projects.len());

        Self { tasks, projects, backend }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    // ============================================
    // PERSISTENCE
    // ============================================

    // Save failures never undo the in-memory change
    fn persistTasks(&self) {
        if let Err(e) = self.backend.saveTasks(&self.tasks) {
            tracing::error!("[TaskStore] Failed to save tasks: {}", e);
        }
    }

    fn persistProjects(&self) {
        if let Err(e) = self.backend.saveProjects(&self.projects) {
            tracing::error!("[TaskStore] Failed to save projects: {}", e);
        }
    }

    // ============================================
    // TASK MUTATIONS
    // ============================================

    /// Append a new task. The draft is not validated here.
    pub fn addTask(&mut self, draft: TaskDraft) -> Task {
        self.addTaskAt(draft, Utc::now())
    }

    pub(crate) fn addTaskAt(&mut self, mut draft: TaskDraft, now: DateTime<Utc>) -> Task {
        draft.tags = normalizeTags(&draft.tags);
        let task = Task::fromDraft(newId(), now, draft);
        self.tasks.push(task.clone());
        self.persistTasks();
        tracing::info!("[addTask] Task added successfully: {}", task.id);
        task
    }

    /// Replace the stored task with the same id. `id` and `createdAt` keep their stored values.
    /// Returns false (and changes nothing) when no task matches.
    pub fn updateTask(&mut self, mut task: Task) -> bool {
        let id = task.id.clone();
        let found = match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(existing) => {
                task.createdAt = existing.createdAt;
                task.tags = normalizeTags(&task.tags);
                *existing = task;
                true
            }
            None => false,
        };
        self.persistTasks();
        if found {
            tracing::info!("[updateTask] Task updated successfully");
        } else {
            tracing::debug!("[updateTask] No task with id {}, ignoring", id);
        }
        found
    }

    pub fn deleteTask(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        self.persistTasks();
        if removed {
            tracing::info!("[deleteTask] Task deleted successfully: {}", id);
        }
        removed
    }

    pub fn toggleTaskCompletion(&mut self, id: &str) -> Option<Toggle> {
        let toggle = self.tasks.iter_mut().find(|t| t.id == id).map(|task| {
            task.completed = !task.completed;
            if task.completed { Toggle::Completed } else { Toggle::Reopened }
        });
        self.persistTasks();
        if toggle == Some(Toggle::Completed) {
            tracing::info!("[toggleTaskCompletion] Task completed: {}", id);
        }
        toggle
    }

    // ============================================
    // PROJECT MUTATIONS
    // ============================================

    pub fn addProject(&mut self, name: &str, color: &str) -> Project {
        let project = Project {
            id: newId(),
            name: name.to_string(),
            color: color.to_string(),
        };
        self.projects.push(project.clone());
        self.persistProjects();
        tracing::info!("[addProject] Project created successfully: {}", project.id);
        project
    }

    /// Remove a project. Tasks that reference it keep their (now dangling) projectId.
    pub fn deleteProject(&mut self, id: &str) -> bool {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        let removed = self.projects.len() != before;
        self.persistProjects();
        if removed {
            tracing::info!("[deleteProject] Project deleted successfully: {}", id);
        }
        removed
    }

    // ============================================
    // LOOKUPS AND QUERIES
    // ============================================

    pub fn getProjectById(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    pub fn getTaskById(&self, id: &str) -> Option<&Task> {
        query::getTaskById(&self.tasks, id)
    }

    pub fn getTasksByProject(&self, projectId: Option<&str>) -> Vec<&Task> {
        query::getTasksByProject(&self.tasks, projectId)
    }

    pub fn getTasksByTag(&self, tag: &str) -> Vec<&Task> {
        query::getTasksByTag(&self.tasks, tag)
    }

    pub fn getFilteredTasks(
        &self,
        completed: Option<bool>,
        priority: Option<Priority>,
        projectId: Option<&str>,
    ) -> Vec<&Task> {
        query::getFilteredTasks(&self.tasks, completed, priority, projectId)
    }

    pub fn getTaskStats(&self) -> TaskStats {
        query::getTaskStats(&self.tasks)
    }
}
