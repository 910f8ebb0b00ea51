// Read-only queries over a task snapshot
// Nothing here caches; callers pass the current collection every time

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::{Priority, Task, TaskStats};

pub fn getTaskById<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|t| t.id == id)
}

/// Exact projectId match. `None` selects unassigned tasks, not every task.
pub fn getTasksByProject<'a>(tasks: &'a [Task], projectId: Option<&str>) -> Vec<&'a Task> {
    tasks.iter().filter(|t| t.projectId.as_deref() == projectId).collect()
}

/// Exact, case-sensitive tag match
pub fn getTasksByTag<'a>(tasks: &'a [Task], tag: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|t| t.hasTag(tag)).collect()
}

/// Intersection of the given predicates; `None` (or an empty projectId) imposes nothing
pub fn getFilteredTasks<'a>(
    tasks: &'a [Task],
    completed: Option<bool>,
    priority: Option<Priority>,
    projectId: Option<&str>,
) -> Vec<&'a Task> {
    let projectId = projectId.filter(|p| !p.is_empty());
    tasks
        .iter()
        .filter(|t| completed.is_none_or(|c| t.completed == c))
        .filter(|t| priority.is_none_or(|p| t.priority == p))
        .filter(|t| projectId.is_none_or(|p| t.projectId.as_deref() == Some(p)))
        .collect()
}

pub fn getTaskStats(tasks: &[Task]) -> TaskStats {
    taskStatsAt(tasks, Utc::now())
}

pub fn taskStatsAt(tasks: &[Task], now: DateTime<Utc>) -> TaskStats {
    let completed = tasks.iter().filter(|t| t.completed).count();
    let overdue = tasks.iter().filter(|t| t.isOverdue(now)).count();
    TaskStats::new(tasks.len(), completed, overdue)
}

/// Share of completed tasks as a rounded percentage
pub fn progressPercentage(tasks: &[Task]) -> u32 {
    percentOf(tasks.iter().filter(|t| t.completed).count(), tasks.len())
}

pub(crate) fn percentOf(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (part as f64 / whole as f64 * 100.0).round() as u32
}

/// Case-insensitive substring search on title and description
pub fn searchTasks<'a>(tasks: &'a [Task], term: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|t| matchesSearch(t, term)).collect()
}

fn matchesSearch(task: &Task, term: &str) -> bool {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return true;
    }
    task.title.to_lowercase().contains(&term)
        || task.description.as_deref().is_some_and(|d| d.to_lowercase().contains(&term))
}

/// Incomplete tasks, most urgent first
///
/// Due-dated tasks come first in ascending due order, then undated tasks
/// newest-created first.
pub fn recentTasks(tasks: &[Task], limit: usize) -> Vec<&Task> {
    let mut pending: Vec<&Task> = tasks.iter().filter(|t| !t.completed).collect();
    pending.sort_by(|a, b| match (a.dueDate, b.dueDate) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.createdAt.cmp(&a.createdAt),
    });
    pending.truncate(limit);
    pending
}

// ============================================
// TASK LIST FILTER
// ============================================

/// Completion tab of the task list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskView {
    #[default]
    All,
    Pending,
    Completed,
}

impl TaskView {
    pub fn fromName(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "all" => Some(Self::All),
            "pending" => Some(Self::Pending),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    fn completed(&self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Pending => Some(false),
            Self::Completed => Some(true),
        }
    }
}

/// Search term, completion tab, priority and project combined
#[derive(Debug, Clone, Default)]
pub struct TaskQuery {
    pub search: Option<String>,
    pub view: TaskView,
    pub priority: Option<Priority>,
    pub projectId: Option<String>,
}

impl TaskQuery {
    pub fn matches(&self, task: &Task) -> bool {
        self.search.as_deref().is_none_or(|s| matchesSearch(task, s))
            && self.view.completed().is_none_or(|c| task.completed == c)
            && self.priority.is_none_or(|p| task.priority == p)
            && self
                .projectId
                .as_deref()
                .filter(|p| !p.is_empty())
                .is_none_or(|p| task.projectId.as_deref() == Some(p))
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }
}
