// Task model
// UUID string for stable ID, timestamps stored as UTC and serialized as RFC 3339 text

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::common::Priority;

/// A stored task
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dueDate: Option<DateTime<Utc>>,
    pub createdAt: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Weak reference: may point at a project that no longer exists
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projectId: Option<String>,
}

impl Task {
    /// Build a task from a draft. Only the store assigns ids and creation times.
    pub(crate) fn fromDraft(id: String, createdAt: DateTime<Utc>, draft: TaskDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            completed: draft.completed,
            priority: draft.priority,
            dueDate: draft.dueDate,
            createdAt,
            tags: draft.tags,
            projectId: draft.projectId,
        }
    }

    /// Not completed and due strictly before `now`
    pub fn isOverdue(&self, now: DateTime<Utc>) -> bool {
        !self.completed && self.dueDate.is_some_and(|due| due < now)
    }

    pub fn hasTag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Everything a caller supplies when creating a task
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub dueDate: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub projectId: Option<String>,
}

impl TaskDraft {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample() -> Task {
        let created = Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap();
        let mut draft = TaskDraft::new("Write report");
        draft.dueDate = Some(created + Duration::days(2));
        draft.tags = vec!["work".into()];
        draft.projectId = Some("work".into());
        Task::fromDraft("t-1".into(), created, draft)
    }

    #[test]
    fn overdue_requires_past_due_and_incomplete() {
        let task = sample();
        let due = task.dueDate.unwrap();
        assert!(!task.isOverdue(due));
        assert!(task.isOverdue(due + Duration::seconds(1)));

        let mut done = task.clone();
        done.completed = true;
        assert!(!done.isOverdue(due + Duration::days(1)));
    }

    #[test]
    fn task_json_uses_camel_case_and_text_dates() {
        let task = sample();
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["createdAt"], "2026-03-02T09:30:00Z");
        assert_eq!(json["projectId"], "work");
        assert!(json.get("description").is_none());

        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, task);
        assert_eq!(back.createdAt.timestamp(), task.createdAt.timestamp());
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let json = r#"{"id":"x","title":"T","createdAt":"2026-01-01T00:00:00Z"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert!(!task.completed);
        assert_eq!(task.priority, Priority::Medium);
        assert!(task.tags.is_empty());
        assert!(task.dueDate.is_none());
    }
}
