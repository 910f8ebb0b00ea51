use serde::Serialize;

/// Derived task counts. Never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

impl TaskStats {
    pub fn new(total: usize, completed: usize, overdue: usize) -> Self {
        Self {
            total,
            completed,
            pending: total - completed,
            overdue,
        }
    }
}
