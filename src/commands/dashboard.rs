// Dashboard, analytics and calendar views
// All day bucketing happens in the local time zone

use chrono::{DateTime, Local, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::analytics::{
    DayActivity, MAX_TREND_DAYS, PriorityCount, ProjectCount, TrendPoint, completionTrend, tasksByPriority, tasksByProject,
    weeklyActivity,
};
use crate::calendar::{DayMarker, datesWithTasks, tasksDueOn};
use crate::models::TaskStats;
use crate::query::{progressPercentage, recentTasks, taskStatsAt};
use crate::storage::StorageState;
use super::common::parseDate;
use super::task::{TaskInfo, infoList};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardInfo {
    pub stats: TaskStats,
    pub progress: u32,
    pub recentTasks: Vec<TaskInfo>,
    pub weeklyActivity: Vec<DayActivity>,
}

pub fn getTaskStats(storage: &StorageState) -> TaskStats {
    storage.store.read().getTaskStats()
}

pub fn getDashboard(storage: &StorageState) -> DashboardInfo {
    dashboardAt(storage, &Local::now())
}

pub fn dashboardAt<Tz: TimeZone>(storage: &StorageState, now: &DateTime<Tz>) -> DashboardInfo {
    let limit = storage.effectiveSettings().recentTasksLimit;
    let store = storage.store.read();
    let tasks = store.tasks();
    DashboardInfo {
        stats: taskStatsAt(tasks, now.with_timezone(&Utc)),
        progress: progressPercentage(tasks),
        recentTasks: infoList(recentTasks(tasks, limit), &store),
        weeklyActivity: weeklyActivity(tasks, now),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyticsInfo {
    pub trend: Vec<TrendPoint>,
    pub byPriority: Vec<PriorityCount>,
    pub byProject: Vec<ProjectCount>,
}

pub fn getAnalytics(storage: &StorageState, days: Option<u32>) -> Result<AnalyticsInfo, String> {
    analyticsAt(storage, days, &Local::now())
}

/// Explicit `days` above `MAX_TREND_DAYS` are rejected; a hand-edited config value is clamped instead
pub fn analyticsAt<Tz: TimeZone>(
    storage: &StorageState,
    days: Option<u32>,
    now: &DateTime<Tz>,
) -> Result<AnalyticsInfo, String> {
    let days = match days {
        Some(d) if d > MAX_TREND_DAYS => {
            return Err(format!("days must be at most {}", MAX_TREND_DAYS));
        }
        Some(d) => d,
        None => storage.effectiveSettings().trendDays.min(MAX_TREND_DAYS),
    }
    .max(1);
    let store = storage.store.read();
    Ok(AnalyticsInfo {
        trend: completionTrend(store.tasks(), days, now),
        byPriority: tasksByPriority(store.tasks()),
        byProject: tasksByProject(store.tasks(), store.projects()),
    })
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarDay {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub marker: DayMarker,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarInfo {
    pub days: Vec<CalendarDay>,
    pub selectedDate: NaiveDate,
    pub selectedTasks: Vec<TaskInfo>,
}

/// Markers for every due date plus the tasks due on `date` (today when omitted)
pub fn getCalendar(storage: &StorageState, date: Option<&str>) -> Result<CalendarInfo, String> {
    let selected = match date {
        Some(d) if !d.trim().is_empty() => parseDate(d)?,
        _ => Local::now().date_naive(),
    };
    Ok(calendarIn(storage, selected, &Local))
}

pub fn calendarIn<Tz: TimeZone>(storage: &StorageState, selected: NaiveDate, tz: &Tz) -> CalendarInfo {
    let store = storage.store.read();
    let days = datesWithTasks(store.tasks(), tz)
        .into_iter()
        .map(|(date, marker)| CalendarDay { date, marker })
        .collect();
    CalendarInfo {
        days,
        selectedDate: selected,
        selectedTasks: infoList(tasksDueOn(store.tasks(), selected, tz), &store),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Settings, TaskDraft};
    use crate::persistence::MemoryBackend;
    use crate::storage::Storage;
    use chrono::Duration;
    use std::sync::Arc;

    fn storage() -> StorageState {
        let settings = Settings { recentTasksLimit: 2, ..Default::default() };
        Arc::new(Storage::withBackend(settings, Box::new(MemoryBackend::new())))
    }

    #[test]
    fn dashboard_summarizes_store() {
        let storage = storage();
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
        {
            let mut store = storage.store.write();
            let mut late = TaskDraft::new("Late");
            late.dueDate = Some(now - Duration::days(1));
            store.addTaskAt(late, now - Duration::days(2));
            store.addTaskAt(TaskDraft::new("Fresh"), now);
            let done = store.addTaskAt(TaskDraft::new("Done"), now);
            store.toggleTaskCompletion(&done.id);
        }

        let dashboard = dashboardAt(&storage, &now);
        assert_eq!(dashboard.stats, TaskStats { total: 3, completed: 1, pending: 2, overdue: 1 });
        assert_eq!(dashboard.progress, 33);
        assert_eq!(dashboard.recentTasks.len(), 2);
        assert_eq!(dashboard.recentTasks[0].title, "Late");
        // Monday 12th .. Wednesday 14th
        assert_eq!(dashboard.weeklyActivity[0].added, 1);
        assert_eq!(dashboard.weeklyActivity[2].added, 2);
        assert_eq!(dashboard.weeklyActivity[2].completed, 1);
    }

    #[test]
    fn analytics_uses_configured_trend_days() {
        let storage = storage();
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
        let analytics = analyticsAt(&storage, None, &now).unwrap();
        assert_eq!(analytics.trend.len(), 7);
        assert_eq!(analytics.byPriority.len(), 3);
        assert!(analytics.byProject.is_empty());
        assert_eq!(analyticsAt(&storage, Some(0), &now).unwrap().trend.len(), 1);
    }

    #[test]
    fn analytics_rejects_oversized_window() {
        let storage = storage();
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
        assert!(analyticsAt(&storage, Some(u32::MAX), &now).is_err());
        assert!(analyticsAt(&storage, Some(MAX_TREND_DAYS + 1), &now).is_err());
        assert_eq!(analyticsAt(&storage, Some(MAX_TREND_DAYS), &now).unwrap().trend.len(), MAX_TREND_DAYS as usize);
    }

    #[test]
    fn configured_trend_days_are_clamped() {
        let settings = Settings { trendDays: u32::MAX, ..Default::default() };
        let storage: StorageState = Arc::new(Storage::withBackend(settings, Box::new(MemoryBackend::new())));
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 12, 0, 0).unwrap();
        assert_eq!(analyticsAt(&storage, None, &now).unwrap().trend.len(), MAX_TREND_DAYS as usize);
    }

    #[test]
    fn calendar_lists_selected_day() {
        let storage = storage();
        let due = Utc.with_ymd_and_hms(2026, 10, 20, 9, 0, 0).unwrap();
        {
            let mut draft = TaskDraft::new("Dentist");
            draft.dueDate = Some(due);
            storage.store.write().addTask(draft);
        }
        let day = due.date_naive();
        let calendar = calendarIn(&storage, day, &Utc);
        assert_eq!(calendar.days.len(), 1);
        assert_eq!(calendar.days[0].marker, DayMarker { count: 1, complete: false });
        assert_eq!(calendar.selectedTasks[0].title, "Dentist");
        assert!(calendarIn(&storage, day.succ_opt().unwrap(), &Utc).selectedTasks.is_empty());
        assert!(getCalendar(&storage, Some("20-10-2026")).is_err());
    }
}
