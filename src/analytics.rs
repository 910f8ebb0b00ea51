// Chart aggregations
// Buckets are calendar days in the caller's time zone, not fixed 24h windows

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::models::{Priority, Project, Task};
use crate::query::{getTasksByProject, percentOf};

/// Calendar date of a stored timestamp as seen from `tz`
pub fn localDate<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

/// One bar of the weekly activity chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayActivity {
    pub day: String,
    pub date: NaiveDate,
    pub added: usize,
    pub completed: usize,
}

/// Monday-to-Sunday activity for the week containing `now`.
///
/// Tasks carry no completion timestamp, so every completed task counts as
/// completed today.
pub fn weeklyActivity<Tz: TimeZone>(tasks: &[Task], now: &DateTime<Tz>) -> Vec<DayActivity> {
    let tz = now.timezone();
    let today = now.date_naive();
    let monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);

    (0..7)
        .map(|offset| {
            let date = monday + Duration::days(offset);
            let added = tasks.iter().filter(|t| localDate(&t.createdAt, &tz) == date).count();
            let completed = if date == today {
                tasks.iter().filter(|t| t.completed).count()
            } else {
                0
            };
            DayActivity {
                day: date.format("%a").to_string(),
                date,
                added,
                completed,
            }
        })
        .collect()
}

/// One point of the trailing completion trend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub label: String,
    pub created: usize,
    /// Created that day and currently completed
    pub completed: usize,
    pub completionRate: u32,
}

/// Longest trailing window the trend will compute
pub const MAX_TREND_DAYS: u32 = 366;

/// Trailing `days` days ending today (inclusive), oldest first.
/// `days` is capped at `MAX_TREND_DAYS`; dates before `NaiveDate::MIN` are skipped.
pub fn completionTrend<Tz: TimeZone>(tasks: &[Task], days: u32, now: &DateTime<Tz>) -> Vec<TrendPoint> {
    let tz = now.timezone();
    let today = now.date_naive();

    (0..u64::from(days.min(MAX_TREND_DAYS)))
        .rev()
        .filter_map(|back| today.checked_sub_days(Days::new(back)))
        .map(|date| {
            let createdThatDay: Vec<&Task> = tasks
                .iter()
                .filter(|t| localDate(&t.createdAt, &tz) == date)
                .collect();
            let created = createdThatDay.len();
            let completed = createdThatDay.iter().filter(|t| t.completed).count();
            TrendPoint {
                date,
                label: date.format("%b %d").to_string(),
                created,
                completed,
                completionRate: percentOf(completed, created),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriorityCount {
    pub priority: Priority,
    pub name: String,
    pub count: usize,
}

/// Always all three priorities, High first, including zero counts
pub fn tasksByPriority(tasks: &[Task]) -> Vec<PriorityCount> {
    Priority::ALL
        .iter()
        .map(|&priority| PriorityCount {
            priority,
            name: priority.label().to_string(),
            count: tasks.iter().filter(|t| t.priority == priority).count(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectCount {
    pub projectId: String,
    pub name: String,
    pub color: String,
    pub count: usize,
}

/// Task counts per known project in project order; empty projects are left out
pub fn tasksByProject(tasks: &[Task], projects: &[Project]) -> Vec<ProjectCount> {
    projects
        .iter()
        .map(|p| ProjectCount {
            projectId: p.id.clone(),
            name: p.name.clone(),
            color: p.color.clone(),
            count: getTasksByProject(tasks, Some(&p.id)).len(),
        })
        .filter(|c| c.count > 0)
        .collect()
}
