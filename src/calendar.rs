// Calendar view: due-date markers and per-day task lists

use chrono::{NaiveDate, TimeZone};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::analytics::localDate;
use crate::models::Task;

/// Dot shown under a calendar day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DayMarker {
    pub count: usize,
    /// Every task due that day is completed
    pub complete: bool,
}

/// Due-date markers keyed by local calendar date. Undated tasks are skipped.
pub fn datesWithTasks<Tz: TimeZone>(tasks: &[Task], tz: &Tz) -> BTreeMap<NaiveDate, DayMarker> {
    let mut markers: BTreeMap<NaiveDate, DayMarker> = BTreeMap::new();
    for task in tasks {
        let Some(due) = task.dueDate else { continue };
        let marker = markers
            .entry(localDate(&due, tz))
            .or_insert(DayMarker { count: 0, complete: true });
        marker.count += 1;
        marker.complete = marker.complete && task.completed;
    }
    markers
}

pub fn tasksDueOn<'a, Tz: TimeZone>(tasks: &'a [Task], date: NaiveDate, tz: &Tz) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|t| t.dueDate.is_some_and(|due| localDate(&due, tz) == date))
        .collect()
}
