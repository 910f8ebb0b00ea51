// Common helpers for commands
// All using camelCase for direct JSON compatibility

use chrono::{DateTime, NaiveDate, Utc};

use crate::models::Priority;

/// Trimmed title, or an error when nothing is left
pub fn requireTitle(title: &str) -> Result<String, String> {
    let title = title.trim();
    if title.is_empty() {
        return Err("Title is required".to_string());
    }
    Ok(title.to_string())
}

/// Blank descriptions are stored as absent
pub fn cleanDescription(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}

/// Empty strings and the literal "none" mean "no project"
pub fn cleanProjectId(projectId: Option<String>) -> Option<String> {
    projectId.filter(|p| !p.is_empty() && p != "none" && p != "null")
}

pub fn parsePriority(priority: Option<&str>) -> Result<Option<Priority>, String> {
    match priority {
        None => Ok(None),
        Some(p) if p.trim().is_empty() => Ok(None),
        Some(p) => Priority::fromName(p)
            .map(Some)
            .ok_or_else(|| format!("Invalid priority: {}", p)),
    }
}

/// Accepts RFC 3339 timestamps or bare dates (taken as midnight UTC)
pub fn parseDueDate(value: &str) -> Result<DateTime<Utc>, String> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("Invalid due date: {}", value))
}

pub fn parseDate(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| format!("Invalid date {}: {}", value, e))
}
