//! Presentation filters applied while rendering a variant.
//!
//! All of these are pure: they borrow from the data tree, keep the original
//! order, and never modify the input.

use serde_json::{Map, Value};
use tracing::warn;

use crate::models::cv::{Responsibility, IN_RESUME_KEY, RESPONSIBILITIES_KEY};

/// Separator between the two ends of a date range (LaTeX en-dash).
pub const DATE_RANGE_SEPARATOR: &str = " -- ";

/// Whether a record should appear on the résumé.
///
/// Reads the optional boolean `inResume` flag; a missing or null flag means
/// included. Records that are not objects are always included.
pub fn is_included(record: &Value) -> bool {
    record
        .get(IN_RESUME_KEY)
        .and_then(Value::as_bool)
        .unwrap_or(true)
}

/// Keeps the items whose inclusion flag is set.
pub fn filter_by_resume(items: &[Value]) -> Vec<&Value> {
    items.iter().filter(|item| is_included(item)).collect()
}

/// Keyed variant of [`filter_by_resume`] for sections stored as objects,
/// such as `technicalSkills`. Key order is preserved.
pub fn filter_entries_by_resume(entries: &Map<String, Value>) -> Vec<(&String, &Value)> {
    entries.iter().filter(|(_, v)| is_included(v)).collect()
}

/// Formats a date range for display. `None` for `end` means the entry is
/// ongoing and only the start is shown.
pub fn format_date_range(start: &str, end: Option<&str>) -> String {
    match end {
        None => start.to_string(),
        Some(end) => format!("{start}{DATE_RANGE_SEPARATOR}{end}"),
    }
}

/// Display texts of the included responsibilities of an entry.
pub fn get_responsibilities(entry: &Value) -> Vec<String> {
    let Some(items) = entry.get(RESPONSIBILITIES_KEY).and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter(|item| is_included(item))
        .filter_map(|item| {
            let parsed = Responsibility::from_value(item);
            if parsed.is_none() {
                warn!("Skipping responsibility without a text value: {item}");
            }
            parsed
        })
        .map(|r| r.value)
        .collect()
}
