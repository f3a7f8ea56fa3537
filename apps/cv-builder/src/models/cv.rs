use std::fmt;

use serde::Deserialize;
use serde_json::Value;

/// Inclusion flag carried by every record that can appear on a résumé.
pub const IN_RESUME_KEY: &str = "inResume";
pub const RESPONSIBILITIES_KEY: &str = "responsibilities";
pub const START_DATE_KEY: &str = "startDate";
pub const END_DATE_KEY: &str = "endDate";

/// A single bullet under an experience entry.
/// Whether it is shown is decided on the raw record by `filters::is_included`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Responsibility {
    pub value: String,
    #[serde(default)]
    pub in_resume: Option<bool>,
}

impl Responsibility {
    /// Reads a responsibility from the data tree.
    ///
    /// Accepts the `{ value, inResume }` object form and a bare string.
    /// Anything else, including an object without a string `value`, yields `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self {
                value: s.clone(),
                in_resume: None,
            }),
            Value::Object(_) => Self::deserialize(value).ok(),
            _ => None,
        }
    }
}

/// Start/end pair of an experience, education or licence entry.
/// `end == None` means the entry is ongoing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: String,
    pub end: Option<String>,
}

impl DateRange {
    /// Reads `startDate` / `endDate` off an entry without validating either.
    /// A missing start becomes the empty string; a null or missing end is ongoing.
    pub fn from_entry(entry: &Value) -> Self {
        Self {
            start: entry
                .get(START_DATE_KEY)
                .and_then(display_text)
                .unwrap_or_default(),
            end: entry.get(END_DATE_KEY).and_then(display_text),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::render::filters::format_date_range(
            &self.start,
            self.end.as_deref(),
        ))
    }
}

/// Opaque display string for a scalar field; `None` for null.
fn display_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
