//! Calendar event and lesson record structures.

use serde::{Deserialize, Serialize};

/// One `BEGIN:VEVENT` .. `END:VEVENT` block as found in a feed.
///
/// Every field is optional; missing fields become empty strings once the
/// event is normalized into a [`LessonRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarEvent {
    pub summary: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
}

/// A normalized lesson, one row of the exported dataset.
///
/// Field order is the column order of the dataset file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonRecord {
    /// Lesson date (`YYYY-MM-DD`), empty when the start time was unparseable
    pub date: String,

    /// Localized weekday name of `date`
    pub weekday: String,

    /// Start time (`HH:MM`)
    pub start_time: String,

    /// End time (`HH:MM`)
    pub end_time: String,

    /// Lesson type, the first word of the summary (e.g. "лаб")
    #[serde(rename = "type")]
    pub lesson_type: String,

    /// Subject name, the rest of the summary
    pub subject: String,

    pub teacher: String,

    pub location: String,

    pub group: String,
}
