// src/parse/fields.rs

//! Field normalization for calendar events.
//!
//! Every function here is total: unparseable input degrades to empty
//! strings instead of an error.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use regex::Regex;

use crate::error::Result;
use crate::models::ExtractConfig;

/// Compact UTC form used by the feeds, e.g. `20251020T071000Z`.
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Parse a compact calendar timestamp.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), TIMESTAMP_FORMAT).ok()
}

/// Split a timestamp into ISO date and `HH:MM` time.
///
/// Returns `("", "")` when the value does not parse. An empty date means
/// "unknown", never midnight.
pub fn split_timestamp(value: &str) -> (String, String) {
    match parse_timestamp(value) {
        Some(dt) => (
            dt.format(DATE_FORMAT).to_string(),
            dt.format(TIME_FORMAT).to_string(),
        ),
        None => (String::new(), String::new()),
    }
}

/// Russian weekday name for an ISO date, empty if the date is invalid.
pub fn weekday_name(date: &str) -> String {
    NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map(|d| russian_weekday(d.weekday()).to_string())
        .unwrap_or_default()
}

fn russian_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Понедельник",
        Weekday::Tue => "Вторник",
        Weekday::Wed => "Среда",
        Weekday::Thu => "Четверг",
        Weekday::Fri => "Пятница",
        Weekday::Sat => "Суббота",
        Weekday::Sun => "Воскресенье",
    }
}

/// Split a summary into `(lesson_type, subject)` at the first whitespace.
///
/// Without whitespace the type is empty and the whole text is the subject.
pub fn split_summary(summary: &str) -> (String, String) {
    let summary = summary.trim();
    match summary.split_once(char::is_whitespace) {
        Some((lesson_type, subject)) => {
            (lesson_type.to_string(), subject.trim_start().to_string())
        }
        None => (String::new(), summary.to_string()),
    }
}

/// Lesson details recovered from an event's free text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LessonDetails {
    pub lesson_type: String,
    pub subject: String,
    pub teacher: String,
    pub group: String,
}

/// Pattern-based extraction of teacher and group from descriptions.
#[derive(Debug, Clone)]
pub struct DetailExtractor {
    teacher: Regex,
    group: Regex,
}

impl DetailExtractor {
    pub fn new(config: &ExtractConfig) -> Result<Self> {
        let (teacher, group) = config.compile()?;
        Ok(Self { teacher, group })
    }

    /// Teacher name, the text after the label up to the next comma.
    pub fn teacher(&self, description: &str) -> String {
        first_capture(&self.teacher, description)
    }

    /// Group code after the group label.
    pub fn group(&self, description: &str) -> String {
        first_capture(&self.group, description)
    }

    /// All details from a summary and a description. The two description
    /// searches are independent of each other.
    pub fn details(&self, summary: &str, description: &str) -> LessonDetails {
        let (lesson_type, subject) = split_summary(summary);
        LessonDetails {
            lesson_type,
            subject,
            teacher: self.teacher(description),
            group: self.group(description),
        }
    }
}

fn first_capture(regex: &Regex, text: &str) -> String {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}
