// src/parse/events.rs

//! Line scanner for calendar feeds.
//!
//! Deliberately simple: one property per physical line, no unfolding of
//! continuation lines and no parameter parsing. A property written with
//! parameters (`DTSTART;TZID=...:`) is not recognized.

use crate::models::CalendarEvent;

const BEGIN_EVENT: &str = "BEGIN:VEVENT";
const END_EVENT: &str = "END:VEVENT";

/// Split feed text into events.
///
/// Lines between a begin marker and the next end marker make up one
/// event. A second begin marker before the end discards the lines seen so
/// far, and an event still open at the end of the text is dropped.
pub fn parse_events(text: &str) -> Vec<CalendarEvent> {
    let mut events = Vec::new();
    let mut inside_event = false;
    let mut buffer: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line == BEGIN_EVENT {
            inside_event = true;
            buffer.clear();
        } else if line == END_EVENT {
            if inside_event {
                events.push(parse_event(&buffer));
            }
            inside_event = false;
            buffer.clear();
        } else if inside_event {
            buffer.push(line);
        }
    }

    events
}

/// Read the fields of one event from its lines.
///
/// Prefixes are matched exactly and case-sensitively. The first line
/// carrying a given property wins.
pub fn parse_event<S: AsRef<str>>(lines: &[S]) -> CalendarEvent {
    let mut event = CalendarEvent::default();

    for line in lines.iter().map(|l| l.as_ref().trim()) {
        let slot = if let Some(value) = line.strip_prefix("SUMMARY:") {
            Some((&mut event.summary, value))
        } else if let Some(value) = line.strip_prefix("DTSTART:") {
            Some((&mut event.start, value))
        } else if let Some(value) = line.strip_prefix("DTEND:") {
            Some((&mut event.end, value))
        } else if let Some(value) = line.strip_prefix("LOCATION:") {
            Some((&mut event.location, value))
        } else if let Some(value) = line.strip_prefix("DESCRIPTION:") {
            Some((&mut event.description, value))
        } else {
            None
        };

        if let Some((field, value)) = slot {
            if field.is_none() {
                *field = Some(value.trim().to_string());
            }
        }
    }

    event
}
