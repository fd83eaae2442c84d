//! Calendar text parsing.
//!
//! - `events`: splits feed text into `VEVENT` blocks and reads their fields
//! - `fields`: normalizes timestamps and pulls lesson details out of text

pub mod events;
pub mod fields;

pub use events::{parse_event, parse_events};
pub use fields::{
    DetailExtractor, LessonDetails, parse_timestamp, split_summary, split_timestamp,
    weekday_name,
};
