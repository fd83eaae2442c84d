// src/models/mod.rs

//! Domain models for the ingestion pipeline.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod feed;
mod lesson;

// Re-export all public types
pub use config::{
    Config, DiscoveryConfig, ExtractConfig, FeedConfig, LoggingConfig, PathsConfig, RangesConfig,
};
pub use feed::{FeedKind, IdRange};
pub use lesson::{CalendarEvent, LessonRecord};
