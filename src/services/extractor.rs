// src/services/extractor.rs

//! Lesson extraction from stored feeds.

use serde::Serialize;

use crate::error::Result;
use crate::models::{CalendarEvent, ExtractConfig, LessonRecord};
use crate::parse::{DetailExtractor, parse_events, split_timestamp, weekday_name};
use crate::storage::PayloadStore;
use crate::utils::decode_payload;

/// Counts of an extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionReport {
    /// Feed files parsed
    pub files: usize,
    /// Zero-length files, treated as absent
    pub empty_files: usize,
    /// Files with undecodable bytes (parsed anyway)
    pub lossy_files: usize,
    /// Files that could not be read
    pub unreadable_files: usize,
    /// Events found, one record each
    pub events: usize,
}

impl ExtractionReport {
    fn merge(&mut self, other: &ExtractionReport) {
        self.files += other.files;
        self.empty_files += other.empty_files;
        self.lossy_files += other.lossy_files;
        self.unreadable_files += other.unreadable_files;
        self.events += other.events;
    }
}

/// Lesson records in extraction order, plus how they were obtained.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<LessonRecord>,
    pub report: ExtractionReport,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append another dataset after this one.
    pub fn extend(&mut self, other: Dataset) {
        self.report.merge(&other.report);
        self.records.extend(other.records);
    }
}

/// Service turning stored feeds into lesson records.
pub struct CalendarExtractor {
    details: DetailExtractor,
}

impl CalendarExtractor {
    pub fn new(config: &ExtractConfig) -> Result<Self> {
        Ok(Self {
            details: DetailExtractor::new(config)?,
        })
    }

    /// Normalize one event. Missing or malformed fields become empty strings.
    pub fn normalize(&self, event: &CalendarEvent) -> LessonRecord {
        let (date, start_time) = split_timestamp(event.start.as_deref().unwrap_or_default());
        let (_, end_time) = split_timestamp(event.end.as_deref().unwrap_or_default());
        let details = self.details.details(
            event.summary.as_deref().unwrap_or_default(),
            event.description.as_deref().unwrap_or_default(),
        );

        LessonRecord {
            weekday: weekday_name(&date),
            date,
            start_time,
            end_time,
            lesson_type: details.lesson_type,
            subject: details.subject,
            teacher: details.teacher,
            location: event.location.clone().unwrap_or_default(),
            group: details.group,
        }
    }

    /// Records of every event in one feed, in encounter order.
    pub fn extract_text(&self, text: &str) -> Vec<LessonRecord> {
        parse_events(text)
            .iter()
            .map(|event| self.normalize(event))
            .collect()
    }

    /// Extract every feed of a store, in identifier order.
    ///
    /// A store that cannot be listed is fatal. Individual files that cannot
    /// be read are logged and skipped.
    pub async fn extract_all(&self, store: &PayloadStore) -> Result<Dataset> {
        let mut dataset = Dataset::default();

        for payload in store.list().await? {
            let bytes = match store.read(&payload).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    dataset.report.unreadable_files += 1;
                    log::error!("Could not read {}: {}", payload.path.display(), e);
                    continue;
                }
            };

            if bytes.is_empty() {
                dataset.report.empty_files += 1;
                log::debug!("Skipping empty feed {}", payload.path.display());
                continue;
            }

            let decoded = decode_payload(&bytes);
            if decoded.is_lossy() {
                dataset.report.lossy_files += 1;
                log::warn!(
                    "{}: dropped {} undecodable byte(s)",
                    payload.path.display(),
                    decoded.dropped_bytes
                );
            }

            let records = self.extract_text(&decoded.text);
            log::debug!("{}: {} event(s)", payload.path.display(), records.len());

            dataset.report.files += 1;
            dataset.report.events += records.len();
            dataset.records.extend(records);
        }

        Ok(dataset)
    }
}
