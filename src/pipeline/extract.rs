// src/pipeline/extract.rs

//! Extraction and export stage.

use std::path::Path;

use crate::error::Result;
use crate::models::{Config, FeedKind};
use crate::services::{CalendarExtractor, Dataset, exporter};
use crate::storage::PayloadStore;
use crate::utils::console;

/// Extract the stored feeds of `kinds`, in that order, and export the
/// combined dataset to `output`.
///
/// A kind whose store directory does not exist yet is skipped with a
/// warning.
pub async fn run_extract(config: &Config, kinds: &[FeedKind], output: &Path) -> Result<Dataset> {
    console::header("Extracting lessons");

    let extractor = CalendarExtractor::new(&config.extract)?;
    let mut dataset = Dataset::default();

    for &kind in kinds {
        let store = PayloadStore::new(config.paths.store_dir(kind));
        if !store.root().is_dir() {
            log::warn!(
                "No {} feeds at {}, run fetch first",
                kind,
                store.root().display()
            );
            continue;
        }

        let part = extractor.extract_all(&store).await?;
        log::info!(
            "{} record(s) from {} {} feed(s)",
            part.len(),
            part.report.files,
            kind
        );
        dataset.extend(part);
    }

    let written = exporter::export_to_path(&dataset.records, output)?;

    console::summary(
        "Extraction Results",
        &[
            ("Feeds", dataset.report.files.to_string()),
            ("Empty feeds", dataset.report.empty_files.to_string()),
            ("Lossy feeds", dataset.report.lossy_files.to_string()),
            ("Unreadable", dataset.report.unreadable_files.to_string()),
            ("Records", written.to_string()),
            ("Output", output.display().to_string()),
        ],
    );

    Ok(dataset)
}
