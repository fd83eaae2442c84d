// src/pipeline/info.rs

use crate::error::Result;
use crate::models::{Config, FeedKind};
use crate::storage::{Checkpoint, FetchReport, PayloadStore};
use crate::utils::console;

/// Show the state of the content store and of past runs.
pub async fn run_info(config: &Config) -> Result<()> {
    console::header("Storage status");
    log::info!("Storage directory: {}", config.paths.storage_dir.display());

    for kind in FeedKind::ALL {
        let store = PayloadStore::new(config.paths.store_dir(kind));
        let feeds = if store.root().is_dir() {
            store.list().await?.len()
        } else {
            0
        };
        log::info!("{} feeds stored: {}", kind, feeds);

        match FetchReport::load(&config.paths.report_file(kind)).await? {
            Some(report) => {
                console::sub_item(&format!(
                    "Last fetch: {} ({})",
                    report.finished_at.format("%Y-%m-%d %H:%M:%S UTC"),
                    if report.full_refresh { "full refresh" } else { "incremental" }
                ));
                console::sub_item(&format!(
                    "Stored {}, empty {}, failed {} of {}",
                    report.summary.stored,
                    report.summary.empty,
                    report.summary.failed,
                    report.summary.requested
                ));
            }
            None => console::sub_item("No fetch recorded yet."),
        }
    }

    match Checkpoint::new(config.paths.checkpoint_file()).load().await? {
        Some(last) => log::info!("Discovery checkpoint: {} (range {})", last, config.ranges.rooms),
        None => log::info!("No discovery checkpoint."),
    }

    Ok(())
}
