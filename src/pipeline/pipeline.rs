// src/pipeline/pipeline.rs

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, FeedKind};
use crate::services::{FeedSource, RefreshMode};
use crate::utils::console;

use super::discover::run_discover;
use super::extract::run_extract;
use super::fetch::{IdentifierInput, run_fetch};

/// Run the full pipeline: discover rooms, refresh room and group feeds,
/// then extract everything into the dataset file.
///
/// Discovery resumes from its checkpoint, so a repeated run only probes
/// identifiers it has not seen.
pub async fn run_pipeline(
    config: &Config,
    source: Arc<dyn FeedSource>,
    skip_discover: bool,
) -> Result<()> {
    console::header("Timetable ingestion pipeline");

    let total_steps = if skip_discover { 3 } else { 4 };
    let mut current_step = 1;

    if !skip_discover {
        console::step(current_step, total_steps, "Discover - Probing room identifiers");
        run_discover(config, Arc::clone(&source), None, true).await?;
        current_step += 1;
    }

    for kind in FeedKind::ALL {
        console::step(
            current_step,
            total_steps,
            &format!("Fetch - Refreshing {kind} feeds"),
        );
        let input = IdentifierInput::for_kind(config, kind);
        run_fetch(config, Arc::clone(&source), kind, &input, RefreshMode::FullRefresh).await?;
        current_step += 1;
    }

    console::step(current_step, total_steps, "Extract - Writing dataset");
    run_extract(config, &FeedKind::ALL, &config.paths.output_file).await?;

    log::info!("Pipeline complete!");
    Ok(())
}
