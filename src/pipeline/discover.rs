// src/pipeline/discover.rs

//! Room discovery stage.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{Config, IdRange};
use crate::services::{DiscoverySummary, FeedSource, IdentifierDiscoverer};
use crate::storage::{Checkpoint, IdentifierList};

/// Run room discovery over `range` (the configured room range by default).
///
/// With `resume`, the scan continues after the last checkpointed
/// identifier; otherwise the checkpoint is reset and the whole range is
/// probed.
pub async fn run_discover(
    config: &Config,
    source: Arc<dyn FeedSource>,
    range: Option<IdRange>,
    resume: bool,
) -> Result<DiscoverySummary> {
    let range = range.unwrap_or(config.ranges.rooms);
    // Later stages read the list even when nothing gets accepted.
    let list = IdentifierList::new(&config.paths.identifiers_file);
    list.ensure().await?;

    let checkpoint = Checkpoint::new(config.paths.checkpoint_file());

    let range = if resume {
        match checkpoint.load().await? {
            Some(last) => match range.resume_after(last) {
                Some(rest) => {
                    log::info!("Resuming discovery after ID {last}");
                    rest
                }
                None => {
                    log::info!("Checkpoint {last} already covers {range}, nothing to probe");
                    return Ok(DiscoverySummary {
                        last_probed: Some(last),
                        ..DiscoverySummary::default()
                    });
                }
            },
            None => range,
        }
    } else {
        checkpoint.reset().await?;
        range
    };

    IdentifierDiscoverer::new(source, config)
        .discover(range, &list, Some(&checkpoint))
        .await
}
