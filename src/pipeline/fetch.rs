// src/pipeline/fetch.rs

//! Bulk fetch stage.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;

use crate::error::Result;
use crate::models::{Config, FeedKind, IdRange};
use crate::services::{BulkFetcher, FeedSource, FetchSummary, RefreshMode};
use crate::storage::{FetchReport, IdentifierList, PayloadStore};
use crate::utils::console;

/// Where the identifiers of a fetch run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentifierInput {
    /// Identifier list written by discovery
    List(PathBuf),
    /// Contiguous range
    Range(IdRange),
}

impl IdentifierInput {
    /// Default input for a feed kind: the discovered list for rooms, the
    /// configured range for groups.
    pub fn for_kind(config: &Config, kind: FeedKind) -> Self {
        match kind {
            FeedKind::Room => IdentifierInput::List(config.paths.identifiers_file.clone()),
            FeedKind::Group => IdentifierInput::Range(config.range_for(kind)),
        }
    }

    /// Materialize the identifiers, dropping repeats of an identifier.
    pub async fn resolve(&self) -> Result<Vec<u64>> {
        match self {
            IdentifierInput::Range(range) => Ok(range.ids().collect()),
            IdentifierInput::List(path) => {
                let ids = IdentifierList::new(path).read().await?;
                let total = ids.len();
                let mut seen = HashSet::new();
                let unique: Vec<u64> = ids.into_iter().filter(|id| seen.insert(*id)).collect();
                if unique.len() < total {
                    log::info!(
                        "Ignoring {} repeated ID(s) in {}",
                        total - unique.len(),
                        path.display()
                    );
                }
                Ok(unique)
            }
        }
    }
}

/// Fetch every identifier of `input` into the content store of `kind`,
/// then record a report of the run.
pub async fn run_fetch(
    config: &Config,
    source: Arc<dyn FeedSource>,
    kind: FeedKind,
    input: &IdentifierInput,
    mode: RefreshMode,
) -> Result<FetchSummary> {
    console::header(&format!("Fetching {kind} feeds"));

    let ids = input.resolve().await.inspect_err(|e| {
        log::error!("Could not load identifiers: {e}");
    })?;
    if ids.is_empty() {
        log::warn!("No identifiers to fetch, leaving the store untouched");
        return Ok(FetchSummary::default());
    }
    log::info!("Found {} ID(s) to fetch", ids.len());

    let store = PayloadStore::new(config.paths.store_dir(kind));
    let fetcher = BulkFetcher::new(source, store, config.feed.request_delay());

    let started_at = Utc::now();
    let summary = fetcher.fetch_all(ids, kind, mode).await?;

    let report = FetchReport {
        kind,
        started_at,
        finished_at: Utc::now(),
        full_refresh: mode == RefreshMode::FullRefresh,
        summary: summary.clone(),
    };
    let report_path = config.paths.report_file(kind);
    if let Err(e) = report.save(&report_path).await {
        log::warn!("Could not write report {}: {}", report_path.display(), e);
    }

    Ok(summary)
}
