// src/services/fetcher.rs

//! Bulk feed fetching into the content store.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::FeedKind;
use crate::services::{FeedResponse, FeedSource, fetch_paced};
use crate::storage::PayloadStore;
use crate::utils::console;

/// Whether the store is emptied before fetching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshMode {
    /// Keep existing files, overwrite the ones fetched again
    Incremental,
    /// Remove every stored file first, so only this run's feeds remain
    FullRefresh,
}

/// Counts of a bulk fetch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchSummary {
    pub requested: u64,
    pub stored: u64,
    pub empty: u64,
    pub failed: u64,
    /// Files removed by a full refresh
    pub cleared: u64,
}

impl FetchSummary {
    /// Identifiers that produced no stored feed.
    pub fn unsuccessful(&self) -> u64 {
        self.empty + self.failed
    }
}

/// Service fetching a known set of identifiers into a [`PayloadStore`].
pub struct BulkFetcher {
    source: Arc<dyn FeedSource>,
    store: PayloadStore,
    delay: Duration,
}

impl BulkFetcher {
    pub fn new(source: Arc<dyn FeedSource>, store: PayloadStore, delay: Duration) -> Self {
        Self {
            source,
            store,
            delay,
        }
    }

    pub fn store(&self) -> &PayloadStore {
        &self.store
    }

    /// Fetch every identifier and store non-empty feeds verbatim.
    ///
    /// Each identifier is handled in isolation: empty bodies, request
    /// failures and write failures are logged, counted and skipped.
    /// Failing to prepare the store directory aborts before any request.
    pub async fn fetch_all<I>(
        &self,
        ids: I,
        kind: FeedKind,
        mode: RefreshMode,
    ) -> Result<FetchSummary>
    where
        I: IntoIterator<Item = u64>,
    {
        let mut summary = FetchSummary::default();

        match mode {
            RefreshMode::FullRefresh => {
                log::info!("Clearing {}...", self.store.root().display());
                summary.cleared = self.store.clear().await? as u64;
            }
            RefreshMode::Incremental => self.store.ensure_dir().await?,
        }

        for id in ids {
            summary.requested += 1;

            match fetch_paced(self.source.as_ref(), id, kind, self.delay).await {
                Ok(FeedResponse::Payload(bytes)) => match self.store.write(id, &bytes).await {
                    Ok(path) => {
                        summary.stored += 1;
                        log::info!("Stored {} feed {} at {}", kind, id, path.display());
                    }
                    Err(e) => {
                        summary.failed += 1;
                        log::error!("Could not store {} feed {}: {}", kind, id, e);
                    }
                },
                Ok(FeedResponse::Empty) => {
                    summary.empty += 1;
                    log::warn!("Empty response for {} ID {}", kind, id);
                }
                Err(e) => {
                    summary.failed += 1;
                    log::error!("Request for {} ID {} failed: {}", kind, id, e);
                }
            }
        }

        console::summary(
            &format!("Fetch Results ({kind})"),
            &[
                ("Requested", summary.requested.to_string()),
                ("Stored", summary.stored.to_string()),
                ("Empty", summary.empty.to_string()),
                ("Failed", summary.failed.to_string()),
                ("Store", self.store.root().display().to_string()),
            ],
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::FetchError;
    use crate::services::testing::FakeFeed;
    use tempfile::TempDir;

    const FEED: &str = "BEGIN:VCALENDAR\nEND:VCALENDAR\n";

    fn fetcher(feed: Arc<FakeFeed>, tmp: &TempDir) -> BulkFetcher {
        BulkFetcher::new(feed, PayloadStore::new(tmp.path().join("groups")), Duration::ZERO)
    }

    #[tokio::test]
    async fn test_fetch_all_isolates_failures() {
        let tmp = TempDir::new().unwrap();
        let feed = Arc::new(
            FakeFeed::new()
                .with_text(1, FEED)
                .with(2, Err(FetchError::Status(500)))
                .with_text(4, FEED),
        );
        let fetcher = fetcher(feed.clone(), &tmp);

        let summary = fetcher
            .fetch_all(1..=4, FeedKind::Group, RefreshMode::Incremental)
            .await
            .unwrap();

        assert_eq!(
            summary,
            FetchSummary {
                requested: 4,
                stored: 2,
                empty: 1,
                failed: 1,
                cleared: 0,
            }
        );
        assert_eq!(summary.unsuccessful(), 2);

        let ids: Vec<_> = fetcher.store().list().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![Some(1), Some(4)]);
        assert!(feed.calls().iter().all(|(_, kind)| *kind == FeedKind::Group));
    }

    #[tokio::test]
    async fn test_payload_is_stored_verbatim() {
        let tmp = TempDir::new().unwrap();
        let bytes = vec![0xD0, 0x91, 0xFF, b'\r', b'\n'];
        let feed = Arc::new(FakeFeed::new().with(9, Ok(FeedResponse::Payload(bytes.clone()))));
        let fetcher = fetcher(feed, &tmp);

        fetcher
            .fetch_all([9], FeedKind::Room, RefreshMode::Incremental)
            .await
            .unwrap();

        assert_eq!(std::fs::read(fetcher.store().path_for(9)).unwrap(), bytes);
    }

    #[tokio::test]
    async fn test_full_refresh_leaves_only_current_ids() {
        let tmp = TempDir::new().unwrap();
        let feed = Arc::new(FakeFeed::new().with_text(20, FEED).with_text(21, FEED));
        let fetcher = fetcher(feed, &tmp);

        for stale in [5, 20, 99] {
            fetcher.store().write(stale, b"old").await.unwrap();
        }

        let summary = fetcher
            .fetch_all(20..=22, FeedKind::Group, RefreshMode::FullRefresh)
            .await
            .unwrap();

        assert_eq!(summary.cleared, 3);
        let ids: Vec<_> = fetcher.store().list().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![Some(20), Some(21)]);
        assert_eq!(std::fs::read(fetcher.store().path_for(20)).unwrap(), FEED.as_bytes());
    }

    #[tokio::test]
    async fn test_incremental_keeps_existing_files() {
        let tmp = TempDir::new().unwrap();
        let feed = Arc::new(FakeFeed::new().with_text(2, FEED));
        let fetcher = fetcher(feed, &tmp);
        fetcher.store().write(1, b"old").await.unwrap();

        fetcher
            .fetch_all([2], FeedKind::Group, RefreshMode::Incremental)
            .await
            .unwrap();

        assert_eq!(fetcher.store().list().await.unwrap().len(), 2);
    }
}
