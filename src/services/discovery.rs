// src/services/discovery.rs

//! Room identifier discovery.
//!
//! Probes every identifier of a range in room mode and keeps the ones whose
//! feed mentions a location of interest. The scan is strictly sequential:
//! the fixed pause after each request is the only rate limit.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, Stream, StreamExt};
use serde::Serialize;

use crate::error::Result;
use crate::models::{Config, DiscoveryConfig, FeedKind, IdRange};
use crate::services::{FeedResponse, FeedSource, FetchError, fetch_paced};
use crate::storage::{Checkpoint, IdentifierList};
use crate::utils::{console, decode_payload};

/// Why a feed was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The feed contains the excluded sub-variant marker
    Excluded,
    /// The feed lacks the marker altogether
    Unmarked,
}

/// Outcome of probing one identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accepted,
    Rejected(RejectReason),
    /// The service returned an empty body
    Empty,
    Failed(FetchError),
}

/// One probed identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Probe {
    pub id: u64,
    pub verdict: Verdict,
    /// Some feed bytes were not valid UTF-8 and were dropped before matching
    pub lossy: bool,
}

/// Text-presence acceptance rule.
#[derive(Debug, Clone)]
pub struct MarkerFilter {
    include: String,
    exclude: String,
}

impl MarkerFilter {
    pub fn new(include: impl Into<String>, exclude: impl Into<String>) -> Self {
        Self {
            include: include.into(),
            exclude: exclude.into(),
        }
    }

    pub fn from_config(config: &DiscoveryConfig) -> Self {
        Self::new(&config.include_marker, &config.exclude_marker)
    }

    /// Classify feed text. The exclusion is checked first, so text carrying
    /// both markers is rejected.
    pub fn classify(&self, text: &str) -> Verdict {
        if text.contains(&self.exclude) {
            Verdict::Rejected(RejectReason::Excluded)
        } else if text.contains(&self.include) {
            Verdict::Accepted
        } else {
            Verdict::Rejected(RejectReason::Unmarked)
        }
    }
}

/// Counts of a discovery run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DiscoverySummary {
    pub probed: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub empty: u64,
    pub failed: u64,
    /// Last identifier fully processed, the resume point of the next run
    pub last_probed: Option<u64>,
}

impl DiscoverySummary {
    fn record(&mut self, probe: &Probe) {
        self.probed += 1;
        self.last_probed = Some(probe.id);
        match probe.verdict {
            Verdict::Accepted => self.accepted += 1,
            Verdict::Rejected(_) => self.rejected += 1,
            Verdict::Empty => self.empty += 1,
            Verdict::Failed(_) => self.failed += 1,
        }
    }
}

/// Service scanning room identifiers for feeds that pass a [`MarkerFilter`].
pub struct IdentifierDiscoverer {
    source: Arc<dyn FeedSource>,
    filter: MarkerFilter,
    delay: Duration,
    checkpoint_every: u64,
}

impl IdentifierDiscoverer {
    pub fn new(source: Arc<dyn FeedSource>, config: &Config) -> Self {
        Self {
            source,
            filter: MarkerFilter::from_config(&config.discovery),
            delay: config.feed.request_delay(),
            checkpoint_every: config.discovery.checkpoint_every.max(1),
        }
    }

    /// Probe a single identifier, pausing afterwards.
    pub async fn probe(&self, id: u64) -> Probe {
        let response = fetch_paced(self.source.as_ref(), id, FeedKind::Room, self.delay).await;

        let (verdict, lossy) = match response {
            Ok(FeedResponse::Payload(bytes)) => {
                let decoded = decode_payload(&bytes);
                (self.filter.classify(&decoded.text), decoded.is_lossy())
            }
            Ok(FeedResponse::Empty) => (Verdict::Empty, false),
            Err(error) => (Verdict::Failed(error), false),
        };

        Probe { id, verdict, lossy }
    }

    /// Lazily probe every identifier of `range`, in order.
    ///
    /// Nothing is requested until the stream is polled, and dropping the
    /// stream stops the scan. Callers checkpoint by remembering the last
    /// yielded id and resuming with [`IdRange::resume_after`].
    pub fn scan(&self, range: IdRange) -> impl Stream<Item = Probe> + '_ {
        stream::iter(range.ids()).then(move |id| self.probe(id))
    }

    /// Scan `range`, appending every accepted identifier to `list` as soon
    /// as it is found.
    ///
    /// Per-identifier failures are logged and counted. Only a failure to
    /// write the identifier list ends the run early.
    pub async fn discover(
        &self,
        range: IdRange,
        list: &IdentifierList,
        checkpoint: Option<&Checkpoint>,
    ) -> Result<DiscoverySummary> {
        console::header(&format!("Discovering rooms in {range}"));

        let mut summary = DiscoverySummary::default();
        let mut probes = std::pin::pin!(self.scan(range));

        while let Some(probe) = probes.next().await {
            if probe.lossy {
                log::warn!("ID {}: feed contained undecodable bytes", probe.id);
            }

            match &probe.verdict {
                Verdict::Accepted => {
                    list.append(probe.id).await?;
                    log::info!("Added ID {}: marker found", probe.id);
                }
                Verdict::Rejected(RejectReason::Excluded) => {
                    log::info!("Skipped ID {}: excluded marker present", probe.id);
                }
                Verdict::Rejected(RejectReason::Unmarked) => {
                    log::info!("Skipped ID {}: no marker", probe.id);
                }
                Verdict::Empty => log::warn!("Empty response for ID {}", probe.id),
                Verdict::Failed(error) => {
                    log::error!("Request for ID {} failed: {}", probe.id, error)
                }
            }

            summary.record(&probe);

            if let Some(checkpoint) = checkpoint {
                if summary.probed % self.checkpoint_every == 0 {
                    save_checkpoint(checkpoint, probe.id).await;
                }
            }
        }

        if let (Some(checkpoint), Some(last)) = (checkpoint, summary.last_probed) {
            save_checkpoint(checkpoint, last).await;
        }

        console::summary(
            "Discovery Results",
            &[
                ("Probed", summary.probed.to_string()),
                ("Accepted", summary.accepted.to_string()),
                ("Rejected", summary.rejected.to_string()),
                ("Empty", summary.empty.to_string()),
                ("Failed", summary.failed.to_string()),
                ("Written to", list.path().display().to_string()),
            ],
        );

        Ok(summary)
    }
}

async fn save_checkpoint(checkpoint: &Checkpoint, id: u64) {
    if let Err(e) = checkpoint.save(id).await {
        log::warn!(
            "Could not save checkpoint {}: {}",
            checkpoint.path().display(),
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::testing::FakeFeed;
    use futures::StreamExt;
    use tempfile::TempDir;

    fn config() -> Config {
        let mut config = Config::default();
        config.feed.request_delay_ms = 0;
        config.discovery.checkpoint_every = 2;
        config
    }

    fn feed_with_location(location: &str) -> String {
        format!("BEGIN:VEVENT\nSUMMARY:лек Тест\nLOCATION:{location}\nEND:VEVENT\n")
    }

    #[test]
    fn test_filter_order_matters() {
        let filter = MarkerFilter::from_config(&DiscoveryConfig::default());

        assert_eq!(filter.classify("LOCATION:Б-204"), Verdict::Accepted);
        assert_eq!(
            filter.classify("LOCATION:Б1-101"),
            Verdict::Rejected(RejectReason::Excluded)
        );
        assert_eq!(
            filter.classify("LOCATION:Б-204\nLOCATION:Б1-101"),
            Verdict::Rejected(RejectReason::Excluded)
        );
        assert_eq!(
            filter.classify("LOCATION:А-12"),
            Verdict::Rejected(RejectReason::Unmarked)
        );
    }

    #[tokio::test]
    async fn test_scan_is_lazy_and_ordered() {
        let feed = Arc::new(FakeFeed::new().with_text(2, &feed_with_location("Б-2")));
        let discoverer = IdentifierDiscoverer::new(feed.clone(), &config());

        let first_two: Vec<Probe> = discoverer.scan(IdRange::new(1, 100)).take(2).collect().await;

        assert_eq!(first_two[0].verdict, Verdict::Empty);
        assert_eq!(first_two[1].verdict, Verdict::Accepted);
        assert_eq!(feed.calls(), vec![(1, FeedKind::Room), (2, FeedKind::Room)]);
    }

    #[tokio::test]
    async fn test_discover_appends_accepted_and_continues_after_errors() {
        let tmp = TempDir::new().unwrap();
        let list = IdentifierList::new(tmp.path().join("auth_id.txt"));
        let checkpoint = Checkpoint::new(tmp.path().join("discovery.checkpoint"));

        let feed = Arc::new(
            FakeFeed::new()
                .with_text(10, &feed_with_location("Б-204"))
                .with(11, Err(FetchError::Timeout))
                .with_text(12, &feed_with_location("Б1-3"))
                .with_text(13, &feed_with_location("А-7"))
                .with_text(15, &feed_with_location("Б-310")),
        );
        let discoverer = IdentifierDiscoverer::new(feed.clone(), &config());

        let summary = discoverer
            .discover(IdRange::new(10, 15), &list, Some(&checkpoint))
            .await
            .unwrap();

        assert_eq!(list.read().await.unwrap(), vec![10, 15]);
        assert_eq!(
            summary,
            DiscoverySummary {
                probed: 6,
                accepted: 2,
                rejected: 2,
                empty: 1,
                failed: 1,
                last_probed: Some(15),
            }
        );
        assert_eq!(checkpoint.load().await.unwrap(), Some(15));
        assert_eq!(feed.calls().len(), 6);
    }

    #[tokio::test]
    async fn test_lossy_payload_still_matches() {
        let mut bytes = b"LOCATION:\xD0\x91-1\xFF\n".to_vec();
        bytes.push(b'\n');
        let feed = Arc::new(FakeFeed::new().with(1, Ok(FeedResponse::Payload(bytes))));
        let discoverer = IdentifierDiscoverer::new(feed, &config());

        let probe = discoverer.probe(1).await;
        assert_eq!(probe.verdict, Verdict::Accepted);
        assert!(probe.lossy);
    }
}
