//! Service layer for the ingestion pipeline.
//!
//! This module contains the business logic for:
//! - Feed requests (`HttpFeedClient`, behind the `FeedSource` trait)
//! - Room discovery (`IdentifierDiscoverer`)
//! - Bulk downloads into the content store (`BulkFetcher`)
//! - Lesson extraction (`CalendarExtractor`)
//! - Dataset export (`exporter`)

mod discovery;
pub mod exporter;
mod extractor;
mod feed;
mod fetcher;

#[cfg(test)]
pub(crate) mod testing;

pub use discovery::{
    DiscoverySummary, IdentifierDiscoverer, MarkerFilter, Probe, RejectReason, Verdict,
};
pub use extractor::{CalendarExtractor, Dataset, ExtractionReport};
pub use feed::{FeedResponse, FeedSource, FetchError, HttpFeedClient, fetch_paced};
pub use fetcher::{BulkFetcher, FetchSummary, RefreshMode};
