//! In-memory feed source for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::FeedKind;
use crate::services::{FeedResponse, FeedSource, FetchError};

/// Serves canned responses; unknown identifiers answer with an empty body.
#[derive(Default)]
pub struct FakeFeed {
    responses: HashMap<u64, Result<FeedResponse, FetchError>>,
    calls: Mutex<Vec<(u64, FeedKind)>>,
}

impl FakeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, id: u64, response: Result<FeedResponse, FetchError>) -> Self {
        self.responses.insert(id, response);
        self
    }

    pub fn with_text(self, id: u64, text: &str) -> Self {
        self.with(id, Ok(FeedResponse::Payload(text.as_bytes().to_vec())))
    }

    /// Every request made so far, in order.
    pub fn calls(&self) -> Vec<(u64, FeedKind)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for FakeFeed {
    async fn fetch(&self, id: u64, kind: FeedKind) -> Result<FeedResponse, FetchError> {
        self.calls.lock().unwrap().push((id, kind));
        self.responses
            .get(&id)
            .cloned()
            .unwrap_or(Ok(FeedResponse::Empty))
    }
}
