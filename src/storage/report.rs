//! Persisted report of the last bulk fetch.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::FeedKind;
use crate::services::FetchSummary;
use crate::storage::write_atomic;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchReport {
    pub kind: FeedKind,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub full_refresh: bool,
    pub summary: FetchSummary,
}

impl FetchReport {
    pub async fn save(&self, path: &Path) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(self)?;
        write_atomic(path, &bytes).await
    }

    /// Load a report, `None` if no fetch has been recorded yet.
    pub async fn load(path: &Path) -> Result<Option<Self>> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
