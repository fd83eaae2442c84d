//! Discovery scan checkpoint.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::storage::write_atomic;

/// Last identifier a discovery scan finished probing.
#[derive(Debug, Clone)]
pub struct Checkpoint {
    path: PathBuf,
}

impl Checkpoint {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the checkpoint, `None` when absent or unreadable as a number.
    pub async fn load(&self) -> Result<Option<u64>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(content.trim().parse().ok()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, last_probed: u64) -> Result<()> {
        write_atomic(&self.path, format!("{last_probed}\n").as_bytes()).await
    }

    /// Forget the checkpoint, so the next scan starts from the range start.
    pub async fn reset(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
