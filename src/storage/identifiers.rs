//! Line-delimited list of discovered identifiers.

use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::storage::ensure_parent;

/// Append-only identifier list on disk.
///
/// Every accepted identifier is appended and flushed on its own, so the
/// file stays usable if a discovery run is interrupted.
#[derive(Debug, Clone)]
pub struct IdentifierList {
    path: PathBuf,
}

impl IdentifierList {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read all identifiers. A missing file is an error.
    pub async fn read(&self) -> Result<Vec<u64>> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| AppError::storage(self.path.display().to_string(), e))?;
        Ok(parse_identifiers(&content))
    }

    /// Create the list file if it does not exist yet, keeping any content.
    pub async fn ensure(&self) -> Result<()> {
        ensure_parent(&self.path).await?;

        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| AppError::storage(self.path.display().to_string(), e))?;
        Ok(())
    }

    /// Append one identifier.
    pub async fn append(&self, id: u64) -> Result<()> {
        ensure_parent(&self.path).await?;

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| AppError::storage(self.path.display().to_string(), e))?;
        file.write_all(format!("{id}\n").as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Parse identifiers from list text, ignoring lines that are not decimal
/// integers.
pub fn parse_identifiers(text: &str) -> Vec<u64> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.bytes().all(|b| b.is_ascii_digit()))
        .filter_map(|line| line.parse().ok())
        .collect()
}
