//! Local filesystem content store.
//!
//! One raw feed per identifier, stored verbatim as `calendar_{id}.ics`.
//! Writes go through a temporary sibling and a rename, so a run killed
//! mid-write never leaves a truncated feed behind.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::storage::write_atomic;

const FILE_PREFIX: &str = "calendar_";
const FILE_EXTENSION: &str = "ics";

/// A feed file found in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredPayload {
    /// Identifier parsed from the file name, if it follows the convention
    pub id: Option<u64>,
    pub path: PathBuf,
}

/// Directory of raw per-identifier feeds.
#[derive(Debug, Clone)]
pub struct PayloadStore {
    root_dir: PathBuf,
}

impl PayloadStore {
    /// Create a store rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root_dir
    }

    /// File name for an identifier.
    pub fn file_name(id: u64) -> String {
        format!("{FILE_PREFIX}{id}.{FILE_EXTENSION}")
    }

    /// Identifier encoded in a feed file name.
    pub fn parse_file_name(name: &str) -> Option<u64> {
        name.strip_prefix(FILE_PREFIX)?
            .strip_suffix(FILE_EXTENSION)?
            .strip_suffix('.')?
            .parse()
            .ok()
    }

    /// Full path of the feed file for an identifier.
    pub fn path_for(&self, id: u64) -> PathBuf {
        self.root_dir.join(Self::file_name(id))
    }

    /// Create the store directory if absent.
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.root_dir)
            .await
            .map_err(|e| AppError::storage(self.root_dir.display().to_string(), e))
    }

    /// Remove every file in the store. Returns the number removed.
    ///
    /// Subdirectories are left alone.
    pub async fn clear(&self) -> Result<usize> {
        self.ensure_dir().await?;

        let mut removed = 0;
        let mut entries = tokio::fs::read_dir(&self.root_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                tokio::fs::remove_file(entry.path()).await?;
                removed += 1;
            }
        }

        log::info!(
            "Cleared {} file(s) from {}",
            removed,
            self.root_dir.display()
        );
        Ok(removed)
    }

    /// Store a payload verbatim under its identifier.
    pub async fn write(&self, id: u64, bytes: &[u8]) -> Result<PathBuf> {
        let path = self.path_for(id);
        write_atomic(&path, bytes).await?;
        Ok(path)
    }

    /// Read a stored payload.
    pub async fn read(&self, payload: &StoredPayload) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(&payload.path).await?)
    }

    /// All feed files in the store, ordered numerically by identifier.
    ///
    /// Files with a `.ics` extension but an unconventional name are kept
    /// and sorted after the numbered ones, by path.
    pub async fn list(&self) -> Result<Vec<StoredPayload>> {
        let mut entries = tokio::fs::read_dir(&self.root_dir)
            .await
            .map_err(|e| AppError::storage(self.root_dir.display().to_string(), e))?;

        let mut payloads = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let is_feed = path
                .extension()
                .is_some_and(|ext| ext == FILE_EXTENSION);
            if !is_feed || !entry.file_type().await?.is_file() {
                continue;
            }

            let id = path
                .file_name()
                .and_then(|name| name.to_str())
                .and_then(Self::parse_file_name);
            payloads.push(StoredPayload { id, path });
        }

        payloads.sort_by(|a, b| {
            (a.id.is_none(), a.id, &a.path).cmp(&(b.id.is_none(), b.id, &b.path))
        });
        Ok(payloads)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_name_round_trip() {
        assert_eq!(PayloadStore::file_name(8149), "calendar_8149.ics");
        assert_eq!(PayloadStore::parse_file_name("calendar_8149.ics"), Some(8149));
        assert_eq!(PayloadStore::parse_file_name("calendar_x.ics"), None);
        assert_eq!(PayloadStore::parse_file_name("calendar_12.tmp"), None);
        assert_eq!(PayloadStore::parse_file_name("feed_12.ics"), None);
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let store = PayloadStore::new(tmp.path().join("rooms"));

        let path = store.write(42, b"BEGIN:VCALENDAR").await.unwrap();
        assert_eq!(path, tmp.path().join("rooms").join("calendar_42.ics"));

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, Some(42));
        assert_eq!(store.read(&listed[0]).await.unwrap(), b"BEGIN:VCALENDAR");
    }

    #[tokio::test]
    async fn test_list_sorts_numerically() {
        let tmp = TempDir::new().unwrap();
        let store = PayloadStore::new(tmp.path());

        for id in [100, 9, 25] {
            store.write(id, b"x").await.unwrap();
        }
        std::fs::write(tmp.path().join("extra.ics"), b"x").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), b"x").unwrap();

        let ids: Vec<_> = store.list().await.unwrap().into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![Some(9), Some(25), Some(100), None]);
    }

    #[tokio::test]
    async fn test_clear_removes_files_only() {
        let tmp = TempDir::new().unwrap();
        let store = PayloadStore::new(tmp.path());

        store.write(1, b"a").await.unwrap();
        store.write(2, b"b").await.unwrap();
        std::fs::create_dir(tmp.path().join("keep")).unwrap();

        assert_eq!(store.clear().await.unwrap(), 2);
        assert!(store.list().await.unwrap().is_empty());
        assert!(tmp.path().join("keep").is_dir());
    }

    #[tokio::test]
    async fn test_clear_creates_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let store = PayloadStore::new(tmp.path().join("new"));

        assert_eq!(store.clear().await.unwrap(), 0);
        assert!(store.root().is_dir());
    }

    #[tokio::test]
    async fn test_list_missing_dir_is_error() {
        let tmp = TempDir::new().unwrap();
        let store = PayloadStore::new(tmp.path().join("absent"));
        assert!(matches!(store.list().await, Err(AppError::Storage { .. })));
    }
}
