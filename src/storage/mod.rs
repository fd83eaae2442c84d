//! Durable state of the pipeline.
//!
//! ## Directory Structure
//!
//! ```text
//! {storage_dir}/
//! ├── discovery.checkpoint     # Last probed room identifier
//! ├── last_fetch_rooms.json    # Report of the last room fetch
//! ├── last_fetch_groups.json   # Report of the last group fetch
//! ├── rooms/                   # Content store, one feed per room
//! │   └── calendar_{id}.ics
//! └── groups/                  # Content store, one feed per group
//!     └── calendar_{id}.ics
//! ```
//!
//! The identifier list (`auth_id.txt` by default) lives wherever
//! `paths.identifiers_file` points.

pub mod checkpoint;
pub mod identifiers;
pub mod local;
pub mod report;

use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::error::Result;

// Re-export for convenience
pub use checkpoint::Checkpoint;
pub use identifiers::{IdentifierList, parse_identifiers};
pub use local::{PayloadStore, StoredPayload};
pub use report::FetchReport;

/// Create the parent directory of `path` if needed.
pub(crate) async fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }
    Ok(())
}

/// Write bytes atomically (write to temp, then rename).
pub(crate) async fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    ensure_parent(path).await?;

    let tmp = path.with_extension("tmp");
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}
