//! Whole-collection storage port.
//!
//! A port owns exactly one named slot holding the serialized task collection.
//! The record store only ever reads the full blob and writes the full blob
//! back, so implementations never need to understand the JSON inside.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

pub const DEFAULT_SLOT: &str = "todo-master-todos";

#[async_trait]
pub trait StoragePort: Send + Sync {
    /// Name of the slot this port reads and writes.
    fn slot(&self) -> &str;

    /// Returns the raw blob, or `None` if nothing has been stored yet.
    async fn load(&self) -> io::Result<Option<String>>;

    /// Replaces the stored blob.
    async fn save(&self, blob: String) -> io::Result<()>;
}

/// In-memory slot, used in tests and as a scratch store.
#[derive(Debug)]
pub struct MemoryStorage {
    slot: String,
    blob: RwLock<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            slot: DEFAULT_SLOT.to_string(),
            blob: RwLock::new(None),
        }
    }

    /// Starts with `blob` already stored, valid or not.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: DEFAULT_SLOT.to_string(),
            blob: RwLock::new(Some(blob.into())),
        }
    }

    pub async fn snapshot(&self) -> Option<String> {
        self.blob.read().await.clone()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StoragePort for MemoryStorage {
    fn slot(&self) -> &str {
        &self.slot
    }

    async fn load(&self) -> io::Result<Option<String>> {
        Ok(self.blob.read().await.clone())
    }

    async fn save(&self, blob: String) -> io::Result<()> {
        *self.blob.write().await = Some(blob);
        Ok(())
    }
}

/// One JSON file per slot under a data directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    slot: String,
    path: PathBuf,
}

impl FileStorage {
    /// Creates `dir` if needed. The slot lives at `<dir>/<slot>.json`.
    pub fn new(dir: impl AsRef<Path>, slot: impl Into<String>) -> io::Result<Self> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let slot = slot.into();
        let path = dir.join(format!("{slot}.json"));
        Ok(Self { slot, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StoragePort for FileStorage {
    fn slot(&self) -> &str {
        &self.slot
    }

    async fn load(&self) -> io::Result<Option<String>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err),
        }
    }

    async fn save(&self, blob: String) -> io::Result<()> {
        let path = self.path.clone();
        let temp_path = path.with_extension("json.tmp");
        let len = blob.len();
        // temp file + rename keeps the slot whole if the write is interrupted
        tokio::task::spawn_blocking(move || -> io::Result<()> {
            std::fs::write(&temp_path, blob)?;
            std::fs::rename(&temp_path, &path)
        })
        .await
        .map_err(|e| io::Error::other(format!("write task join error: {e}")))??;

        debug!(path = %self.path.display(), bytes = len, "saved task slot");
        Ok(())
    }
}
