//! Filesystem blob store (secondary/driven adapter)
//!
//! Implements [`IBlobStore`] using `tokio::fs` over a single content
//! directory.
//!
//! ## Design Decisions
//!
//! - **Atomic writes**: Uses write-to-temp + rename to avoid partial writes
//!   on crash or power loss.
//! - **Root bootstrap**: The content directory is created on construction,
//!   so a fresh installation works without manual setup.
//! - **Plain key mapping**: [`StorageKey`] validation already rejects
//!   absolute paths and traversal segments, so `resolve` is a simple join
//!   under the root.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context;
use drivemirror_core::domain::newtypes::StorageKey;
use drivemirror_core::ports::IBlobStore;
use tracing::{debug, info, instrument};

// ============================================================================
// FsBlobStore struct
// ============================================================================

/// Adapter that bridges the [`IBlobStore`] port to the real filesystem.
///
/// All content lives under one root directory; keys are relative paths
/// below it.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    /// Create a new `FsBlobStore` rooted at `root`, creating the directory
    /// if it does not exist yet.
    ///
    /// # Errors
    /// Returns error if the root directory cannot be created.
    pub fn new(root: &Path) -> anyhow::Result<Self> {
        std::fs::create_dir_all(root)
            .with_context(|| format!("Failed to create blob root: {}", root.display()))?;
        info!(root = %root.display(), "Blob store ready");
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// The directory blobs live under.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

// ============================================================================
// IBlobStore implementation
// ============================================================================

#[async_trait::async_trait]
impl IBlobStore for FsBlobStore {
    #[instrument(skip(self), fields(key = %key))]
    async fn exists(&self, key: &StorageKey) -> anyhow::Result<bool> {
        match tokio::fs::metadata(self.resolve(key)).await {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    #[instrument(skip(self, data), fields(key = %key, bytes = data.len()))]
    async fn write(&self, key: &StorageKey, data: &[u8]) -> anyhow::Result<()> {
        let target = self.resolve(key);

        // Nested keys need their parent directory first.
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write to a temporary file in the same directory so rename is atomic
        // (same filesystem).
        let tmp_path = {
            let mut p = target.as_os_str().to_owned();
            p.push(".tmp");
            PathBuf::from(p)
        };

        debug!(?tmp_path, "writing to temporary file");
        tokio::fs::write(&tmp_path, data).await?;

        debug!("renaming temporary file to target");
        tokio::fs::rename(&tmp_path, &target).await?;

        debug!("write complete");
        Ok(())
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn read(&self, key: &StorageKey) -> anyhow::Result<Vec<u8>> {
        debug!("reading blob");
        let data = tokio::fs::read(self.resolve(key)).await?;
        debug!(bytes = data.len(), "blob read complete");
        Ok(data)
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn delete(&self, key: &StorageKey) -> anyhow::Result<()> {
        tokio::fs::remove_file(self.resolve(key)).await?;
        debug!("blob deleted");
        Ok(())
    }

    #[instrument(skip(self), fields(key = %key))]
    async fn size_of(&self, key: &StorageKey) -> anyhow::Result<u64> {
        let meta = tokio::fs::metadata(self.resolve(key)).await?;
        Ok(meta.len())
    }

    fn resolve(&self, key: &StorageKey) -> PathBuf {
        self.root.join(key.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store(dir: &TempDir) -> FsBlobStore {
        FsBlobStore::new(&dir.path().join("uploads")).unwrap()
    }

    fn key(s: &str) -> StorageKey {
        StorageKey::new(s.to_string()).unwrap()
    }

    #[test]
    fn test_new_creates_root() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("data").join("uploads");
        let _store = FsBlobStore::new(&nested).unwrap();
        assert!(nested.is_dir());
    }

    #[tokio::test]
    async fn test_write_and_read() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let k = key("blob.bin");

        store.write(&k, b"hello world").await.unwrap();
        let data = store.read(&k).await.unwrap();
        assert_eq!(data, b"hello world");
    }

    #[tokio::test]
    async fn test_write_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let k = key("blob.bin");

        store.write(&k, b"first").await.unwrap();
        store.write(&k, b"second").await.unwrap();
        assert_eq!(store.read(&k).await.unwrap(), b"second");
    }

    #[tokio::test]
    async fn test_write_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);

        store.write(&key("blob.bin"), b"content").await.unwrap();

        let entries = std::fs::read_dir(store.root()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[tokio::test]
    async fn test_exists() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let k = key("blob.bin");

        assert!(!store.exists(&k).await.unwrap());
        store.write(&k, b"x").await.unwrap();
        assert!(store.exists(&k).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_removes_blob() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let k = key("blob.bin");

        store.write(&k, b"x").await.unwrap();
        store.delete(&k).await.unwrap();
        assert!(!store.exists(&k).await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_missing_fails() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.delete(&key("ghost.bin")).await.is_err());
    }

    #[tokio::test]
    async fn test_size_of() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let k = key("blob.bin");

        store.write(&k, b"12345").await.unwrap();
        assert_eq!(store.size_of(&k).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn test_size_of_missing_fails() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        assert!(store.size_of(&key("ghost.bin")).await.is_err());
    }

    #[tokio::test]
    async fn test_resolve_joins_root() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let k = key("blob.bin");
        assert_eq!(store.resolve(&k), store.root().join("blob.bin"));
    }

    #[tokio::test]
    async fn test_nested_key_creates_parent() {
        let dir = TempDir::new().unwrap();
        let store = store(&dir);
        let k = key("2026/08/blob.bin");

        store.write(&k, b"nested").await.unwrap();
        assert_eq!(store.read(&k).await.unwrap(), b"nested");
    }
}
