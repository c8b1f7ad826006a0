//! Blob store port (driven/secondary port)
//!
//! This module defines the interface for local content storage. Records hold
//! a [`StorageKey`](crate::domain::newtypes::StorageKey); this port maps keys
//! to bytes on disk.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because failures here are I/O-flavored and carry
//!   no domain meaning beyond "the blob operation failed".
//! - `resolve` is synchronous and infallible: it computes where a key lives
//!   without touching the filesystem. Callers that need the path to exist
//!   pair it with `exists`.
//! - Writes are atomic. A crash mid-write must never leave a torn blob
//!   visible under its key.

use std::path::PathBuf;

use crate::domain::newtypes::StorageKey;

// ============================================================================
// IBlobStore trait
// ============================================================================

/// Port trait for local content storage
#[async_trait::async_trait]
pub trait IBlobStore: Send + Sync {
    /// Checks whether content exists under a key
    async fn exists(&self, key: &StorageKey) -> anyhow::Result<bool>;

    /// Writes content under a key, replacing any previous content
    async fn write(&self, key: &StorageKey, data: &[u8]) -> anyhow::Result<()>;

    /// Reads the full content stored under a key
    async fn read(&self, key: &StorageKey) -> anyhow::Result<Vec<u8>>;

    /// Removes the content stored under a key
    ///
    /// Removing a key that does not exist is an error; callers check
    /// `exists` first when absence is acceptable.
    async fn delete(&self, key: &StorageKey) -> anyhow::Result<()>;

    /// Returns the size in bytes of the content stored under a key
    async fn size_of(&self, key: &StorageKey) -> anyhow::Result<u64>;

    /// Computes the filesystem path a key resolves to
    ///
    /// Does not check existence. Used to hand blob locations to transfer
    /// code that streams directly from or to disk.
    fn resolve(&self, key: &StorageKey) -> PathBuf;
}
