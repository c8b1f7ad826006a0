//! Domain entities and business logic
//!
//! This module contains the core domain types for Drive Mirror:
//! - Newtypes for type-safe identifiers and validated domain values
//! - The FileRecord entity and its sync-status state machine
//! - Domain-specific error types

pub mod errors;
pub mod file_record;
pub mod newtypes;

// Re-export commonly used types
pub use errors::DomainError;
pub use file_record::{FileRecord, SyncStatus};
pub use newtypes::{MimeType, RecordId, RemoteFileId, StorageKey};
