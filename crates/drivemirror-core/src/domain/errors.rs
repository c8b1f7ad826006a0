//! Domain error types
//!
//! This module defines error types specific to domain operations,
//! including validation failures and invalid sync-status transitions.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Invalid local blob storage key
    #[error("Invalid storage key: {0}")]
    InvalidStorageKey(String),

    /// Invalid remote file ID format
    #[error("Invalid remote file ID: {0}")]
    InvalidRemoteFileId(String),

    /// Invalid mime type format
    #[error("Invalid mime type: {0}")]
    InvalidMimeType(String),

    /// Invalid sync-status transition attempt
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        /// The current status
        from: String,
        /// The attempted target status
        to: String,
    },

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// ID parsing error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),
}
