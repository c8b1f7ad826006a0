//! DriveMirror Engine - Drive reconciliation engine
//!
//! Provides:
//! - Reconciliation passes that push pending content and retire deletion
//!   requests against the remote backend
//! - Batch restore of locally missing blobs from their remote mirrors
//! - The filesystem blob store that holds local content
//!
//! ## Modules
//!
//! - [`engine`] - Reconciliation engine orchestrating push/delete/restore
//! - [`blobs`] - Local filesystem blob store (atomic writes)

pub mod blobs;
pub mod engine;
