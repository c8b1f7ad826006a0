//! DriveMirror GDrive - Google Drive v3 API client
//!
//! Provides async access to:
//! - File creation and update via multipart upload
//! - File download, deletion and metadata lookup
//! - Arbitrary HTTP content retrieval for imports
//!
//! ## Modules
//!
//! - [`auth`] - Access token loading
//! - [`client`] - Google Drive v3 HTTP client
//! - [`provider`] - `IRemoteStore` implementation backed by the client
//! - [`fetcher`] - `IContentFetcher` implementation for HTTP URLs

pub mod auth;
pub mod client;
pub mod fetcher;
pub mod provider;
