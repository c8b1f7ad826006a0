//! Content fetcher port (driven/secondary port)
//!
//! This module defines the interface for pulling content from an external
//! URL during intake. The primary implementation wraps an HTTP client.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result`; a fetch failure has no domain classification
//!   beyond aborting the intake.
//! - The DTO carries whatever the source volunteered about itself. Intake
//!   falls back to its own defaults when the hints are missing.

// ============================================================================
// FetchedContent DTO
// ============================================================================

/// Content retrieved from an external source
#[derive(Debug, Clone)]
pub struct FetchedContent {
    /// Raw bytes of the fetched content
    pub data: Vec<u8>,
    /// Media type the source reported, if any
    pub mime_type: Option<String>,
    /// File name derived from the source, if one could be determined
    pub file_name: Option<String>,
}

// ============================================================================
// IContentFetcher trait
// ============================================================================

/// Port trait for retrieving content from a URL
#[async_trait::async_trait]
pub trait IContentFetcher: Send + Sync {
    /// Fetches the content behind a URL
    ///
    /// # Arguments
    /// * `url` - Absolute URL of the content to retrieve
    async fn fetch(&self, url: &str) -> anyhow::Result<FetchedContent>;
}
