//! `IContentFetcher` implementation for plain HTTP sources
//!
//! Used by the import flow: given a URL, pulls the content into memory and
//! reports whatever the source volunteered about media type and file name.
//! The media type comes from the `Content-Type` header with its parameters
//! stripped; the file name comes from the last path segment of the URL.

use anyhow::{Context, Result};
use reqwest::Client;
use tracing::debug;

use drivemirror_core::ports::{FetchedContent, IContentFetcher};

/// Content fetcher backed by a plain HTTP client
///
/// Carries no authentication; sources must be publicly reachable.
#[derive(Debug, Clone, Default)]
pub struct HttpContentFetcher {
    client: Client,
}

impl HttpContentFetcher {
    /// Creates a fetcher with a default HTTP client
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl IContentFetcher for HttpContentFetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedContent> {
        debug!(url, "HttpContentFetcher::fetch");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?
            .error_for_status()
            .with_context(|| format!("Fetch of {url} returned error status"))?;

        let mime_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.split(';').next().unwrap_or(value).trim().to_string())
            .filter(|value| !value.is_empty());

        let file_name = file_name_from_url(url);

        let data = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read content of {url}"))?
            .to_vec();

        debug!("Fetched {} bytes from {}", data.len(), url);

        Ok(FetchedContent {
            data,
            mime_type,
            file_name,
        })
    }
}

/// Derives a file name from the last path segment of a URL
///
/// Returns `None` when the URL does not parse or the path ends in a slash.
fn file_name_from_url(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    parsed
        .path_segments()
        .and_then(|segments| segments.last())
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
}
