//! Integration tests for the HTTP content fetcher
//!
//! Verifies body retrieval plus the media-type and file-name hints that the
//! import flow relies on.

use drivemirror_core::ports::IContentFetcher;
use drivemirror_gdrive::fetcher::HttpContentFetcher;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_returns_body_mime_and_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/docs/report.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"%PDF-1.7".to_vec(), "application/pdf"))
        .mount(&server)
        .await;

    let fetcher = HttpContentFetcher::new();
    let url = format!("{}/docs/report.pdf", server.uri());
    let content = fetcher.fetch(&url).await.expect("Fetch failed");

    assert_eq!(content.data, b"%PDF-1.7");
    assert_eq!(content.mime_type.as_deref(), Some("application/pdf"));
    assert_eq!(content.file_name.as_deref(), Some("report.pdf"));
}

#[tokio::test]
async fn test_fetch_strips_content_type_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/page"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(b"<html></html>".to_vec(), "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let fetcher = HttpContentFetcher::new();
    let url = format!("{}/page", server.uri());
    let content = fetcher.fetch(&url).await.expect("Fetch failed");

    assert_eq!(content.mime_type.as_deref(), Some("text/html"));
}

#[tokio::test]
async fn test_fetch_ignores_query_for_file_name() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/files/archive.tar.gz"))
        .and(query_param("token", "abc"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(b"gz".to_vec(), "application/gzip"))
        .mount(&server)
        .await;

    let fetcher = HttpContentFetcher::new();
    let url = format!("{}/files/archive.tar.gz?token=abc", server.uri());
    let content = fetcher.fetch(&url).await.expect("Fetch failed");

    assert_eq!(content.file_name.as_deref(), Some("archive.tar.gz"));
}

#[tokio::test]
async fn test_fetch_empty_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/empty"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(Vec::new(), "text/plain"))
        .mount(&server)
        .await;

    let fetcher = HttpContentFetcher::new();
    let url = format!("{}/empty", server.uri());
    let content = fetcher.fetch(&url).await.expect("Fetch failed");

    assert!(content.data.is_empty());
}

#[tokio::test]
async fn test_fetch_error_status_fails() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = HttpContentFetcher::new();
    let url = format!("{}/missing", server.uri());
    let result = fetcher.fetch(&url).await;

    assert!(result.is_err());
}
