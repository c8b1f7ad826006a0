//! Integration tests for drivemirror-gdrive
//!
//! All tests run against a wiremock server standing in for the Drive v3
//! API; no network access is required.

mod common;

mod test_drive_operations;
mod test_fetcher;
mod test_provider;
