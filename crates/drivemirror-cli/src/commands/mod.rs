//! Command implementations for the drivemirror CLI
//!
//! Each command module owns its clap argument struct and an `execute`
//! method. The helpers here wire the shared adapter stack (database, blob
//! store, Drive client) from the loaded configuration so the commands stay
//! focused on their own flow.

pub mod add;
pub mod config;
pub mod replace;
pub mod status;
pub mod sync;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::debug;

use drivemirror_core::config::Config;
use drivemirror_core::domain::FileRecord;
use drivemirror_core::usecases::{FileIntakeUseCase, IntakeError};
use drivemirror_engine::blobs::FsBlobStore;
use drivemirror_engine::engine::ReconcileEngine;
use drivemirror_gdrive::auth;
use drivemirror_gdrive::client::DriveClient;
use drivemirror_gdrive::fetcher::HttpContentFetcher;
use drivemirror_gdrive::provider::DriveRemoteStore;
use drivemirror_store::{DatabasePool, SqliteRecordRepository};

use crate::output::OutputFormatter;

/// Opens the database and returns the record repository
pub(crate) async fn open_repository(config: &Config) -> Result<Arc<SqliteRecordRepository>> {
    let pool = DatabasePool::new(&config.database.path)
        .await
        .context("Failed to open database")?;

    debug!(path = %config.database.path.display(), "Database ready");
    Ok(Arc::new(SqliteRecordRepository::new(pool.pool().clone())))
}

/// Builds the blob store rooted at the configured uploads directory
pub(crate) fn open_blob_store(config: &Config) -> Result<Arc<FsBlobStore>> {
    let store = FsBlobStore::new(&config.storage.uploads_dir)
        .context("Failed to prepare the uploads directory")?;
    Ok(Arc::new(store))
}

/// Builds the Drive remote store with a resolved access token
pub(crate) fn open_remote_store(config: &Config) -> Result<Arc<DriveRemoteStore>> {
    let token = auth::load_access_token(config.remote.token_file.as_deref())?;
    let mut client = DriveClient::new(token);
    if let Some(folder) = &config.remote.folder_id {
        client = client.with_parent_folder(folder);
    }
    Ok(Arc::new(DriveRemoteStore::new(client)))
}

/// Builds the intake use case over the configured adapters
pub(crate) async fn intake_use_case(config: &Config) -> Result<FileIntakeUseCase> {
    let records = open_repository(config).await?;
    let blobs = open_blob_store(config)?;
    let fetcher = Arc::new(HttpContentFetcher::new());

    Ok(FileIntakeUseCase::new(
        records,
        blobs,
        fetcher,
        config.max_upload_bytes(),
    ))
}

/// Builds the reconciliation engine over the configured adapters
pub(crate) async fn reconcile_engine(config: &Config) -> Result<ReconcileEngine> {
    let records = open_repository(config).await?;
    let blobs = open_blob_store(config)?;
    let remote = open_remote_store(config)?;

    Ok(ReconcileEngine::new(remote, records, blobs))
}

/// Renders a file record as a JSON value for `--json` output
pub(crate) fn record_json(record: &FileRecord) -> serde_json::Value {
    serde_json::json!({
        "id": record.id().to_string(),
        "name": record.original_name(),
        "status": record.status().name(),
        "storage_key": record.storage_key().as_str(),
        "mime_type": record.mime_type().as_str(),
        "size_bytes": record.size_bytes(),
        "remote_id": record.remote_id().map(|r| r.to_string()),
        "created_at": record.created_at().to_rfc3339(),
        "updated_at": record.updated_at().to_rfc3339(),
    })
}

/// Reports intake failures the user can act on; propagates the rest
///
/// `IntakeError` variants (unknown id, oversized content) are user input
/// problems and come out as a formatted error line instead of an error exit.
pub(crate) fn report_intake_error(
    err: anyhow::Error,
    formatter: &dyn OutputFormatter,
) -> Result<()> {
    match err.downcast_ref::<IntakeError>() {
        Some(intake_err) => {
            formatter.error(&intake_err.to_string());
            Ok(())
        }
        None => Err(err),
    }
}
