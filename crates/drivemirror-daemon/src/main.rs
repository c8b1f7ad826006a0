//! DriveMirror Daemon - Background reconciliation service
//!
//! This binary runs as a long-lived service and handles:
//! - Periodic reconciliation passes against Google Drive
//! - Waiting for an access token when none is available yet
//! - Graceful shutdown on SIGTERM/SIGINT
//!
//! # Architecture
//!
//! The daemon wires the reconciliation engine from configuration, then
//! enters a main loop that runs one pass per poll interval. The loop is
//! controlled by a `CancellationToken` that is triggered on receipt of
//! SIGTERM or SIGINT.
//!
//! The engine serializes passes within this process only. Run a single
//! daemon per database; a concurrent `drivemirror sync` against the same
//! database is not coordinated with it.

use std::{sync::Arc, time::Duration};

use anyhow::{Context, Result};
use drivemirror_core::config::Config;
use drivemirror_core::ports::{IBlobStore, IRecordRepository};
use drivemirror_engine::blobs::FsBlobStore;
use drivemirror_engine::engine::ReconcileEngine;
use drivemirror_gdrive::{auth, client::DriveClient, provider::DriveRemoteStore};
use drivemirror_store::{DatabasePool, SqliteRecordRepository};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Seconds between token checks while no access token is available
const TOKEN_RETRY_SECS: u64 = 30;

// ============================================================================
// DaemonService struct
// ============================================================================

/// Main daemon service that orchestrates periodic reconciliation
///
/// Holds the configuration, the persistence adapters, and a cancellation
/// token for graceful shutdown.
struct DaemonService {
    /// Application configuration loaded from YAML
    config: Config,
    /// SQLite record repository
    records: Arc<SqliteRecordRepository>,
    /// Blob store holding managed content
    blobs: Arc<FsBlobStore>,
    /// Token for signalling graceful shutdown to all async tasks
    shutdown: CancellationToken,
}

impl DaemonService {
    /// Creates a new DaemonService
    ///
    /// Opens the database and the blob store from the given configuration.
    async fn new(config: Config, shutdown: CancellationToken) -> Result<Self> {
        let db_pool = DatabasePool::new(&config.database.path)
            .await
            .context("Failed to open database")?;
        let records = Arc::new(SqliteRecordRepository::new(db_pool.pool().clone()));

        let blobs = Arc::new(
            FsBlobStore::new(&config.storage.uploads_dir)
                .context("Failed to prepare the uploads directory")?,
        );

        Ok(Self {
            config,
            records,
            blobs,
            shutdown,
        })
    }

    // ========================================================================
    // DaemonService::run() - async main loop
    // ========================================================================

    /// Runs the daemon's main loop
    ///
    /// 1. Resolves the Drive access token, waiting until one appears
    /// 2. Wires the Drive adapter and the reconciliation engine
    /// 3. Enters the polling loop with graceful shutdown support
    async fn run(&self) -> Result<()> {
        let Some(token) = self.wait_for_token().await else {
            return Ok(());
        };

        // Create the Drive adapter
        let mut client = DriveClient::new(token);
        if let Some(folder) = &self.config.remote.folder_id {
            client = client.with_parent_folder(folder);
        }
        let remote = Arc::new(DriveRemoteStore::new(client));

        // Create the engine
        let records: Arc<dyn IRecordRepository + Send + Sync> = self.records.clone();
        let blobs: Arc<dyn IBlobStore + Send + Sync> = self.blobs.clone();
        let engine = ReconcileEngine::new(remote, records, blobs);

        self.reconcile_loop(&engine).await
    }

    /// Resolves the access token, retrying until one becomes available
    ///
    /// When no token is configured yet, checks again every 30 seconds so
    /// the operator can provision one without restarting the service.
    /// Returns `None` when shutdown is signalled first.
    async fn wait_for_token(&self) -> Option<String> {
        loop {
            match auth::load_access_token(self.config.remote.token_file.as_deref()) {
                Ok(token) => return Some(token),
                Err(e) => {
                    let err_msg = format!("{e:#}");
                    warn!(
                        error = %err_msg,
                        retry_secs = TOKEN_RETRY_SECS,
                        "No access token available yet"
                    );
                }
            }

            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(TOKEN_RETRY_SECS)) => {}
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown signal received while waiting for a token");
                    return None;
                }
            }
        }
    }

    // ========================================================================
    // Periodic reconciliation
    // ========================================================================

    /// Main reconciliation loop with periodic polling
    ///
    /// Uses `tokio::time::interval` based on `config.engine.poll_interval`
    /// (defaults to one day). Each tick runs one reconciliation pass; a
    /// failed pass is logged and the next tick retries.
    async fn reconcile_loop(&self, engine: &ReconcileEngine) -> Result<()> {
        let poll_secs = self.config.engine.poll_interval;
        let poll_duration = Duration::from_secs(poll_secs);

        info!(poll_interval_secs = poll_secs, "Starting reconciliation loop");

        let mut interval = tokio::time::interval(poll_duration);
        // The first tick fires immediately; we want to reconcile right away
        interval.tick().await;

        loop {
            info!("Starting reconciliation pass");

            match engine.run_reconciliation_pass().await {
                Ok(summary) => {
                    info!(
                        synced = summary.synced,
                        deleted = summary.deleted,
                        failed = summary.failed,
                        "Reconciliation pass completed"
                    );
                }
                Err(e) => {
                    let err_msg = format!("{e:#}");
                    error!(error = %err_msg, "Reconciliation pass failed");
                }
            }

            // Wait for the next interval or shutdown
            tokio::select! {
                _ = interval.tick() => {}
                _ = self.shutdown.cancelled() => {
                    info!("Shutdown signal received");
                    break;
                }
            }
        }

        info!("Reconciliation loop terminated");
        Ok(())
    }
}

// ============================================================================
// Graceful shutdown signal handler
// ============================================================================

/// Waits for SIGTERM or SIGINT and triggers the cancellation token
///
/// This function listens for OS signals and cancels the provided token
/// when a shutdown signal is received.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT (Ctrl+C)");
        }
        _ = terminate => {
            info!("Received SIGTERM");
        }
    }

    token.cancel();
}

// ============================================================================
// Main entry point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first so the configured level can seed the filter
    let config_path = Config::default_path();
    let config = Config::load_or_default(&config_path);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();

    info!("DriveMirror daemon starting (drivemirrord)");
    info!(config_path = %config_path.display(), "Loaded configuration");

    // Create cancellation token for propagation to all tasks
    let shutdown_token = CancellationToken::new();

    // Spawn signal handler task
    let signal_token = shutdown_token.clone();
    tokio::spawn(async move {
        shutdown_signal(signal_token).await;
    });

    // Create and run the daemon service
    let service = DaemonService::new(config, shutdown_token.clone()).await?;

    let result = service.run().await;

    match &result {
        Ok(()) => info!("DriveMirror daemon shut down gracefully"),
        Err(e) => error!(error = %e, "DriveMirror daemon exiting with error"),
    }

    result
}

// ============================================================================
// Tests
// ============================================================================
