//! SQLite connection pooling for the record store
//!
//! One `file_records` database backs every process that touches sync state:
//! the daemon writes to it mid-pass while `drivemirror status` reads from
//! it, so connections run in WAL mode with a busy timeout instead of
//! failing fast on contention. Opening a pool also applies the schema;
//! callers never sequence migrations themselves.

use std::path::Path;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use crate::StoreError;

/// Shared handle to the SQLite database holding file records
///
/// Construction is the single entry point for schema setup: both the
/// file-backed and the in-memory variant come back migrated and ready to
/// hand to [`SqliteRecordRepository`](crate::SqliteRecordRepository).
pub struct DatabasePool {
    pool: SqlitePool,
}

impl DatabasePool {
    /// Opens, and if necessary creates, the database file at `db_path`
    ///
    /// Missing parent directories are created first, so a fresh install can
    /// point at the default data directory before anything else has touched
    /// it. The pool holds at most 5 connections; WAL keeps readers
    /// unblocked while a reconciliation pass writes, and the 5-second busy
    /// timeout absorbs short write contention.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConnectionFailed`] when the directory or the
    /// connection cannot be set up, [`StoreError::MigrationFailed`] when
    /// applying the schema fails.
    pub async fn new(db_path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                StoreError::ConnectionFailed(format!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .map_err(|e| {
                StoreError::ConnectionFailed(format!(
                    "Failed to connect to database at {}: {}",
                    db_path.display(),
                    e
                ))
            })?;

        Self::run_migrations(&pool).await?;

        tracing::info!(
            path = %db_path.display(),
            "Database pool initialized"
        );

        Ok(Self { pool })
    }

    /// Opens a throwaway in-memory database
    ///
    /// Restricted to a single connection: SQLite gives every connection its
    /// own private `:memory:` database, and a second connection would see
    /// an empty schema.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`new`](Self::new), minus the filesystem.
    pub async fn in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| {
                StoreError::ConnectionFailed(format!("Failed to create in-memory database: {}", e))
            })?;

        Self::run_migrations(&pool).await?;

        tracing::debug!("In-memory database pool initialized");

        Ok(Self { pool })
    }

    /// Returns the underlying SQLx pool for repository construction
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Applies the `file_records` schema
    ///
    /// The migration runs on every open; its statements are all
    /// `IF NOT EXISTS`, so an existing database passes through unchanged.
    async fn run_migrations(pool: &SqlitePool) -> Result<(), StoreError> {
        let migration_sql = include_str!("migrations/20260815_initial.sql");
        sqlx::raw_sql(migration_sql)
            .execute(pool)
            .await
            .map_err(|e| {
                StoreError::MigrationFailed(format!("Failed to run initial migration: {}", e))
            })?;

        tracing::debug!("Database migrations completed");
        Ok(())
    }
}
