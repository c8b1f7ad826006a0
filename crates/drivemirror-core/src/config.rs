//! Configuration module for DriveMirror.
//!
//! Provides typed configuration structs that map to the YAML configuration file,
//! with loading, validation, defaults, and a builder pattern for programmatic use.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Config struct with sub-sections
// ---------------------------------------------------------------------------

/// Top-level configuration for DriveMirror.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub remote: RemoteConfig,
    pub engine: EngineConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
}

/// Local content storage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory where managed content blobs are kept.
    pub uploads_dir: PathBuf,
    /// Maximum accepted size for incoming content (in MiB).
    pub max_upload_mb: u64,
}

/// Remote backend (Google Drive) settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Drive folder that uploads are created in. `None` targets the root.
    pub folder_id: Option<String>,
    /// Path to a file holding the OAuth access token. `None` falls back to
    /// the `DRIVE_ACCESS_TOKEN` environment variable.
    pub token_file: Option<PathBuf>,
}

/// Reconciliation engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Seconds between reconciliation passes in the daemon.
    pub poll_interval: u64,
    /// Upper bound on records examined per restore run (1-50).
    pub restore_batch_limit: u32,
}

/// Database settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    pub path: PathBuf,
}

/// Logging / tracing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: `trace`, `debug`, `info`, `warn`, or `error`.
    pub level: String,
}

// ---------------------------------------------------------------------------
// Config::load()
// ---------------------------------------------------------------------------

impl Config {
    /// Load configuration from a YAML file at `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load from `path`; fall back to [`Config::default`] on any error.
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Platform-appropriate default path for the configuration file.
    ///
    /// Typically `$XDG_CONFIG_HOME/drivemirror/config.yaml` on Linux.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("drivemirror")
            .join("config.yaml")
    }

    /// Maximum accepted content size in bytes, derived from
    /// `storage.max_upload_mb`.
    ///
    /// Saturates at `u64::MAX` for values [`validate`](Self::validate)
    /// would reject, so an unvalidated config can never wrap into a
    /// tiny limit.
    #[must_use]
    pub fn max_upload_bytes(&self) -> u64 {
        self.storage.max_upload_mb.saturating_mul(1024 * 1024)
    }
}

// ---------------------------------------------------------------------------
// Config::default()
// ---------------------------------------------------------------------------

// Config derives Default because all its fields implement Default.
// (clippy::derivable_impls)

/// Platform-appropriate data directory for DriveMirror state.
///
/// Typically `$XDG_DATA_HOME/drivemirror` on Linux.
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join("drivemirror")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            uploads_dir: default_data_dir().join("uploads"),
            max_upload_mb: 10,
        }
    }
}

// RemoteConfig derives Default (both options default to None).
// (clippy::derivable_impls)

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            poll_interval: 86_400,
            restore_batch_limit: 50,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_data_dir().join("drivemirror.db"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Config::validate()
// ---------------------------------------------------------------------------

/// A single validation error found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path to the offending field, e.g. `"engine.poll_interval"`.
    pub field: String,
    /// Human-readable explanation.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Valid values for `logging.level`.
const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Largest `storage.max_upload_mb` whose byte count still fits in a `u64`.
const MAX_UPLOAD_MB_LIMIT: u64 = u64::MAX / (1024 * 1024);

impl Config {
    /// Validate the configuration and return all errors found.
    ///
    /// An empty vector means the configuration is valid.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        // --- storage ---
        if self.storage.uploads_dir.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "storage.uploads_dir".into(),
                message: "must not be empty".into(),
            });
        }
        if self.storage.max_upload_mb == 0 || self.storage.max_upload_mb > MAX_UPLOAD_MB_LIMIT {
            errors.push(ValidationError {
                field: "storage.max_upload_mb".into(),
                message: format!("must be in range 1..={MAX_UPLOAD_MB_LIMIT}"),
            });
        }

        // --- engine ---
        if self.engine.poll_interval == 0 {
            errors.push(ValidationError {
                field: "engine.poll_interval".into(),
                message: "must be greater than 0".into(),
            });
        }
        if self.engine.restore_batch_limit == 0 || self.engine.restore_batch_limit > 50 {
            errors.push(ValidationError {
                field: "engine.restore_batch_limit".into(),
                message: "must be in range 1..=50".into(),
            });
        }

        // --- database ---
        if self.database.path.as_os_str().is_empty() {
            errors.push(ValidationError {
                field: "database.path".into(),
                message: "must not be empty".into(),
            });
        }

        // --- logging ---
        if !VALID_LOG_LEVELS.contains(&self.logging.level.as_str()) {
            errors.push(ValidationError {
                field: "logging.level".into(),
                message: format!(
                    "invalid level '{}'; valid options: {}",
                    self.logging.level,
                    VALID_LOG_LEVELS.join(", ")
                ),
            });
        }

        errors
    }
}

// ---------------------------------------------------------------------------
// ConfigBuilder
// ---------------------------------------------------------------------------

/// Builder for constructing a [`Config`] programmatically.
///
/// Starts from [`Config::default`] and allows selective overrides.
///
/// # Example
///
/// ```rust,no_run
/// use drivemirror_core::config::ConfigBuilder;
/// use std::path::PathBuf;
///
/// let config = ConfigBuilder::new()
///     .storage_uploads_dir(PathBuf::from("/var/lib/drivemirror/uploads"))
///     .engine_poll_interval(3600)
///     .logging_level("debug")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder initialised with [`Config::default`] values.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    // --- storage ---

    pub fn storage_uploads_dir(mut self, dir: PathBuf) -> Self {
        self.config.storage.uploads_dir = dir;
        self
    }

    pub fn storage_max_upload_mb(mut self, mb: u64) -> Self {
        self.config.storage.max_upload_mb = mb;
        self
    }

    // --- remote ---

    pub fn remote_folder_id(mut self, folder_id: impl Into<String>) -> Self {
        self.config.remote.folder_id = Some(folder_id.into());
        self
    }

    pub fn remote_token_file(mut self, token_file: PathBuf) -> Self {
        self.config.remote.token_file = Some(token_file);
        self
    }

    // --- engine ---

    pub fn engine_poll_interval(mut self, seconds: u64) -> Self {
        self.config.engine.poll_interval = seconds;
        self
    }

    pub fn engine_restore_batch_limit(mut self, limit: u32) -> Self {
        self.config.engine.restore_batch_limit = limit;
        self
    }

    // --- database ---

    pub fn database_path(mut self, path: PathBuf) -> Self {
        self.config.database.path = path;
        self
    }

    // --- logging ---

    pub fn logging_level(mut self, level: impl Into<String>) -> Self {
        self.config.logging.level = level.into();
        self
    }

    // --- build ---

    /// Consume the builder and return the finished [`Config`].
    pub fn build(self) -> Config {
        self.config
    }

    /// Build and validate in one step. Returns `Err` with the list of
    /// validation errors if the configuration is invalid.
    pub fn build_validated(self) -> Result<Config, Vec<ValidationError>> {
        let config = self.build();
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(errors)
        }
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
