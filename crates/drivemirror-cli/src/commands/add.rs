//! Add and import commands - Bring content under management
//!
//! Provides the `drivemirror add` and `drivemirror import` CLI commands
//! which:
//! 1. Load configuration and wire the intake use case
//! 2. Read content from a local file or fetch it from a URL
//! 3. Derive a display name and media type (overridable via flags)
//! 4. Store the content and display the new record

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use drivemirror_core::config::Config;
use drivemirror_core::domain::MimeType;

use crate::commands::{intake_use_case, record_json, report_intake_error};
use crate::output::{get_formatter, OutputOptions};

/// Add command with clap options
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Path of the file to bring under management
    pub path: PathBuf,

    /// Display name for the stored content (defaults to the file name)
    #[arg(long)]
    pub name: Option<String>,

    /// Media type of the content (defaults to a guess from the extension)
    #[arg(long)]
    pub mime: Option<String>,
}

impl AddCommand {
    /// Execute the add command
    pub async fn execute(&self, output: OutputOptions, config_path: &Path) -> Result<()> {
        let formatter = get_formatter(output);

        // Step 1: Load config
        let config = Config::load_or_default(config_path);
        info!(config_path = %config_path.display(), "Loaded configuration");

        // Step 2: Read the source file
        let data = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

        // Step 3: Derive name and media type
        let name = match &self.name {
            Some(name) => name.clone(),
            None => {
                let Some(file_name) = self.path.file_name().and_then(|n| n.to_str()) else {
                    formatter.error(&format!(
                        "Cannot derive a file name from '{}'; pass --name",
                        self.path.display()
                    ));
                    return Ok(());
                };
                file_name.to_string()
            }
        };

        let mime_type = match resolve_mime(self.mime.as_deref(), &name) {
            Ok(mime) => mime,
            Err(message) => {
                formatter.error(&message);
                return Ok(());
            }
        };

        // Step 4: Store the content
        let intake = intake_use_case(&config).await?;
        let record = match intake.store_new(&name, mime_type, &data).await {
            Ok(record) => record,
            Err(err) => return report_intake_error(err, &*formatter),
        };

        // Step 5: Display the new record
        if output.is_json() {
            formatter.print_json(&record_json(&record));
        } else {
            formatter.success(&format!("Added {}", record.original_name()));
            formatter.info(&format!("Record:      {}", record.id()));
            formatter.info(&format!("Status:      {}", record.status().name()));
            formatter.info(&format!("Media type:  {}", record.mime_type()));
            formatter.info(&format!("Size:        {} bytes", record.size_bytes()));
            formatter.info("Run 'drivemirror sync' to push it to Drive.");
        }

        Ok(())
    }
}

/// Import command with clap options
#[derive(Debug, Args)]
pub struct ImportCommand {
    /// URL to import content from
    pub url: String,

    /// Display name for the stored content (defaults to one derived from
    /// the URL)
    #[arg(long)]
    pub name: Option<String>,
}

impl ImportCommand {
    /// Execute the import command
    pub async fn execute(&self, output: OutputOptions, config_path: &Path) -> Result<()> {
        let formatter = get_formatter(output);

        // Step 1: Load config
        let config = Config::load_or_default(config_path);
        info!(config_path = %config_path.display(), "Loaded configuration");

        // Step 2: Fetch and store
        formatter.info(&format!("Fetching {}...", self.url));

        let intake = intake_use_case(&config).await?;
        let record = match intake
            .import_from_url(&self.url, self.name.as_deref())
            .await
        {
            Ok(record) => record,
            Err(err) => return report_intake_error(err, &*formatter),
        };

        // Step 3: Display the new record
        if output.is_json() {
            formatter.print_json(&record_json(&record));
        } else {
            formatter.success(&format!("Imported {}", record.original_name()));
            formatter.info(&format!("Record:      {}", record.id()));
            formatter.info(&format!("Status:      {}", record.status().name()));
            formatter.info(&format!("Media type:  {}", record.mime_type()));
            formatter.info(&format!("Size:        {} bytes", record.size_bytes()));
            formatter.info("Run 'drivemirror sync' to push it to Drive.");
        }

        Ok(())
    }
}

/// Resolves the media type from an explicit flag or the file name
///
/// Returns a user-facing message when the explicit value is not a valid
/// media type.
pub(crate) fn resolve_mime(explicit: Option<&str>, name: &str) -> Result<MimeType, String> {
    match explicit {
        Some(raw) => MimeType::new(raw.to_string())
            .map_err(|err| format!("Invalid media type '{raw}': {err}")),
        None => Ok(guess_mime_type(name)),
    }
}

/// Guesses a media type from a file name's extension
///
/// Covers the formats commonly mirrored; anything unknown falls back to
/// `application/octet-stream`. The `--mime` flag overrides the guess.
pub(crate) fn guess_mime_type(name: &str) -> MimeType {
    let ext = Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    let mime = match ext.as_deref() {
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        Some("txt") => "text/plain",
        Some("md") => "text/markdown",
        Some("html" | "htm") => "text/html",
        Some("css") => "text/css",
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("yaml" | "yml") => "application/yaml",
        Some("zip") => "application/zip",
        Some("gz") => "application/gzip",
        Some("tar") => "application/x-tar",
        Some("mp3") => "audio/mpeg",
        Some("mp4") => "video/mp4",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("xls") => "application/vnd.ms-excel",
        Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        _ => "application/octet-stream",
    };

    MimeType::new(mime.to_string()).unwrap_or_else(|_| MimeType::octet_stream())
}
