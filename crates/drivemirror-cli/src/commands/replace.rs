//! Replace and remove commands - Change or retire managed content
//!
//! Provides the `drivemirror replace` and `drivemirror remove` CLI
//! commands. Both act on the local record only; the Drive side catches
//! up on the next reconciliation pass.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use drivemirror_core::config::Config;
use drivemirror_core::domain::RecordId;

use crate::commands::add::resolve_mime;
use crate::commands::{intake_use_case, record_json, report_intake_error};
use crate::output::{get_formatter, OutputOptions};

/// Replace command with clap options
#[derive(Debug, Args)]
pub struct ReplaceCommand {
    /// Identifier of the record to replace
    pub id: String,

    /// Path of the file holding the new content
    pub path: PathBuf,

    /// New display name (defaults to the file name)
    #[arg(long)]
    pub name: Option<String>,

    /// Media type of the new content (defaults to a guess from the
    /// extension)
    #[arg(long)]
    pub mime: Option<String>,
}

impl ReplaceCommand {
    /// Execute the replace command
    pub async fn execute(&self, output: OutputOptions, config_path: &Path) -> Result<()> {
        let formatter = get_formatter(output);

        // Step 1: Load config
        let config = Config::load_or_default(config_path);
        info!(config_path = %config_path.display(), "Loaded configuration");

        // Step 2: Parse the record id
        let record_id: RecordId = match self.id.parse() {
            Ok(id) => id,
            Err(err) => {
                formatter.error(&format!("Invalid record id '{}': {}", self.id, err));
                return Ok(());
            }
        };

        // Step 3: Read the replacement content
        let data = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))?;

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

        // Step 4: Replace the content
        let intake = intake_use_case(&config).await?;
        let record = match intake
            .replace_content(&record_id, &name, mime_type, &data)
            .await
        {
            Ok(record) => record,
            Err(err) => return report_intake_error(err, &*formatter),
        };

        // Step 5: Display the updated record
        if output.is_json() {
            formatter.print_json(&record_json(&record));
        } else {
            formatter.success(&format!("Replaced content of {}", record.id()));
            formatter.info(&format!("Name:        {}", record.original_name()));
            formatter.info(&format!("Status:      {}", record.status().name()));
            formatter.info(&format!("Size:        {} bytes", record.size_bytes()));
            if record.remote_id().is_some() {
                formatter.info("The existing Drive object will be updated on the next sync.");
            } else {
                formatter.info("The content will be pushed to Drive on the next sync.");
            }
        }

        Ok(())
    }
}

/// Remove command with clap options
#[derive(Debug, Args)]
pub struct RemoveCommand {
    /// Identifier of the record to remove
    pub id: String,
}

impl RemoveCommand {
    /// Execute the remove command
    pub async fn execute(&self, output: OutputOptions, config_path: &Path) -> Result<()> {
        let formatter = get_formatter(output);

        // Step 1: Load config
        let config = Config::load_or_default(config_path);
        info!(config_path = %config_path.display(), "Loaded configuration");

        // Step 2: Parse the record id
        let record_id: RecordId = match self.id.parse() {
            Ok(id) => id,
            Err(err) => {
                formatter.error(&format!("Invalid record id '{}': {}", self.id, err));
                return Ok(());
            }
        };

        // Step 3: Queue the removal
        let intake = intake_use_case(&config).await?;
        let record = match intake.request_deletion(&record_id).await {
            Ok(record) => record,
            Err(err) => return report_intake_error(err, &*formatter),
        };

        // Step 4: Report what happens next
        if output.is_json() {
            formatter.print_json(&record_json(&record));
        } else {
            formatter.success(&format!("Removal queued for {}", record.original_name()));
            if record.remote_id().is_some() {
                formatter.info("The Drive object will be deleted on the next sync.");
            } else {
                formatter.info("Never pushed; the record will be retired without a Drive call.");
            }
        }

        Ok(())
    }
}
