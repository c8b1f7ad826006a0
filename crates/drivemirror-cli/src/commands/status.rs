//! Status and show commands - Inspect managed records
//!
//! Provides the `drivemirror status` and `drivemirror show` CLI commands
//! which:
//! 1. Load configuration and open the record database
//! 2. Summarize all records by status, or display one record in full
//! 3. Optionally fetch live metadata of the mirrored Drive object

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;
use tracing::info;

use drivemirror_core::config::Config;
use drivemirror_core::domain::RecordId;
use drivemirror_core::ports::{IRecordRepository, IRemoteStore, RemoteFileMeta};

use crate::commands::{open_remote_store, open_repository, record_json};
use crate::output::{get_formatter, OutputFormatter, OutputOptions};

/// Status command with clap options
#[derive(Debug, Args)]
pub struct StatusCommand {}

impl StatusCommand {
    /// Execute the status command
    pub async fn execute(&self, output: OutputOptions, config_path: &Path) -> Result<()> {
        let formatter = get_formatter(output);

        // Step 1: Load config
        let config = Config::load_or_default(config_path);
        info!(config_path = %config_path.display(), "Loaded configuration");

        // Step 2: Count records per status
        let records = open_repository(&config).await?;
        let counts = records
            .count_by_status()
            .await
            .context("Failed to count records by status")?;
        let total: u64 = counts.values().sum();

        // Step 3: Display the summary
        if output.is_json() {
            formatter.print_json(&json!({
                "total_records": total,
                "records_by_status": counts,
            }));
            return Ok(());
        }

        formatter.success("DriveMirror Status");
        formatter.info("");
        formatter.info(&format!("Total records: {total}"));

        if total > 0 {
            formatter.info("");
            formatter.info("Status          Count");
            formatter.info("--------------- -----");
            let status_order = [
                "in_progress",
                "outdated",
                "uploaded",
                "error",
                "pending_delete",
                "deleted",
            ];
            for status in status_order {
                if let Some(count) = counts.get(status) {
                    if *count > 0 {
                        formatter.info(&format!("{status:<15} {count}"));
                    }
                }
            }
        }

        Ok(())
    }
}

/// Show command with clap options
#[derive(Debug, Args)]
pub struct ShowCommand {
    /// Identifier of the record to display
    pub id: String,

    /// Also fetch metadata of the mirrored Drive object
    #[arg(long)]
    pub remote: bool,
}

impl ShowCommand {
    /// Execute the show command
    pub async fn execute(&self, output: OutputOptions, config_path: &Path) -> Result<()> {
        let formatter = get_formatter(output);

        // Step 1: Load config
        let config = Config::load_or_default(config_path);
        info!(config_path = %config_path.display(), "Loaded configuration");

        // Step 2: Parse the record id and look it up
        let record_id: RecordId = match self.id.parse() {
            Ok(id) => id,
            Err(err) => {
                formatter.error(&format!("Invalid record id '{}': {}", self.id, err));
                return Ok(());
            }
        };

        let records = open_repository(&config).await?;
        let record = records
            .find_by_id(&record_id)
            .await
            .context("Failed to look up the record")?;

        let Some(record) = record else {
            if output.is_json() {
                formatter.print_json(&json!({
                    "id": self.id,
                    "found": false,
                }));
            } else {
                formatter.error(&format!("No record found with id {}", self.id));
            }
            return Ok(());
        };

        // Step 3: Optionally fetch metadata of the mirrored object
        let remote_meta = if self.remote {
            match record.remote_id() {
                Some(remote_id) => {
                    let remote = open_remote_store(&config)?;
                    match remote.get_metadata(remote_id).await {
                        Ok(meta) => Some(meta),
                        Err(err) => {
                            formatter
                                .warn(&format!("Failed to fetch remote metadata: {err:#}"));
                            None
                        }
                    }
                }
                None => None,
            }
        } else {
            None
        };

        // Step 4: Display the record
        if output.is_json() {
            let mut body = record_json(&record);
            if let Some(meta) = &remote_meta {
                body["remote"] = serde_json::to_value(meta)
                    .context("Failed to serialize remote metadata")?;
            }
            formatter.print_json(&body);
            return Ok(());
        }

        formatter.success(&format!("Record {}", record.id()));
        formatter.info("");
        formatter.info(&format!("Name:         {}", record.original_name()));
        formatter.info(&format!("Status:       {}", record.status().name()));
        formatter.info(&format!("Storage key:  {}", record.storage_key()));
        formatter.info(&format!("Media type:   {}", record.mime_type()));
        formatter.info(&format!("Size:         {} bytes", record.size_bytes()));
        formatter.info(&format!(
            "Remote ID:    {}",
            record
                .remote_id()
                .map(|id| id.to_string())
                .unwrap_or_else(|| "(not assigned)".to_string())
        ));
        formatter.info(&format!(
            "Created:      {}",
            record.created_at().format("%Y-%m-%d %H:%M:%S UTC")
        ));
        formatter.info(&format!(
            "Updated:      {}",
            record.updated_at().format("%Y-%m-%d %H:%M:%S UTC")
        ));

        if let Some(meta) = &remote_meta {
            print_remote_meta(&*formatter, meta);
        } else if self.remote && record.remote_id().is_none() {
            formatter.info("");
            formatter.info("No remote object to inspect (never pushed).");
        }

        Ok(())
    }
}

/// Prints the Drive-side metadata block of `show --remote`
fn print_remote_meta(formatter: &dyn OutputFormatter, meta: &RemoteFileMeta) {
    formatter.info("");
    formatter.info("Remote object:");
    formatter.info(&format!("  ID:         {}", meta.id));
    formatter.info(&format!("  Name:       {}", meta.name));
    formatter.info(&format!(
        "  Media type: {}",
        meta.mime_type.as_deref().unwrap_or("(unknown)")
    ));
    formatter.info(&format!(
        "  Size:       {}",
        meta.size
            .map(|s| format!("{s} bytes"))
            .unwrap_or_else(|| "(unknown)".to_string())
    ));
    formatter.info(&format!(
        "  Modified:   {}",
        meta.modified
            .map(|t| t.format("%Y-%m-%d %H:%M:%S UTC").to_string())
            .unwrap_or_else(|| "(unknown)".to_string())
    ));
}
