//! Sync and restore commands - Drive reconciliation from the CLI
//!
//! Provides the `drivemirror sync` and `drivemirror restore` CLI
//! commands which:
//! 1. Load configuration and wire the reconciliation engine
//! 2. Run a single pass (push pending work, or re-download lost blobs)
//! 3. Display a per-pass summary

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use clap::Args;
use serde_json::json;
use tracing::info;

use drivemirror_core::config::Config;

use crate::commands::reconcile_engine;
use crate::output::{get_formatter, OutputOptions};

/// Sync command with clap options
#[derive(Debug, Args)]
pub struct SyncCommand {}

impl SyncCommand {
    /// Execute the sync command
    pub async fn execute(&self, output: OutputOptions, config_path: &Path) -> Result<()> {
        let formatter = get_formatter(output);

        // Step 1: Load config
        let config = Config::load_or_default(config_path);
        info!(config_path = %config_path.display(), "Loaded configuration");

        // Step 2: Run one reconciliation pass
        formatter.info("Starting reconciliation pass...");

        let engine = reconcile_engine(&config).await?;
        let start = Instant::now();
        let summary = engine.run_reconciliation_pass().await?;
        let elapsed = start.elapsed();

        // Step 3: Display the summary
        if output.is_json() {
            formatter.print_json(&json!({
                "synced": summary.synced,
                "deleted": summary.deleted,
                "failed": summary.failed,
                "duration_ms": elapsed.as_millis() as u64,
            }));
            return Ok(());
        }

        let total = summary.synced + summary.deleted + summary.failed;
        if total == 0 {
            formatter.success("Nothing to reconcile");
            return Ok(());
        }

        formatter.success(&format!(
            "Reconciliation pass completed in {}",
            format_elapsed(elapsed)
        ));
        if summary.synced > 0 {
            formatter.info(&format!(
                "Pushed:  {} file{}",
                summary.synced,
                if summary.synced == 1 { "" } else { "s" }
            ));
        }
        if summary.deleted > 0 {
            formatter.info(&format!(
                "Deleted: {} file{}",
                summary.deleted,
                if summary.deleted == 1 { "" } else { "s" }
            ));
        }
        if summary.failed > 0 {
            formatter.warn(&format!(
                "{} record{} parked in error state; see logs for details",
                summary.failed,
                if summary.failed == 1 { "" } else { "s" }
            ));
        }

        Ok(())
    }
}

/// Restore command with clap options
#[derive(Debug, Args)]
pub struct RestoreCommand {
    /// Maximum number of records to examine (1-50, defaults to the
    /// configured batch limit)
    #[arg(long)]
    pub limit: Option<u32>,
}

impl RestoreCommand {
    /// Execute the restore command
    pub async fn execute(&self, output: OutputOptions, config_path: &Path) -> Result<()> {
        let formatter = get_formatter(output);

        // Step 1: Load config
        let config = Config::load_or_default(config_path);
        info!(config_path = %config_path.display(), "Loaded configuration");

        // Step 2: Run one restore pass
        formatter.info("Checking local content against uploaded records...");

        let engine = reconcile_engine(&config).await?;
        let limit = self.limit.unwrap_or(config.engine.restore_batch_limit);
        let summary = engine.restore_missing(limit).await?;

        // Step 3: Display the summary
        if output.is_json() {
            formatter.print_json(&json!({
                "limit": summary.limit,
                "checked": summary.checked,
                "restored": summary.restored,
                "skipped": summary.skipped,
                "failed": summary.failed,
            }));
            return Ok(());
        }

        if summary.restored == 0 && summary.failed == 0 {
            formatter.success("All local content present");
        } else {
            formatter.success("Restore run completed");
        }
        formatter.info(&format!(
            "Checked:  {} record{}",
            summary.checked,
            if summary.checked == 1 { "" } else { "s" }
        ));
        if summary.restored > 0 {
            formatter.info(&format!("Restored: {}", summary.restored));
        }
        if summary.skipped > 0 {
            formatter.info(&format!("Skipped:  {} (already present)", summary.skipped));
        }
        if summary.failed > 0 {
            formatter.warn(&format!(
                "{} download{} failed; see logs for details",
                summary.failed,
                if summary.failed == 1 { "" } else { "s" }
            ));
        }

        Ok(())
    }
}

/// Formats an elapsed duration for human output
fn format_elapsed(elapsed: std::time::Duration) -> String {
    if elapsed.as_secs() >= 1 {
        format!("{:.1}s", elapsed.as_secs_f64())
    } else {
        format!("{}ms", elapsed.as_millis())
    }
}
