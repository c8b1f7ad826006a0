//! Config command - Inspect and edit the configuration file
//!
//! Provides the `drivemirror config` subcommands:
//! - `show`: display the effective configuration
//! - `set`: change one value and save the file
//! - `validate`: check the file on disk for problems

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::json;

use drivemirror_core::config::Config;

use crate::output::{get_formatter, OutputOptions};

/// Config subcommands
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Set a configuration value and save the file
    Set {
        /// Configuration key (e.g. 'engine.poll_interval')
        key: String,

        /// New value ('none' clears an optional key)
        value: String,
    },

    /// Validate the configuration file on disk
    Validate,
}

impl ConfigCommand {
    /// Execute the config command
    pub async fn execute(&self, output: OutputOptions, config_path: &Path) -> Result<()> {
        match self {
            Self::Show => execute_show(output, config_path),
            Self::Set { key, value } => execute_set(output, config_path, key, value),
            Self::Validate => execute_validate(output, config_path),
        }
    }
}

/// Displays the effective configuration
fn execute_show(output: OutputOptions, config_path: &Path) -> Result<()> {
    let formatter = get_formatter(output);
    let config = Config::load_or_default(config_path);

    if output.is_json() {
        let value =
            serde_json::to_value(&config).context("Failed to serialize configuration")?;
        formatter.print_json(&value);
        return Ok(());
    }

    formatter.success(&format!("Configuration ({})", config_path.display()));
    formatter.info("");
    let yaml = serde_yaml::to_string(&config).context("Failed to render configuration")?;
    for line in yaml.lines() {
        formatter.info(line);
    }

    Ok(())
}

/// Changes one configuration value and saves the file
fn execute_set(output: OutputOptions, config_path: &Path, key: &str, value: &str) -> Result<()> {
    let formatter = get_formatter(output);
    let mut config = Config::load_or_default(config_path);

    // Step 1: Apply the change
    if let Err(err) = apply_config_value(&mut config, key, value) {
        formatter.error(&format!("Failed to set '{key}': {err:#}"));
        formatter.info("");
        formatter.info("Supported keys:");
        formatter.info("  storage.uploads_dir        - Directory holding managed content");
        formatter.info("  storage.max_upload_mb      - Maximum accepted upload size (MiB)");
        formatter.info("  remote.folder_id           - Drive folder for new uploads (or 'none')");
        formatter.info("  remote.token_file          - Path of the access token file (or 'none')");
        formatter.info("  engine.poll_interval       - Seconds between daemon passes");
        formatter.info("  engine.restore_batch_limit - Records per restore run (1-50)");
        formatter.info("  database.path              - SQLite database file");
        formatter.info("  logging.level              - trace|debug|info|warn|error");
        return Ok(());
    }

    // Step 2: Refuse to save a broken configuration
    let errors = config.validate();
    if !errors.is_empty() {
        if output.is_json() {
            let messages: Vec<String> = errors
                .iter()
                .map(|e| format!("{} - {}", e.field, e.message))
                .collect();
            formatter.print_json(&json!({
                "key": key,
                "saved": false,
                "errors": messages,
            }));
        } else {
            formatter.error("Refusing to save an invalid configuration:");
            for err in &errors {
                formatter.info(&format!("  {} - {}", err.field, err.message));
            }
        }
        return Ok(());
    }

    // Step 3: Save
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let yaml = serde_yaml::to_string(&config).context("Failed to render configuration")?;
    std::fs::write(config_path, yaml)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    if output.is_json() {
        formatter.print_json(&json!({
            "key": key,
            "value": value,
            "saved": true,
            "path": config_path.display().to_string(),
        }));
    } else {
        formatter.success(&format!("Set {key} = {value}"));
        formatter.info(&format!("Saved to {}", config_path.display()));
    }

    Ok(())
}

/// Checks the configuration file on disk for problems
fn execute_validate(output: OutputOptions, config_path: &Path) -> Result<()> {
    let formatter = get_formatter(output);

    if !config_path.exists() {
        if output.is_json() {
            formatter.print_json(&json!({
                "valid": true,
                "exists": false,
                "path": config_path.display().to_string(),
            }));
        } else {
            formatter.warn(&format!("No configuration file at {}", config_path.display()));
            formatter.info("Using built-in defaults; run 'drivemirror config set' to create one.");
        }
        return Ok(());
    }

    let config = match Config::load(config_path) {
        Ok(config) => config,
        Err(err) => {
            if output.is_json() {
                formatter.print_json(&json!({
                    "valid": false,
                    "exists": true,
                    "error": format!("{err:#}"),
                }));
            } else {
                formatter.error(&format!(
                    "Failed to load {}: {:#}",
                    config_path.display(),
                    err
                ));
            }
            return Ok(());
        }
    };

    let errors = config.validate();
    if output.is_json() {
        let messages: Vec<String> = errors
            .iter()
            .map(|e| format!("{} - {}", e.field, e.message))
            .collect();
        formatter.print_json(&json!({
            "valid": errors.is_empty(),
            "exists": true,
            "errors": messages,
        }));
        return Ok(());
    }

    if errors.is_empty() {
        formatter.success(&format!(
            "Configuration at {} is valid",
            config_path.display()
        ));
    } else {
        formatter.error(&format!(
            "Found {} problem{}:",
            errors.len(),
            if errors.len() == 1 { "" } else { "s" }
        ));
        for err in &errors {
            formatter.info(&format!("  {} - {}", err.field, err.message));
        }
    }

    Ok(())
}

/// Applies a `key = value` change to the configuration
///
/// Optional keys accept an empty string or `none` to clear the value.
fn apply_config_value(config: &mut Config, key: &str, value: &str) -> Result<()> {
    match key {
        "storage.uploads_dir" => config.storage.uploads_dir = PathBuf::from(value),
        "storage.max_upload_mb" => {
            config.storage.max_upload_mb = value
                .parse()
                .with_context(|| format!("'{value}' is not a valid size in MiB"))?;
        }
        "remote.folder_id" => {
            config.remote.folder_id = optional_value(value).map(str::to_string);
        }
        "remote.token_file" => {
            config.remote.token_file = optional_value(value).map(PathBuf::from);
        }
        "engine.poll_interval" => {
            config.engine.poll_interval = value
                .parse()
                .with_context(|| format!("'{value}' is not a valid number of seconds"))?;
        }
        "engine.restore_batch_limit" => {
            config.engine.restore_batch_limit = value
                .parse()
                .with_context(|| format!("'{value}' is not a valid batch limit"))?;
        }
        "database.path" => config.database.path = PathBuf::from(value),
        "logging.level" => config.logging.level = value.to_string(),
        _ => anyhow::bail!("Unknown configuration key: '{key}'"),
    }

    Ok(())
}

/// Maps an empty string or `none` to `None`
fn optional_value(value: &str) -> Option<&str> {
    if value.is_empty() || value.eq_ignore_ascii_case("none") {
        None
    } else {
        Some(value)
    }
}
