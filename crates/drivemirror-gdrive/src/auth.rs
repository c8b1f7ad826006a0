//! Access token loading
//!
//! Drive calls authenticate with a bearer token provisioned by the
//! operator. The token comes from a file named in the configuration or,
//! when no file is configured, from the `DRIVE_ACCESS_TOKEN` environment
//! variable. Token minting and refresh happen outside this process.

use std::path::Path;

use anyhow::{Context, Result};

/// Environment variable consulted when no token file is configured
pub const TOKEN_ENV_VAR: &str = "DRIVE_ACCESS_TOKEN";

/// Loads the Drive access token
///
/// Reads the token file when one is given; otherwise falls back to the
/// [`TOKEN_ENV_VAR`] environment variable. Surrounding whitespace is
/// trimmed so tokens written with a trailing newline work as-is.
///
/// # Errors
/// Returns an error when the token file cannot be read, is empty, or no
/// token source is available at all.
pub fn load_access_token(token_file: Option<&Path>) -> Result<String> {
    if let Some(path) = token_file {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read token file {}", path.display()))?;
        let token = raw.trim();
        if token.is_empty() {
            anyhow::bail!("Token file {} is empty", path.display());
        }
        return Ok(token.to_string());
    }

    match std::env::var(TOKEN_ENV_VAR) {
        Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
        _ => anyhow::bail!(
            "No access token available. Configure remote.token_file or set {TOKEN_ENV_VAR}."
        ),
    }
}
