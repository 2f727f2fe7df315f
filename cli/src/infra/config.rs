//! Loading the compose and credentials files from disk.

use std::path::Path;

use anyhow::{Context, Result};
use twcompose_common::{Credentials, TwitterComposeModel};

/// Read and validate a compose file.
///
/// Tags shared by several stream groups are accepted but logged.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not match the
/// compose schema.
pub fn load_compose(path: &Path) -> Result<TwitterComposeModel> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let config: TwitterComposeModel = serde_yaml::from_str(&content)
        .with_context(|| format!("cannot parse {}", path.display()))?;
    for conflict in config.tag_conflicts() {
        tracing::warn!("{conflict}");
    }
    Ok(config)
}

/// Read the credentials file shared with the collector.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a flat mapping.
pub fn load_credentials(path: &Path) -> Result<Credentials> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read credentials {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("cannot parse credentials {}", path.display()))
}
