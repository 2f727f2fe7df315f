//! Rule reconciliation: fetch the remote rules, diff against the compose
//! file, push the diff.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::{Context, Result};
use serde_json::Value;
use twcompose_common::TwitterComposeModel;

use crate::application::ports::RuleRegistry;
use crate::domain::{RuleSetDiff, compute_diff, desired_rules};

/// Diff between the registry's rules and the compose file's rules.
///
/// # Errors
///
/// Returns an error if the rules cannot be fetched, or a `RuleError` if a
/// remote rule to delete has no id.
pub async fn plan_rule_changes(
    registry: &impl RuleRegistry,
    config: &TwitterComposeModel,
) -> Result<RuleSetDiff> {
    let current = registry
        .fetch_rules()
        .await
        .context("fetching current stream rules")?;
    let desired = desired_rules(config);
    let diff = compute_diff(&current, &desired)?;
    tracing::debug!(
        current = current.len(),
        desired = desired.len(),
        add = diff.add.len(),
        delete = diff.delete.len(),
        "computed rule diff"
    );
    Ok(diff)
}

/// Push `diff` to the registry: deletions first, then additions.
///
/// Returns the flattened per-item errors. An empty result means every
/// request was accepted; a non-empty result after a real apply may leave the
/// registry half-updated, which a later reconciliation picks up.
///
/// # Errors
///
/// Returns an error only on transport failure.
pub async fn apply_diff(
    registry: &impl RuleRegistry,
    diff: &RuleSetDiff,
    dry_run: bool,
) -> Result<Vec<Value>> {
    let mut errors = Vec::new();
    for body in diff.to_payload() {
        let mut reported = registry.post_rules(&body, dry_run).await?;
        if !reported.is_empty() {
            tracing::info!(dry_run, count = reported.len(), "registry reported rule errors");
        }
        errors.append(&mut reported);
    }
    Ok(errors)
}
