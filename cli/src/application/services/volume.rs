//! Application service: the `volume` use-case.

use anyhow::{Context, Result};
use twcompose_common::TwitterComposeModel;

use crate::application::ports::TweetCountSource;
use crate::domain::volume::{monthly_estimate, rank_volumes};

/// Rules to estimate: the ones given on the command line, or else every
/// configured rule value.
#[must_use]
pub fn rules_to_estimate(config: &TwitterComposeModel, requested: &[String]) -> Vec<String> {
    if !requested.is_empty() {
        return requested.to_vec();
    }
    config.rules().map(|r| r.value.clone()).collect()
}

/// Monthly volume per rule, largest first.
///
/// # Errors
///
/// Returns an error if counts cannot be fetched for a rule.
pub async fn estimate_volumes(
    counter: &impl TweetCountSource,
    rules: Vec<String>,
    min: Option<u64>,
) -> Result<Vec<(String, u64)>> {
    let mut volumes = Vec::with_capacity(rules.len());
    for rule in rules {
        let counts = counter
            .daily_counts(&rule)
            .await
            .with_context(|| format!("counting tweets for '{rule}'"))?;
        volumes.push((rule, monthly_estimate(&counts)));
    }
    Ok(rank_volumes(volumes, min))
}
