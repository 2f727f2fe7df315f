//! `twitter-compose volume`: estimate monthly tweet volume per rule.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::volume::{estimate_volumes, rules_to_estimate};
use crate::output::progress::with_spinner;

/// Arguments for the volume command.
#[derive(Args)]
pub struct VolumeArgs {
    /// Only show rules above this monthly volume
    #[arg(long)]
    pub min: Option<u64>,

    /// Rules to estimate [default: every rule of the compose file]
    pub rules: Vec<String>,
}

/// Run `twitter-compose volume`.
///
/// # Errors
///
/// Returns an error if the compose file cannot be loaded or counts cannot
/// be fetched.
pub async fn run(app: &AppContext, args: &VolumeArgs) -> Result<ExitCode> {
    let rules = if args.rules.is_empty() {
        rules_to_estimate(&app.load_compose()?, &[])
    } else {
        args.rules.clone()
    };
    let registry = app.registry()?;
    let volumes = with_spinner(
        &app.output,
        "Counting recent tweets...",
        estimate_volumes(&registry, rules, args.min),
    )
    .await?;

    if volumes.is_empty() {
        app.output.info("No rule above the requested volume.");
        return Ok(ExitCode::SUCCESS);
    }
    // Ranked largest first; printed as-is to keep the order.
    for (rule, volume) in &volumes {
        app.output.line(&format!("{rule}: {volume}"));
    }
    Ok(ExitCode::SUCCESS)
}
