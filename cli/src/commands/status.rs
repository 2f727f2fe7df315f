//! `twitter-compose status`: active rules and collector state.

use std::process::ExitCode;

use anyhow::Result;
use serde_json::json;

use crate::app::AppContext;
use crate::application::services::status::collect_status;
use crate::output::progress::with_spinner;

/// Run `twitter-compose status`.
///
/// # Errors
///
/// Returns an error if the registry or the collector cannot be queried.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let registry = app.registry()?;
    let orchestrator = app.orchestrator();
    let report = with_spinner(
        &app.output,
        "Fetching status...",
        collect_status(&registry, &orchestrator, &app.project),
    )
    .await?;

    app.output.yaml(&json!({ "Active rules": report.active_rules }))?;
    app.output.line(&collection_state(&app.project, report.running));
    Ok(ExitCode::SUCCESS)
}

fn collection_state(project: &str, running: bool) -> String {
    let state = if running { "running" } else { "stopped" };
    format!("Tweets collection is {state} for {project}.")
}
