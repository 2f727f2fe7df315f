//! `twitter-compose stop`: stop the collector, keeping its container.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::stop::{StopOutcome, ensure_stopped};

/// Run `twitter-compose stop`.
///
/// # Errors
///
/// Returns an error if the collector cannot be inspected or stopped.
pub async fn run(app: &AppContext) -> Result<ExitCode> {
    let ctx = &app.output;
    let project = &app.project;
    match ensure_stopped(&app.orchestrator(), project).await? {
        StopOutcome::Stopped => ctx.success(&format!("Stopped stream collector {project}.")),
        StopOutcome::AlreadyStopped => {
            ctx.info(&format!("Already stopped stream collector {project}."));
        }
    }
    Ok(ExitCode::SUCCESS)
}
