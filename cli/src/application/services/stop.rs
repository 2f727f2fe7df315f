//! Application service: the `stop` use-case.

use anyhow::Result;

use crate::application::ports::ContainerOrchestrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped,
    AlreadyStopped,
}

/// Stop the project's collector if it runs.
///
/// # Errors
///
/// Returns an error if the container cannot be inspected or stopped.
pub async fn ensure_stopped(
    orchestrator: &impl ContainerOrchestrator,
    project: &str,
) -> Result<StopOutcome> {
    if !orchestrator.is_running(project).await? {
        return Ok(StopOutcome::AlreadyStopped);
    }
    orchestrator.stop(project).await?;
    Ok(StopOutcome::Stopped)
}
