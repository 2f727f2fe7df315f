//! Application service: the `status` use-case.

use anyhow::Result;

use crate::application::ports::{ContainerOrchestrator, RuleRegistry};
use crate::domain::Rule;

/// Active rules and collector state of a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusReport {
    pub active_rules: Vec<Rule>,
    pub running: bool,
}

/// # Errors
///
/// Returns an error if the registry or the orchestrator cannot be queried.
pub async fn collect_status(
    registry: &impl RuleRegistry,
    orchestrator: &impl ContainerOrchestrator,
    project: &str,
) -> Result<StatusReport> {
    let active_rules = registry.fetch_rules().await?.into_iter().collect();
    let running = orchestrator.is_running(project).await?;
    Ok(StatusReport { active_rules, running })
}
