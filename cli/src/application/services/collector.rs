//! Collector reconciliation: diff the container against its desired spec
//! and carry out the decided action.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use anyhow::Result;
use serde_json::{Map, Value, json};

use crate::application::ports::ContainerOrchestrator;
use crate::domain::{
    AttributeDiffs, CollectorAction, CollectorDesiredSpec, CollectorError, decide_action,
    diff_attributes,
};

/// Differing attributes of the project's container.
///
/// # Errors
///
/// Returns [`CollectorError::NotFound`] if no container exists for the
/// project, or an error if it cannot be inspected.
pub async fn collector_diff(
    orchestrator: &impl ContainerOrchestrator,
    project: &str,
    desired: &CollectorDesiredSpec,
) -> Result<AttributeDiffs> {
    let observed = orchestrator
        .observed_state(project)
        .await?
        .ok_or_else(|| CollectorError::NotFound(project.to_string()))?;
    Ok(diff_attributes(&observed, desired))
}

/// Observed collector situation and the action it calls for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorPlan {
    /// `None` when no container exists.
    pub diff: Option<AttributeDiffs>,
    pub running: bool,
    pub action: CollectorAction,
}

impl CollectorPlan {
    /// Attributes differ, or the collector is not running.
    #[must_use]
    pub fn changed(&self) -> bool {
        self.action != CollectorAction::Noop
    }

    /// Human-facing description of the pending collector changes, `None`
    /// when there are none.
    #[must_use]
    pub fn to_plan(&self) -> Option<Value> {
        let Some(diff) = &self.diff else {
            return Some(json!(["Stream collector should be created"]));
        };
        let mut items = Vec::new();
        if !self.running {
            items.push(json!("Stream collection needs to be started"));
        }
        if !diff.is_empty() {
            let attrs: Map<String, Value> = diff
                .iter()
                .map(|(attr, d)| {
                    (
                        attr.as_str().to_string(),
                        json!({"current": d.current, "new": d.new}),
                    )
                })
                .collect();
            items.push(json!({"Collector will be updated as follows": attrs}));
        }
        (!items.is_empty()).then_some(Value::Array(items))
    }
}

/// Inspect the container and decide what to do with it.
///
/// A missing container is the expected "create" case, not a failure.
///
/// # Errors
///
/// Returns an error if the orchestrator cannot be queried.
pub async fn plan_collector(
    orchestrator: &impl ContainerOrchestrator,
    project: &str,
    desired: &CollectorDesiredSpec,
) -> Result<CollectorPlan> {
    let diff = match collector_diff(orchestrator, project, desired).await {
        Ok(diff) => Some(diff),
        Err(e) if matches!(e.downcast_ref::<CollectorError>(), Some(CollectorError::NotFound(_))) => {
            None
        }
        Err(e) => return Err(e),
    };
    let running = match diff {
        Some(_) => orchestrator.is_running(project).await?,
        None => false,
    };
    let action = decide_action(diff.as_ref(), running);
    tracing::debug!(project, running, ?action, "planned collector action");
    Ok(CollectorPlan { diff, running, action })
}

/// Carry out `action` for the project's container.
///
/// # Errors
///
/// Returns an error if any orchestrator call fails.
pub async fn apply_action(
    orchestrator: &impl ContainerOrchestrator,
    project: &str,
    desired: &CollectorDesiredSpec,
    action: CollectorAction,
) -> Result<()> {
    match action {
        CollectorAction::Noop => Ok(()),
        CollectorAction::Start => orchestrator.start(project).await,
        CollectorAction::Create => orchestrator.create_and_start(project, desired).await,
        CollectorAction::RecreateAndStart => {
            orchestrator.stop(project).await?;
            orchestrator.remove(project).await?;
            orchestrator.create_and_start(project, desired).await
        }
    }
}
