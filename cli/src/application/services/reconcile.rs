//! Application service: the `up` use-case.
//!
//! Planning gathers both diffs into an immutable [`ReconcilePlan`]. The plan
//! then yields a fixed, ordered list of [`Step`]s which `execute` runs one by
//! one. Rules always go before the collector: the collector consumes the
//! rules, so it is never touched while they are invalid.

use anyhow::{Context, Result};
use twcompose_common::TwitterComposeModel;

use crate::application::ports::{ContainerOrchestrator, ProgressReporter, RuleRegistry};
use crate::application::services::collector::{self, CollectorPlan};
use crate::application::services::rules;
use crate::domain::{CollectorAction, CollectorDesiredSpec, RegistryError, RuleSetDiff};

/// Whether changes are committed or only validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Apply,
    /// Validate rule changes against the registry; mutate nothing.
    DryRun,
}

/// Both diffs for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    pub rules: RuleSetDiff,
    pub collector: CollectorPlan,
}

/// One unit of work of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Dry-run the rule diff against the registry.
    ValidateRules,
    /// Commit the rule diff.
    ApplyRules,
    /// Bring the collector in line.
    ApplyCollector(CollectorAction),
}

impl ReconcilePlan {
    /// Nothing differs on either side.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.rules.is_empty() && !self.collector.changed()
    }

    /// Steps to run, in order.
    ///
    /// Dry-run only ever validates rules; collector changes are never
    /// applied in that mode.
    #[must_use]
    pub fn steps(&self, mode: Mode) -> Vec<Step> {
        let mut steps = Vec::new();
        match mode {
            Mode::DryRun => {
                if !self.rules.is_empty() {
                    steps.push(Step::ValidateRules);
                }
            }
            Mode::Apply => {
                if !self.rules.is_empty() {
                    steps.push(Step::ApplyRules);
                }
                if self.collector.changed() {
                    steps.push(Step::ApplyCollector(self.collector.action));
                }
            }
        }
        steps
    }
}

/// Result of an invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// Remote state already matches.
    NothingToDo,
    /// Dry-run finished without registry errors.
    Validated,
    /// These steps ran to completion.
    Applied(Vec<Step>),
}

/// Fetch current state and compute both diffs.
///
/// # Errors
///
/// Returns an error if the registry or the orchestrator cannot be queried,
/// or if the fetched rules are malformed.
pub async fn plan(
    registry: &impl RuleRegistry,
    orchestrator: &impl ContainerOrchestrator,
    project: &str,
    config: &TwitterComposeModel,
    desired: &CollectorDesiredSpec,
) -> Result<ReconcilePlan> {
    let rules = rules::plan_rule_changes(registry, config).await?;
    let collector = collector::plan_collector(orchestrator, project, desired)
        .await
        .context("inspecting stream collector")?;
    Ok(ReconcilePlan { rules, collector })
}

/// Run the steps of `plan` for `mode`.
///
/// Stops at the first failing step. A rejected rule change fails with
/// [`RegistryError::Rejected`] and the collector is left untouched.
///
/// # Errors
///
/// Returns an error if a step fails.
pub async fn execute(
    registry: &impl RuleRegistry,
    orchestrator: &impl ContainerOrchestrator,
    reporter: &impl ProgressReporter,
    project: &str,
    desired: &CollectorDesiredSpec,
    plan: &ReconcilePlan,
    mode: Mode,
) -> Result<ReconcileOutcome> {
    if plan.is_noop() {
        return Ok(ReconcileOutcome::NothingToDo);
    }

    let steps = plan.steps(mode);
    for step in &steps {
        match *step {
            Step::ValidateRules => {
                reporter.step("validating stream rules...");
                push_rules(registry, &plan.rules, true).await?;
                reporter.success("stream rules are valid");
            }
            Step::ApplyRules => {
                reporter.step("updating Twitter rules...");
                push_rules(registry, &plan.rules, false).await?;
                reporter.success("Twitter rules updated");
            }
            Step::ApplyCollector(action) => {
                reporter.step(&format!("starting stream collector {project}..."));
                collector::apply_action(orchestrator, project, desired, action)
                    .await
                    .with_context(|| format!("updating stream collector {project}"))?;
                reporter.success(&format!("stream collector {project} started"));
            }
        }
    }

    Ok(match mode {
        Mode::DryRun => ReconcileOutcome::Validated,
        Mode::Apply => ReconcileOutcome::Applied(steps),
    })
}

async fn push_rules(registry: &impl RuleRegistry, diff: &RuleSetDiff, dry_run: bool) -> Result<()> {
    let errors = rules::apply_diff(registry, diff, dry_run).await?;
    if errors.is_empty() {
        Ok(())
    } else {
        Err(RegistryError::Rejected(errors).into())
    }
}
