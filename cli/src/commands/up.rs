//! `twitter-compose up`: reconcile stream rules and the collector.

use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use serde_json::json;

use crate::app::AppContext;
use crate::application::services::reconcile::{self, Mode, ReconcileOutcome, ReconcilePlan};
use crate::output::progress::with_spinner;
use crate::output::{OutputContext, TerminalReporter};

/// Arguments for the up command.
#[derive(Args)]
pub struct UpArgs {
    /// Show and validate the changes without applying them
    #[arg(long)]
    pub check: bool,
}

/// Run `twitter-compose up`.
///
/// # Errors
///
/// Returns an error if the current state cannot be fetched, a rule change
/// is rejected, or the collector cannot be updated.
pub async fn run(app: &AppContext, args: &UpArgs) -> Result<ExitCode> {
    let config = app.load_compose()?;
    let desired = app.desired_spec(&config);
    let registry = app.registry()?;
    let orchestrator = app.orchestrator();

    let plan = with_spinner(
        &app.output,
        "Computing changes...",
        reconcile::plan(&registry, &orchestrator, &app.project, &config, &desired),
    )
    .await?;
    print_plan(&app.output, &plan)?;

    let mode = if args.check { Mode::DryRun } else { Mode::Apply };
    let reporter = TerminalReporter::new(&app.output);
    let outcome = reconcile::execute(
        &registry,
        &orchestrator,
        &reporter,
        &app.project,
        &desired,
        &plan,
        mode,
    )
    .await?;

    match outcome {
        ReconcileOutcome::NothingToDo => app.output.info("Nothing to do."),
        ReconcileOutcome::Validated => app.output.info("Check passed, no change applied."),
        ReconcileOutcome::Applied(steps) => {
            tracing::debug!(?steps, "reconciliation applied");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn print_plan(ctx: &OutputContext, plan: &ReconcilePlan) -> Result<()> {
    if !plan.rules.is_empty() {
        ctx.yaml(&json!({ "> Stream rules will be updated as follows": plan.rules.to_plan() }))?;
    }
    if let Some(collector) = plan.collector.to_plan() {
        ctx.yaml(&collector)?;
    }
    Ok(())
}
