//! Unit tests for the `up` pipeline: planning, step ordering and halting.

#![allow(clippy::expect_used)]

use std::collections::BTreeSet;

use serde_json::json;
use twcompose_cli::application::services::reconcile::{
    self, Mode, ReconcileOutcome, ReconcilePlan, Step,
};
use twcompose_cli::domain::{CollectorAction, RegistryError, Rule, RuleError};

use crate::mocks::{
    FakeOrchestrator, FakeRegistry, RecordingReporter, compose, desired_spec, observed_from,
    remote_rules,
};

const PROJECT: &str = "cop";

async fn plan(registry: &FakeRegistry, orchestrator: &FakeOrchestrator) -> ReconcilePlan {
    let config = compose();
    let desired = desired_spec(&config);
    reconcile::plan(registry, orchestrator, PROJECT, &config, &desired)
        .await
        .expect("plan")
}

async fn run(
    registry: &FakeRegistry,
    orchestrator: &FakeOrchestrator,
    mode: Mode,
) -> anyhow::Result<ReconcileOutcome> {
    let config = compose();
    let desired = desired_spec(&config);
    let plan = reconcile::plan(registry, orchestrator, PROJECT, &config, &desired).await?;
    reconcile::execute(
        registry,
        orchestrator,
        &RecordingReporter::default(),
        PROJECT,
        &desired,
        &plan,
        mode,
    )
    .await
}

fn in_sync_orchestrator() -> FakeOrchestrator {
    FakeOrchestrator::with(Some(observed_from(&desired_spec(&compose()))), true)
}

/// Remote has `#cop26` and an obsolete rule; `#climatechange` is missing.
fn drifted_rules() -> BTreeSet<Rule> {
    BTreeSet::from([
        Rule::new("#cop26", "cop26").with_id("1"),
        Rule::new("#old", "old").with_id("9"),
    ])
}

// ============================================================================
// planning
// ============================================================================

#[tokio::test]
async fn in_sync_state_is_noop() {
    let registry = FakeRegistry::new(remote_rules());
    let orchestrator = in_sync_orchestrator();

    let plan = plan(&registry, &orchestrator).await;
    assert!(plan.is_noop());
    assert!(plan.steps(Mode::Apply).is_empty());
    assert_eq!(plan.collector.to_plan(), None);
}

#[tokio::test]
async fn drifted_rules_plan_one_delete_and_one_add() {
    let registry = FakeRegistry::new(drifted_rules());
    let plan = plan(&registry, &in_sync_orchestrator()).await;

    assert_eq!(plan.rules.delete, vec![Rule::new("#old", "old").with_id("9")]);
    assert_eq!(plan.rules.add, vec![Rule::new("#climatechange", "climate")]);
    assert_eq!(
        plan.rules.to_plan(),
        json!({
            "add": [{"value": "#climatechange", "tag": "climate"}],
            "delete": [{"value": "#old", "tag": "old", "id": "9"}]
        })
    );
}

#[tokio::test]
async fn missing_collector_is_planned_for_creation() {
    let registry = FakeRegistry::new(remote_rules());
    let plan = plan(&registry, &FakeOrchestrator::missing()).await;

    assert_eq!(plan.collector.action, CollectorAction::Create);
    assert_eq!(plan.collector.diff, None);
    assert_eq!(
        plan.collector.to_plan(),
        Some(json!(["Stream collector should be created"]))
    );
}

#[tokio::test]
async fn stopped_collector_is_planned_for_start() {
    let registry = FakeRegistry::new(remote_rules());
    let orchestrator = FakeOrchestrator::with(Some(observed_from(&desired_spec(&compose()))), false);
    let plan = plan(&registry, &orchestrator).await;

    assert_eq!(plan.collector.action, CollectorAction::Start);
    assert_eq!(
        plan.collector.to_plan(),
        Some(json!(["Stream collection needs to be started"]))
    );
}

#[tokio::test]
async fn changed_image_is_planned_for_recreation() {
    let mut observed = observed_from(&desired_spec(&compose()));
    observed.image = "ghcr.io/smassonnet/twcollect:0.3.0".into();
    let orchestrator = FakeOrchestrator::with(Some(observed), true);
    let plan = plan(&FakeRegistry::new(remote_rules()), &orchestrator).await;

    assert_eq!(plan.collector.action, CollectorAction::RecreateAndStart);
    assert_eq!(
        plan.collector.to_plan(),
        Some(json!([{
            "Collector will be updated as follows": {
                "image_name": {
                    "current": "ghcr.io/smassonnet/twcollect:0.3.0",
                    "new": "ghcr.io/smassonnet/twcollect:0.4.1"
                }
            }
        }]))
    );
}

#[tokio::test]
async fn remote_rule_without_id_fails_planning() {
    let registry = FakeRegistry::new(BTreeSet::from([Rule::new("#orphan", "x")]));
    let config = compose();
    let err = reconcile::plan(
        &registry,
        &in_sync_orchestrator(),
        PROJECT,
        &config,
        &desired_spec(&config),
    )
    .await
    .expect_err("missing id");
    assert!(matches!(
        err.downcast_ref::<RuleError>(),
        Some(RuleError::MissingId { .. })
    ));
}

// ============================================================================
// execution
// ============================================================================

#[tokio::test]
async fn nothing_to_do_touches_nothing() {
    let registry = FakeRegistry::new(remote_rules());
    let orchestrator = in_sync_orchestrator();

    let outcome = run(&registry, &orchestrator, Mode::Apply).await.expect("up");
    assert_eq!(outcome, ReconcileOutcome::NothingToDo);
    assert!(registry.posts().is_empty());
    assert!(orchestrator.calls().is_empty());
}

#[tokio::test]
async fn apply_posts_deletes_before_adds() {
    let registry = FakeRegistry::new(drifted_rules());
    let orchestrator = in_sync_orchestrator();

    let outcome = run(&registry, &orchestrator, Mode::Apply).await.expect("up");
    assert_eq!(outcome, ReconcileOutcome::Applied(vec![Step::ApplyRules]));
    assert_eq!(
        registry.posts(),
        vec![
            (json!({"delete": {"ids": ["9"]}}), false),
            (
                json!({"add": [{"value": "#climatechange", "tag": "climate"}]}),
                false
            ),
        ]
    );
    assert!(orchestrator.calls().is_empty());
}

#[tokio::test]
async fn apply_runs_rules_then_collector() {
    let registry = FakeRegistry::new(drifted_rules());
    let orchestrator = FakeOrchestrator::missing();

    let outcome = run(&registry, &orchestrator, Mode::Apply).await.expect("up");
    assert_eq!(
        outcome,
        ReconcileOutcome::Applied(vec![
            Step::ApplyRules,
            Step::ApplyCollector(CollectorAction::Create)
        ])
    );
    assert_eq!(
        orchestrator.calls(),
        ["create_and_start cop ghcr.io/smassonnet/twcollect:0.4.1"]
    );
}

#[tokio::test]
async fn recreation_stops_and_removes_first() {
    let mut observed = observed_from(&desired_spec(&compose()));
    observed.command = vec!["-c".into(), "/app/credentials.yml".into()];
    let orchestrator = FakeOrchestrator::with(Some(observed), true);

    run(&FakeRegistry::new(remote_rules()), &orchestrator, Mode::Apply)
        .await
        .expect("up");
    assert_eq!(
        orchestrator.calls(),
        [
            "stop cop",
            "remove cop",
            "create_and_start cop ghcr.io/smassonnet/twcollect:0.4.1"
        ]
    );
}

#[tokio::test]
async fn stopped_collector_is_started_in_place() {
    let orchestrator = FakeOrchestrator::with(Some(observed_from(&desired_spec(&compose()))), false);
    run(&FakeRegistry::new(remote_rules()), &orchestrator, Mode::Apply)
        .await
        .expect("up");
    assert_eq!(orchestrator.calls(), ["start cop"]);
}

#[tokio::test]
async fn dry_run_validates_rules_and_never_touches_collector() {
    let registry = FakeRegistry::new(drifted_rules());
    let orchestrator = FakeOrchestrator::missing();

    let outcome = run(&registry, &orchestrator, Mode::DryRun).await.expect("check");
    assert_eq!(outcome, ReconcileOutcome::Validated);
    assert!(registry.posts().iter().all(|(_, dry_run)| *dry_run));
    assert_eq!(registry.posts().len(), 2);
    assert!(orchestrator.calls().is_empty());
}

#[tokio::test]
async fn dry_run_with_only_collector_changes_posts_nothing() {
    let registry = FakeRegistry::new(remote_rules());
    let orchestrator = FakeOrchestrator::missing();

    let outcome = run(&registry, &orchestrator, Mode::DryRun).await.expect("check");
    assert_eq!(outcome, ReconcileOutcome::Validated);
    assert!(registry.posts().is_empty());
    assert!(orchestrator.calls().is_empty());
}

#[tokio::test]
async fn rejected_rules_halt_before_collector() {
    let registry =
        FakeRegistry::rejecting(drifted_rules(), vec![json!({"title": "DuplicateRule"})]);
    let orchestrator = FakeOrchestrator::missing();

    let err = run(&registry, &orchestrator, Mode::Apply)
        .await
        .expect_err("rejected");
    assert!(matches!(
        err.downcast_ref::<RegistryError>(),
        Some(RegistryError::Rejected(errors)) if errors.len() == 2
    ));
    assert!(err.to_string().starts_with("Couldn't create all rules"));
    assert!(orchestrator.calls().is_empty());
}

#[tokio::test]
async fn accepted_delete_with_rejected_add_reports_add_errors_only() {
    let add_error = json!({"title": "DuplicateRule", "value": "#climatechange"});
    let registry = FakeRegistry::scripted(drifted_rules(), vec![vec![], vec![add_error.clone()]]);
    let orchestrator = FakeOrchestrator::missing();

    let err = run(&registry, &orchestrator, Mode::Apply)
        .await
        .expect_err("rejected");

    let posts = registry.posts();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].0, json!({"delete": {"ids": ["9"]}}));
    assert!(posts[1].0.get("add").is_some());
    assert!(posts.iter().all(|(_, dry_run)| !*dry_run));
    match err.downcast_ref::<RegistryError>() {
        Some(RegistryError::Rejected(errors)) => assert_eq!(errors, &vec![add_error]),
        other => panic!("expected rejection, got {other:?}"),
    }
    assert!(orchestrator.calls().is_empty());
}

#[tokio::test]
async fn rejected_dry_run_fails_too() {
    let registry = FakeRegistry::rejecting(drifted_rules(), vec![json!({"title": "Invalid"})]);
    let err = run(&registry, &in_sync_orchestrator(), Mode::DryRun)
        .await
        .expect_err("rejected");
    assert!(err.downcast_ref::<RegistryError>().is_some());
}

#[tokio::test]
async fn reporter_sees_each_step() {
    let config = compose();
    let desired = desired_spec(&config);
    let registry = FakeRegistry::new(drifted_rules());
    let orchestrator = FakeOrchestrator::missing();
    let reporter = RecordingReporter::default();

    let plan = reconcile::plan(&registry, &orchestrator, PROJECT, &config, &desired)
        .await
        .expect("plan");
    reconcile::execute(
        &registry,
        &orchestrator,
        &reporter,
        PROJECT,
        &desired,
        &plan,
        Mode::Apply,
    )
    .await
    .expect("up");

    let events = reporter.events();
    assert_eq!(events.len(), 4);
    assert!(events[0].starts_with("step: updating Twitter rules"));
    assert!(events[2].starts_with("step: starting stream collector cop"));
}
