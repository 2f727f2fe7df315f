//! Unit tests for the `status`, `stop` and `volume` use-cases.

#![allow(clippy::expect_used)]

use std::collections::BTreeMap;

use twcompose_cli::application::services::status::collect_status;
use twcompose_cli::application::services::stop::{StopOutcome, ensure_stopped};
use twcompose_cli::application::services::volume::{estimate_volumes, rules_to_estimate};

use crate::mocks::{
    FakeCounter, FakeOrchestrator, FakeRegistry, compose, desired_spec, observed_from,
    remote_rules,
};

// ============================================================================
// status
// ============================================================================

#[tokio::test]
async fn status_lists_active_rules_and_running_flag() {
    let registry = FakeRegistry::new(remote_rules());
    let orchestrator = FakeOrchestrator::with(Some(observed_from(&desired_spec(&compose()))), true);

    let report = collect_status(&registry, &orchestrator, "cop")
        .await
        .expect("status");
    assert_eq!(report.active_rules.len(), 2);
    assert!(report.running);
}

#[tokio::test]
async fn status_of_missing_collector_is_stopped() {
    let registry = FakeRegistry::new(remote_rules());
    let report = collect_status(&registry, &FakeOrchestrator::missing(), "cop")
        .await
        .expect("status");
    assert!(!report.running);
}

// ============================================================================
// stop
// ============================================================================

#[tokio::test]
async fn running_collector_is_stopped() {
    let orchestrator = FakeOrchestrator::with(Some(observed_from(&desired_spec(&compose()))), true);
    let outcome = ensure_stopped(&orchestrator, "cop").await.expect("stop");
    assert_eq!(outcome, StopOutcome::Stopped);
    assert_eq!(orchestrator.calls(), ["stop cop"]);
}

#[tokio::test]
async fn stopped_collector_is_left_alone() {
    let orchestrator = FakeOrchestrator::with(Some(observed_from(&desired_spec(&compose()))), false);
    let outcome = ensure_stopped(&orchestrator, "cop").await.expect("stop");
    assert_eq!(outcome, StopOutcome::AlreadyStopped);
    assert!(orchestrator.calls().is_empty());
}

#[tokio::test]
async fn missing_collector_counts_as_stopped() {
    let orchestrator = FakeOrchestrator::missing();
    let outcome = ensure_stopped(&orchestrator, "cop").await.expect("stop");
    assert_eq!(outcome, StopOutcome::AlreadyStopped);
}

// ============================================================================
// volume
// ============================================================================

fn counter() -> FakeCounter {
    FakeCounter(BTreeMap::from([
        ("#cop26".to_string(), vec![10, 20, 30]),
        ("#climatechange".to_string(), vec![100, 200]),
        ("#quiet".to_string(), vec![]),
    ]))
}

#[test]
fn requested_rules_take_precedence() {
    let rules = rules_to_estimate(&compose(), &["#quiet".to_string()]);
    assert_eq!(rules, ["#quiet"]);
}

#[test]
fn default_rules_are_every_configured_value() {
    let mut rules = rules_to_estimate(&compose(), &[]);
    rules.sort();
    assert_eq!(rules, ["#climatechange", "#cop26"]);
}

#[tokio::test]
async fn volumes_are_ranked_largest_first() {
    let rules = vec!["#cop26".into(), "#quiet".into(), "#climatechange".into()];
    let volumes = estimate_volumes(&counter(), rules, None)
        .await
        .expect("volumes");
    assert_eq!(
        volumes,
        vec![
            ("#climatechange".to_string(), 4650),
            ("#cop26".to_string(), 620),
            ("#quiet".to_string(), 0),
        ]
    );
}

#[tokio::test]
async fn min_keeps_strictly_greater_volumes() {
    let rules = vec!["#cop26".into(), "#climatechange".into()];
    let volumes = estimate_volumes(&counter(), rules, Some(620))
        .await
        .expect("volumes");
    assert_eq!(volumes, vec![("#climatechange".to_string(), 4650)]);
}

#[tokio::test]
async fn count_failure_names_the_rule() {
    let err = estimate_volumes(&counter(), vec!["#unknown".into()], None)
        .await
        .expect_err("no counts");
    assert!(err.to_string().contains("#unknown"));
}
