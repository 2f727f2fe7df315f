//! Ports: what the reconciliation services need from the outside world.
//!
//! Adapters in `crate::infra` implement these; unit tests substitute
//! recording fakes.

use std::collections::BTreeSet;
use std::process::Output;

use anyhow::Result;
use serde_json::Value;

use crate::domain::{CollectorDesiredSpec, CollectorObservedState, Rule};

// ── Rule Registry Port ────────────────────────────────────────────────────────

/// Remote registry holding the stream filter rules.
#[allow(async_fn_in_trait)]
pub trait RuleRegistry {
    /// Fetch the rules currently installed, with their ids.
    async fn fetch_rules(&self) -> Result<BTreeSet<Rule>>;

    /// Post one change request (`{"delete": ...}` or `{"add": ...}`).
    ///
    /// Returns the per-item errors reported by the registry, possibly empty.
    /// With `dry_run` the registry validates without committing.
    ///
    /// # Errors
    ///
    /// Returns an error only on transport failure.
    async fn post_rules(&self, body: &Value, dry_run: bool) -> Result<Vec<Value>>;
}

/// Daily matching-tweet counts for a query, used for volume estimation.
#[allow(async_fn_in_trait)]
pub trait TweetCountSource {
    /// Counts per day over the recent window, oldest first.
    async fn daily_counts(&self, query: &str) -> Result<Vec<u64>>;
}

// ── Container Orchestrator Port ───────────────────────────────────────────────

/// Lifecycle of the collector container of a project.
#[allow(async_fn_in_trait)]
pub trait ContainerOrchestrator {
    /// Attributes of the project's container, `None` if it was never created.
    async fn observed_state(&self, project: &str) -> Result<Option<CollectorObservedState>>;
    /// `false` when the container is stopped or does not exist.
    async fn is_running(&self, project: &str) -> Result<bool>;
    /// Create a new container from `spec` and start it.
    async fn create_and_start(&self, project: &str, spec: &CollectorDesiredSpec) -> Result<()>;
    async fn stop(&self, project: &str) -> Result<()>;
    async fn remove(&self, project: &str) -> Result<()>;
    /// Start an existing, stopped container.
    async fn start(&self, project: &str) -> Result<()>;
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Process execution used by the docker adapter.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program with the runner's default timeout and capture its output.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// A timed-out child is killed.
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: std::time::Duration,
    ) -> Result<Output>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Progress events emitted while reconciliation steps run.
pub trait ProgressReporter {
    fn step(&self, message: &str);
    fn success(&self, message: &str);
    fn warn(&self, message: &str);
}
