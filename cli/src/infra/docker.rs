//! Docker CLI adapter for the `ContainerOrchestrator` port.
//!
//! All calls go through a `CommandRunner`, so tests inject a scripted runner
//! instead of talking to a docker daemon.

use std::collections::BTreeSet;
use std::process::Output;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::application::ports::{CommandRunner, ContainerOrchestrator};
use crate::domain::{CollectorDesiredSpec, CollectorObservedState, RestartPolicy, container_name};
use crate::infra::command_runner::{PULL_TIMEOUT, TokioCommandRunner};

const DOCKER: &str = "docker";

// ── docker inspect ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Inspect {
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    mounts: Vec<Mount>,
    config: InspectConfig,
    state: InspectState,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Mount {
    source: String,
    destination: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectConfig {
    image: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InspectState {
    running: bool,
}

/// Observed attributes and running flag of a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectedContainer {
    pub state: CollectorObservedState,
    pub running: bool,
}

/// Parse the JSON array printed by `docker inspect --type container`.
///
/// # Errors
///
/// Returns an error if the output is not an inspect document or is empty.
pub fn parse_inspect(json: &str) -> Result<InspectedContainer> {
    let mut entries: Vec<Inspect> =
        serde_json::from_str(json).context("cannot parse docker inspect output")?;
    let entry = entries
        .pop()
        .context("docker inspect returned no container")?;
    let volumes: BTreeSet<String> = entry
        .mounts
        .into_iter()
        .map(|m| format!("{}:{}", m.source, m.destination))
        .collect();
    Ok(InspectedContainer {
        state: CollectorObservedState {
            image: entry.config.image,
            command: entry.args,
            volumes,
        },
        running: entry.state.running,
    })
}

/// Arguments of the `docker run` call creating the collector.
#[must_use]
pub fn docker_run_args(project: &str, spec: &CollectorDesiredSpec) -> Vec<String> {
    let RestartPolicy::OnFailure { max_retries } = spec.restart_policy;
    let mut args = vec![
        "run".to_string(),
        "--detach".to_string(),
        "--name".to_string(),
        container_name(project),
        "--restart".to_string(),
        format!("on-failure:{max_retries}"),
    ];
    for volume in &spec.volumes {
        args.extend(["--volume".to_string(), volume.clone()]);
    }
    args.push(spec.image.clone());
    args.extend(spec.command.iter().cloned());
    args
}

fn is_missing_container(output: &Output) -> bool {
    String::from_utf8_lossy(&output.stderr).contains("No such")
}

fn check(output: Output, what: &str) -> Result<Output> {
    if output.status.success() {
        return Ok(output);
    }
    let stderr = String::from_utf8_lossy(&output.stderr);
    anyhow::bail!("{what} failed: {}", stderr.trim())
}

// ── Orchestrator ─────────────────────────────────────────────────────────────

/// Runs the collector as a local docker container named `stream_<project>`.
pub struct DockerOrchestrator<R: CommandRunner> {
    runner: R,
}

impl<R: CommandRunner> DockerOrchestrator<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    async fn inspect(&self, project: &str) -> Result<Option<InspectedContainer>> {
        let name = container_name(project);
        let output = self
            .runner
            .run(DOCKER, &["inspect", "--type", "container", &name])
            .await?;
        if !output.status.success() && is_missing_container(&output) {
            return Ok(None);
        }
        let output = check(output, "docker inspect")?;
        parse_inspect(&String::from_utf8_lossy(&output.stdout)).map(Some)
    }

    async fn container_cmd(&self, verb: &str, project: &str) -> Result<()> {
        let name = container_name(project);
        tracing::debug!(container = %name, verb, "docker");
        let output = self.runner.run(DOCKER, &[verb, &name]).await?;
        check(output, &format!("docker {verb} {name}"))?;
        Ok(())
    }
}

impl Default for DockerOrchestrator<TokioCommandRunner> {
    fn default() -> Self {
        Self::new(TokioCommandRunner::default())
    }
}

impl<R: CommandRunner> ContainerOrchestrator for DockerOrchestrator<R> {
    async fn observed_state(&self, project: &str) -> Result<Option<CollectorObservedState>> {
        Ok(self.inspect(project).await?.map(|c| c.state))
    }

    async fn is_running(&self, project: &str) -> Result<bool> {
        Ok(self.inspect(project).await?.is_some_and(|c| c.running))
    }

    async fn create_and_start(&self, project: &str, spec: &CollectorDesiredSpec) -> Result<()> {
        let args = docker_run_args(project, spec);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        tracing::info!(container = %container_name(project), image = %spec.image, "creating collector");
        let output = self
            .runner
            .run_with_timeout(DOCKER, &args, PULL_TIMEOUT)
            .await?;
        check(output, "docker run")?;
        Ok(())
    }

    async fn stop(&self, project: &str) -> Result<()> {
        self.container_cmd("stop", project).await
    }

    async fn remove(&self, project: &str) -> Result<()> {
        self.container_cmd("rm", project).await
    }

    async fn start(&self, project: &str) -> Result<()> {
        self.container_cmd("start", project)
            .await
            .with_context(|| format!("cannot start collector of {project}"))
    }
}
