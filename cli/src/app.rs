//! Application context: unified state passed to every command handler.
//!
//! Holds the resolved global flags and builds the adapters on demand, so a
//! command that never talks to Twitter never needs credentials.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use twcompose_common::TwitterComposeModel;

use crate::domain::CollectorDesiredSpec;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::{load_compose, load_credentials};
use crate::infra::docker::DockerOrchestrator;
use crate::infra::transport::RateLimitedTransport;
use crate::infra::twitter::TwitterRuleRegistry;
use crate::output::OutputContext;

/// Output rendering flags.
pub struct OutputFlags {
    pub no_color: bool,
    pub quiet: bool,
}

/// Project selection flags.
pub struct ProjectFlags {
    /// Compose file path.
    pub file: PathBuf,
    /// Project name; defaults to the working directory name.
    pub project_name: Option<String>,
    /// Credentials file path.
    pub credentials: PathBuf,
    /// Twitter API root.
    pub api_url: String,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    pub project: ProjectFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    pub output: OutputContext,
    /// Project name, used to name the collector container.
    pub project: String,
    pub compose_file: PathBuf,
    pub credentials_file: PathBuf,
    pub api_url: String,
    /// Directory relative paths are resolved against.
    pub cwd: PathBuf,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined, or
    /// has no usable name and no project name was given.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let cwd = std::env::current_dir().context("cannot determine working directory")?;
        let project = match flags.project.project_name {
            Some(name) => name,
            None => default_project_name(&cwd)?,
        };
        tracing::debug!(%project, file = %flags.project.file.display(), "resolved project");

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            project,
            compose_file: flags.project.file,
            credentials_file: flags.project.credentials,
            api_url: flags.project.api_url,
            cwd,
        })
    }

    /// Parse the compose file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or invalid.
    pub fn load_compose(&self) -> Result<TwitterComposeModel> {
        load_compose(&self.compose_file)
    }

    /// Registry client authenticated with the credentials file's token.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials cannot be read or carry no token.
    pub fn registry(&self) -> Result<TwitterRuleRegistry> {
        let credentials = load_credentials(&self.credentials_file)?;
        let token = credentials
            .twitter_token()
            .with_context(|| format!("in {}", self.credentials_file.display()))?;
        let transport = RateLimitedTransport::new(token)?;
        TwitterRuleRegistry::new(transport, &self.api_url)
    }

    #[must_use]
    pub fn orchestrator(&self) -> DockerOrchestrator<TokioCommandRunner> {
        DockerOrchestrator::default()
    }

    /// Collector spec for `config`, with paths resolved against the working
    /// directory.
    #[must_use]
    pub fn desired_spec(&self, config: &TwitterComposeModel) -> CollectorDesiredSpec {
        CollectorDesiredSpec::from_compose(config, &self.credentials_file, &self.cwd)
    }
}

/// Name of the directory the tool runs in.
///
/// # Errors
///
/// Returns an error for a root or non-UTF-8 directory.
pub fn default_project_name(cwd: &Path) -> Result<String> {
    cwd.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .with_context(|| {
            format!(
                "cannot derive a project name from {}, pass --project-name",
                cwd.display()
            )
        })
}
