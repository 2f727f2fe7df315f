//! Collector container: desired spec, attribute diff and action decision.
//!
//! Pure data in, data out.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Component, Path, PathBuf};

use serde::Serialize;
use twcompose_common::TwitterComposeModel;

/// Mount point of the credentials file inside the collector.
pub const CREDENTIALS_MOUNT: &str = "/app/credentials.yml";

/// Mount point of the output directory inside the collector.
pub const OUTPUT_MOUNT: &str = "/app/output";

/// Retries granted to a crashing collector before the runtime gives up.
pub const MAX_RESTART_RETRIES: u32 = 10;

/// Name of the collector container of a project.
#[must_use]
pub fn container_name(project: &str) -> String {
    format!("stream_{project}")
}

/// Restart policy applied when the container is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestartPolicy {
    OnFailure { max_retries: u32 },
}

/// What the collector should look like for a compose file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorDesiredSpec {
    /// Image reference, `name:tag`.
    pub image: String,
    pub command: Vec<String>,
    /// `source:destination` bindings.
    pub volumes: BTreeSet<String>,
    pub restart_policy: RestartPolicy,
}

impl CollectorDesiredSpec {
    /// Build the spec from a compose file.
    ///
    /// Relative `credentials_file` and output paths are resolved against
    /// `cwd`.
    #[must_use]
    pub fn from_compose(config: &TwitterComposeModel, credentials_file: &Path, cwd: &Path) -> Self {
        let mut command = vec!["-c".to_string(), CREDENTIALS_MOUNT.to_string()];

        let params = config.parameters.to_querystring();
        if !params.is_empty() {
            command.extend(["-p".to_string(), params]);
        }
        if let Some(size) = config.max_file_size() {
            command.extend(["--max-file-size".to_string(), size.to_string()]);
        }
        command.push(OUTPUT_MOUNT.to_string());

        let credentials = resolve(cwd, credentials_file);
        let output = resolve(cwd, Path::new(&config.output.path));
        let volumes = BTreeSet::from([
            format!("{}:{CREDENTIALS_MOUNT}", credentials.display()),
            format!("{}:{OUTPUT_MOUNT}", output.display()),
        ]);

        Self {
            image: config.image(),
            command,
            volumes,
            restart_policy: RestartPolicy::OnFailure {
                max_retries: MAX_RESTART_RETRIES,
            },
        }
    }
}

/// Join `path` onto `cwd` and drop `.` components, matching the cleaned
/// mount sources docker reports.
fn resolve(cwd: &Path, path: &Path) -> PathBuf {
    cwd.join(path)
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Attributes read back from an existing collector container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorObservedState {
    pub image: String,
    pub command: Vec<String>,
    pub volumes: BTreeSet<String>,
}

/// Compared collector attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    ImageName,
    Volumes,
    Command,
}

impl Attribute {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ImageName => "image_name",
            Self::Volumes => "volumes",
            Self::Command => "command",
        }
    }
}

/// Current and desired rendering of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeDiff {
    pub current: String,
    pub new: String,
}

/// Differing attributes only; empty when the container matches.
pub type AttributeDiffs = BTreeMap<Attribute, AttributeDiff>;

fn volumes_to_string(volumes: &BTreeSet<String>) -> String {
    // BTreeSet iteration is sorted, so binding order never matters.
    volumes.iter().map(String::as_str).collect::<Vec<_>>().join(" ; ")
}

fn command_to_string(command: &[String]) -> String {
    command.join(" ")
}

/// Compare an observed container with the desired spec.
#[must_use]
pub fn diff_attributes(
    observed: &CollectorObservedState,
    desired: &CollectorDesiredSpec,
) -> AttributeDiffs {
    [
        (Attribute::ImageName, observed.image.clone(), desired.image.clone()),
        (
            Attribute::Volumes,
            volumes_to_string(&observed.volumes),
            volumes_to_string(&desired.volumes),
        ),
        (
            Attribute::Command,
            command_to_string(&observed.command),
            command_to_string(&desired.command),
        ),
    ]
    .into_iter()
    .filter(|(_, current, new)| current != new)
    .map(|(attr, current, new)| (attr, AttributeDiff { current, new }))
    .collect()
}

/// What to do with the collector container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectorAction {
    /// Container matches and runs.
    Noop,
    /// Container matches but is stopped.
    Start,
    /// Attributes changed: stop, remove, create and start.
    RecreateAndStart,
    /// No container yet.
    Create,
}

/// Decide the action from the diff (`None` when no container exists) and
/// the running flag.
#[must_use]
pub fn decide_action(diff: Option<&AttributeDiffs>, running: bool) -> CollectorAction {
    match diff {
        None => CollectorAction::Create,
        Some(d) if !d.is_empty() => CollectorAction::RecreateAndStart,
        Some(_) if running => CollectorAction::Noop,
        Some(_) => CollectorAction::Start,
    }
}
