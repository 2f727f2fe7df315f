//! `twitter-compose.yml` model.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::parameters::StreamParameters;

/// Collector image used when the compose file does not name one.
pub const DEFAULT_IMAGE_NAME: &str = "ghcr.io/smassonnet/twcollect";

/// Scalar value of an output driver option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Int(i64),
    Str(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Str(v) => f.write_str(v),
        }
    }
}

/// Where and how the collector writes matching tweets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputDriver {
    pub driver: String,
    pub path: String,
    #[serde(default)]
    pub options: BTreeMap<String, OptionValue>,
}

/// One rule of a stream group.
///
/// Tags are optional on the registry side but required here so collected
/// tweets can be traced back to their stream group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamRuleModel {
    pub value: String,
    pub tag: String,
}

/// Top-level compose file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwitterComposeModel {
    pub image_tag: String,
    pub output: OutputDriver,
    #[serde(default)]
    pub parameters: StreamParameters,
    pub streams: BTreeMap<String, Vec<StreamRuleModel>>,
    #[serde(default = "default_image_name")]
    pub image_name: String,
}

fn default_image_name() -> String {
    DEFAULT_IMAGE_NAME.to_string()
}

/// A tag shared by more than one stream group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagConflict {
    pub tag: String,
    pub groups: Vec<String>,
}

impl fmt::Display for TagConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Found tag '{}' in stream groups {}, this can lead to inconsistent behaviour \
             when retrieving tweets for a stream group",
            self.tag,
            self.groups.join(",")
        )
    }
}

impl TwitterComposeModel {
    /// Full image reference of the collector, `name:tag`.
    #[must_use]
    pub fn image(&self) -> String {
        format!("{}:{}", self.image_name, self.image_tag)
    }

    /// All rules across stream groups, in group order.
    pub fn rules(&self) -> impl Iterator<Item = &StreamRuleModel> {
        self.streams.values().flatten()
    }

    /// `max_file_size` output option, if set.
    #[must_use]
    pub fn max_file_size(&self) -> Option<&OptionValue> {
        self.output.options.get("max_file_size")
    }

    /// Tags that appear in more than one stream group.
    #[must_use]
    pub fn tag_conflicts(&self) -> Vec<TagConflict> {
        let mut groups_by_tag: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (group, rules) in &self.streams {
            for rule in rules {
                groups_by_tag.entry(&rule.tag).or_default().insert(group);
            }
        }
        groups_by_tag
            .into_iter()
            .filter(|(_, groups)| groups.len() > 1)
            .map(|(tag, groups)| TagConflict {
                tag: tag.to_string(),
                groups: groups.into_iter().map(str::to_string).collect(),
            })
            .collect()
    }
}
