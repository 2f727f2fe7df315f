//! Filter rules and the add/delete diff pushed to the rule registry.
//!
//! Pure functions only. Fetching and posting live behind the `RuleRegistry`
//! port.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use twcompose_common::{StreamRuleModel, TwitterComposeModel};

use crate::domain::error::RuleError;

/// A stream filter rule.
///
/// `id` is assigned by the registry; rules built from the compose file never
/// carry one. Equality and ordering include the id, equivalence does not.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rule {
    pub value: String,
    /// The registry allows untagged rules; they deserialize with an empty tag
    /// and never match a configured rule.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub tag: String,
    #[serde(default)]
    pub id: Option<String>,
}

fn null_as_empty<'de, D: serde::Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(de)?.unwrap_or_default())
}

impl Rule {
    #[must_use]
    pub fn new(value: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            tag: tag.into(),
            id: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Same definition (value and tag), regardless of id.
    #[must_use]
    pub fn is_equivalent(&self, other: &Rule) -> bool {
        self.value == other.value && self.tag == other.tag
    }

    fn to_json(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("value".into(), Value::String(self.value.clone()));
        obj.insert("tag".into(), Value::String(self.tag.clone()));
        obj.insert(
            "id".into(),
            self.id.clone().map_or(Value::Null, Value::String),
        );
        Value::Object(obj)
    }
}

impl From<&StreamRuleModel> for Rule {
    fn from(model: &StreamRuleModel) -> Self {
        Self::new(model.value.clone(), model.tag.clone())
    }
}

/// Desired rules of a compose file.
///
/// Collected into an ordered set: exact duplicates across stream groups
/// collapse into one rule.
#[must_use]
pub fn desired_rules(config: &TwitterComposeModel) -> BTreeSet<Rule> {
    config.rules().map(Rule::from).collect()
}

/// Changes to post to the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSetDiff {
    pub add: Vec<Rule>,
    pub delete: Vec<Rule>,
}

impl RuleSetDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.delete.is_empty()
    }

    /// Request bodies for the registry, in posting order.
    ///
    /// At most two elements: `{"delete": {"ids": [...]}}` then
    /// `{"add": [{value, tag}, ...]}`. Empty sides are omitted.
    #[must_use]
    pub fn to_payload(&self) -> Vec<Value> {
        let mut payload = Vec::with_capacity(2);
        if !self.delete.is_empty() {
            let ids = self
                .delete
                .iter()
                .map(|r| r.id.clone().map_or(Value::Null, Value::String))
                .collect();
            let mut ids_obj = Map::new();
            ids_obj.insert("ids".into(), Value::Array(ids));
            let mut obj = Map::new();
            obj.insert("delete".into(), Value::Object(ids_obj));
            payload.push(Value::Object(obj));
        }
        if !self.add.is_empty() {
            let mut obj = Map::new();
            obj.insert(
                "add".into(),
                Value::Array(self.add.iter().map(Rule::to_json).collect()),
            );
            payload.push(Value::Object(obj));
        }
        payload.into_iter().map(strip_nulls).collect()
    }

    /// Human-facing form of the diff, `{add: [...], delete: [...]}`.
    #[must_use]
    pub fn to_plan(&self) -> Value {
        let mut obj = Map::new();
        obj.insert(
            "add".into(),
            Value::Array(self.add.iter().map(Rule::to_json).collect()),
        );
        obj.insert(
            "delete".into(),
            Value::Array(self.delete.iter().map(Rule::to_json).collect()),
        );
        strip_nulls(Value::Object(obj))
    }
}

/// Drop `null` object fields at every depth.
///
/// Arrays keep their length; only object members are removed.
#[must_use]
pub fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        scalar => scalar,
    }
}

/// Compute the changes that turn `current` into `desired`.
///
/// Each current rule consumes at most one equivalent desired rule (the first
/// in set order). Unmatched current rules are deleted; desired rules left
/// unconsumed are added. No rule is both added and deleted.
///
/// # Errors
///
/// Returns [`RuleError::MissingId`] if a current rule must be deleted but has
/// no id.
pub fn compute_diff(
    current: &BTreeSet<Rule>,
    desired: &BTreeSet<Rule>,
) -> Result<RuleSetDiff, RuleError> {
    let mut remaining: Vec<&Rule> = desired.iter().collect();
    let mut delete = Vec::new();

    for rule in current {
        if let Some(pos) = remaining.iter().position(|d| rule.is_equivalent(d)) {
            remaining.remove(pos);
            continue;
        }
        if rule.id.is_none() {
            return Err(RuleError::MissingId {
                value: rule.value.clone(),
                tag: rule.tag.clone(),
            });
        }
        delete.push(rule.clone());
    }

    Ok(RuleSetDiff {
        add: remaining.into_iter().cloned().collect(),
        delete,
    })
}
