//! Rules, collector specs and volume arithmetic.
//!
//! Synchronous and free of I/O; the layering is checked by the
//! `architecture` unit tests.

pub mod collector;
pub mod error;
pub mod rule;
pub mod volume;

pub use collector::{
    Attribute, AttributeDiff, AttributeDiffs, CollectorAction, CollectorDesiredSpec,
    CollectorObservedState, RestartPolicy, container_name, decide_action, diff_attributes,
};
pub use error::{CollectorError, RegistryError, RuleError};
pub use rule::{Rule, RuleSetDiff, compute_diff, desired_rules, strip_nulls};
