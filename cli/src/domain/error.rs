//! Typed errors callers may want to match on. Everything else travels as
//! `anyhow::Error` with context.

use thiserror::Error;

// ── Rule errors ───────────────────────────────────────────────────────────────

/// Errors raised while planning rule changes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    /// A remote rule selected for deletion has no id. The registry always
    /// assigns ids, so this means the fetched rule set is malformed.
    #[error("Cannot plan deletion of rule '{value}' (tag '{tag}') without an id.")]
    MissingId { value: String, tag: String },
}

// ── Registry errors ───────────────────────────────────────────────────────────

/// Semantic rejections reported by the rule registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry answered with per-item errors, kept verbatim.
    #[error("Couldn't create all rules: {}", render_errors(.0))]
    Rejected(Vec<serde_json::Value>),
}

fn render_errors(errors: &[serde_json::Value]) -> String {
    serde_json::to_string(errors).unwrap_or_else(|_| format!("{errors:?}"))
}

// ── Collector errors ──────────────────────────────────────────────────────────

/// Errors related to the collector container.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectorError {
    /// No container has been created for the project yet.
    #[error("No stream collector exists for project '{0}'.")]
    NotFound(String),
}
