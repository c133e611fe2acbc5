//! Error types for the domain layer

use crate::ArtifactId;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Errors raised while constructing domain values
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier string is not a valid UUID
    #[error("Invalid identifier '{value}': {reason}")]
    InvalidId {
        /// The rejected input
        value: String,
        /// Why the UUID parser rejected it
        reason: String,
    },

    /// A composite rule needs at least two sub-rules
    #[error("Composite rule needs at least 2 sub-rules, got {0}")]
    TooFewSubRules(usize),

    /// An artifact type name cannot be written in rule text
    #[error("Invalid artifact type name '{value}': {reason}")]
    InvalidTypeName {
        /// The rejected name
        value: String,
        /// Which part of the rule grammar it collides with
        reason: &'static str,
    },

    /// A rule name is empty or whitespace
    #[error("Rule name is empty")]
    EmptyRuleName,
}

/// Which end of a trace link could not be resolved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingEndpoint {
    /// The child side of the link
    Source,
    /// The parent side of the link
    Target,
    /// Neither side exists in the snapshot
    Both,
}

impl fmt::Display for MissingEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MissingEndpoint::Source => "source",
            MissingEndpoint::Target => "target",
            MissingEndpoint::Both => "source and target",
        };
        f.write_str(s)
    }
}

/// A visible trace link pointing at an artifact that is not in the snapshot
///
/// Collected while building the relationship graph. The offending link is
/// left out of the graph; every other link still contributes its edge.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[error("Trace link {source_id} -> {target_id} skipped: unknown {missing} artifact")]
pub struct DanglingReferenceError {
    /// Child artifact declared by the link
    pub source_id: ArtifactId,
    /// Parent artifact declared by the link
    pub target_id: ArtifactId,
    /// Endpoint(s) absent from the artifact set
    pub missing: MissingEndpoint,
}
