//! The warnings map handed back to callers

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracelint_domain::ArtifactId;

/// Violated rule names per artifact
///
/// Artifacts without violations have no entry; callers treat a missing key
/// as "no warnings". Within an entry, names keep the order they were
/// recorded in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WarningMap {
    entries: BTreeMap<ArtifactId, Vec<String>>,
}

impl WarningMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that `artifact` violates `rule_name`
    pub fn push(&mut self, artifact: ArtifactId, rule_name: &str) {
        self.entries
            .entry(artifact)
            .or_default()
            .push(rule_name.to_string());
    }

    /// Violated rule names for `artifact`, if any
    pub fn get(&self, artifact: ArtifactId) -> Option<&[String]> {
        self.entries.get(&artifact).map(Vec::as_slice)
    }

    /// Whether `artifact` violates the rule named `rule_name`
    pub fn contains(&self, artifact: ArtifactId, rule_name: &str) -> bool {
        self.get(artifact)
            .map(|names| names.iter().any(|n| n == rule_name))
            .unwrap_or(false)
    }

    /// Entries ordered by artifact id
    pub fn iter(&self) -> impl Iterator<Item = (ArtifactId, &[String])> {
        self.entries.iter().map(|(id, names)| (*id, names.as_slice()))
    }

    /// Number of artifacts with at least one warning
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no artifact has warnings
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of recorded violations
    pub fn violation_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Consume into the underlying map
    pub fn into_inner(self) -> BTreeMap<ArtifactId, Vec<String>> {
        self.entries
    }
}
