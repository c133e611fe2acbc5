//! Metrics collection for Verifier operations

use serde::Serialize;

/// Counters collected while checking snapshots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifierMetrics {
    /// Snapshot checks completed
    pub check_count: usize,

    /// Rules evaluated against a graph
    pub rules_evaluated: usize,

    /// Rules whose leaves disagree on the source type (never applied)
    pub rules_unscoped: usize,

    /// Project rules rejected by the parser
    pub rules_rejected: usize,

    /// Rules skipped because the configuration disables them
    pub rules_disabled: usize,

    /// (rule, node) pairs evaluated
    pub nodes_checked: usize,

    /// Leaf conditions evaluated, after short-circuiting
    pub leaf_evaluations: usize,

    /// Violations recorded in warning maps
    pub violations: usize,

    /// Trace links dropped for referencing unknown artifacts
    pub links_skipped: usize,

    /// Total time spent checking, in milliseconds
    pub total_runtime_ms: u64,
}

impl VerifierMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Add another set of counters to this one
    pub fn merge(&mut self, other: &VerifierMetrics) {
        self.check_count += other.check_count;
        self.rules_evaluated += other.rules_evaluated;
        self.rules_unscoped += other.rules_unscoped;
        self.rules_rejected += other.rules_rejected;
        self.rules_disabled += other.rules_disabled;
        self.nodes_checked += other.nodes_checked;
        self.leaf_evaluations += other.leaf_evaluations;
        self.violations += other.violations;
        self.links_skipped += other.links_skipped;
        self.total_runtime_ms += other.total_runtime_ms;
    }

    /// Reset all counters
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Verifier Metrics Summary".to_string(),
            "========================".to_string(),
            format!("Checks: {}", self.check_count),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            String::new(),
            format!("Rules evaluated: {}", self.rules_evaluated),
            format!("Nodes checked: {}", self.nodes_checked),
            format!("Leaf evaluations: {}", self.leaf_evaluations),
            format!("Violations: {}", self.violations),
        ];

        if self.rules_unscoped + self.rules_rejected + self.rules_disabled > 0 {
            lines.push(String::new());
            lines.push(format!("Rules with mixed source types: {}", self.rules_unscoped));
            lines.push(format!("Rules rejected: {}", self.rules_rejected));
            lines.push(format!("Rules disabled: {}", self.rules_disabled));
        }

        if self.links_skipped > 0 {
            lines.push(String::new());
            lines.push(format!("Trace links skipped: {}", self.links_skipped));
        }

        lines.join("\n")
    }
}
