//! Evaluation of rule trees against a relationship graph
//!
//! A rule is applied to every node whose type matches the source type of
//! all of its leaves. Leaves count children or siblings of the target type;
//! composites combine sub-results with AND/OR. A node gets the rule's name
//! when the root fails.

use crate::{VerifierMetrics, WarningMap};
use tracelint_domain::{
    ArtifactNode, Combinator, Condition, LeafCondition, Relation, RelationshipGraph, Rule,
};
use tracing::debug;

/// Stateless evaluator of rule trees
///
/// The graph is rebuilt by the caller for every snapshot and never cached
/// here, so one value can be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeVerifier;

impl TreeVerifier {
    /// Evaluate `rules` against every node of `graph`
    ///
    /// Names are appended rule by rule, and for each rule node by node in
    /// artifact input order. Total over its inputs: there is no error case.
    ///
    /// # Examples
    ///
    /// ```
    /// use tracelint_domain::{Artifact, ArtifactId, RelationshipGraph};
    /// use tracelint_rules::parse;
    /// use tracelint_verifier::TreeVerifier;
    ///
    /// let req = ArtifactId::new();
    /// let artifacts = vec![Artifact::new(req, "Requirement")];
    /// let graph = RelationshipGraph::build(&artifacts, &[]).graph;
    ///
    /// let rule = parse("needs-design", "", "at-least-one(Requirement, CHILD, Design)").unwrap();
    /// let warnings = TreeVerifier::evaluate(&[rule], &graph);
    /// assert!(warnings.contains(req, "needs-design"));
    /// ```
    pub fn evaluate(rules: &[Rule], graph: &RelationshipGraph) -> WarningMap {
        let mut metrics = VerifierMetrics::new();
        Self::evaluate_with_metrics(rules, graph, &mut metrics)
    }

    /// Same as [`TreeVerifier::evaluate`], also counting the work done into `metrics`
    pub fn evaluate_with_metrics(
        rules: &[Rule],
        graph: &RelationshipGraph,
        metrics: &mut VerifierMetrics,
    ) -> WarningMap {
        let mut warnings = WarningMap::new();

        for rule in rules {
            let Some(source_type) = rule.source_type() else {
                debug!(
                    "Rule '{}' mixes source types across its leaves; it applies to no artifact",
                    rule.name()
                );
                metrics.rules_unscoped += 1;
                continue;
            };
            metrics.rules_evaluated += 1;

            for node in graph.nodes_of_type(source_type) {
                metrics.nodes_checked += 1;
                if !passes(rule.root(), &node, metrics) {
                    warnings.push(node.id(), rule.name());
                    metrics.violations += 1;
                }
            }
        }

        warnings
    }
}

fn passes(condition: &Condition, node: &ArtifactNode<'_>, metrics: &mut VerifierMetrics) -> bool {
    match condition {
        Condition::Leaf(leaf) => leaf_passes(leaf, node, metrics),
        Condition::Composite(composite) => match composite.combinator() {
            Combinator::And => composite
                .sub_rules()
                .iter()
                .all(|sub| passes(sub, node, metrics)),
            Combinator::Or => composite
                .sub_rules()
                .iter()
                .any(|sub| passes(sub, node, metrics)),
        },
    }
}

fn leaf_passes(leaf: &LeafCondition, node: &ArtifactNode<'_>, metrics: &mut VerifierMetrics) -> bool {
    metrics.leaf_evaluations += 1;
    let count = match leaf.relation() {
        Relation::Child => node.children_of_type(leaf.target_type()).len(),
        Relation::Sibling => node.siblings_of_type(leaf.target_type()).len(),
    };
    leaf.kind().is_satisfied_by(count)
}
