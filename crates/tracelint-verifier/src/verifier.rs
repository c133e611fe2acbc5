//! Snapshot checking service
//!
//! Ties the pieces together for one project version: build the graph, parse
//! project rules through the cache, drop disabled rules, evaluate.

use crate::{DefaultRuleSet, TreeVerifier, VerifierConfig, VerifierError, VerifierMetrics, WarningMap};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt::Display;
use std::time::Instant;
use tracelint_domain::traits::{RuleRepository, SnapshotProvider};
use tracelint_domain::{DanglingReferenceError, RelationshipGraph, Rule, RuleDefinition, Snapshot};
use tracelint_rules::{ParseError, RuleCache, RuleParser};
use tracing::{debug, info, warn};

/// A project rule that failed to parse and was left out of the check
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRule {
    /// Name of the rule as authored
    pub name: String,

    /// Why it was rejected
    #[serde(serialize_with = "serialize_parse_error")]
    pub error: ParseError,
}

fn serialize_parse_error<S: Serializer>(error: &ParseError, serializer: S) -> Result<S::Ok, S::Error> {
    let mut state = serializer.serialize_struct("ParseError", 3)?;
    state.serialize_field("code", error.code())?;
    state.serialize_field("message", &error.to_string())?;
    state.serialize_field("offset", &error.offset())?;
    state.end()
}

/// Outcome of checking one snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    /// Violated rule names per artifact
    pub warnings: WarningMap,

    /// Trace links left out of the graph
    pub skipped_links: Vec<DanglingReferenceError>,

    /// Project rules that did not parse
    pub rejected_rules: Vec<RejectedRule>,

    /// Counters for this check only
    pub metrics: VerifierMetrics,
}

impl VerificationReport {
    /// Whether the snapshot produced no warnings
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Checks snapshots against the default and project rule groups
///
/// Holds a parse cache across calls; the graph is rebuilt for every check.
///
/// # Examples
///
/// ```
/// use tracelint_domain::{Artifact, ArtifactId, RuleDefinition, Snapshot, TraceLink};
/// use tracelint_verifier::{DefaultRuleSet, Verifier, VerifierConfig};
///
/// let req = ArtifactId::new();
/// let design = ArtifactId::new();
/// let snapshot = Snapshot::new(
///     vec![Artifact::new(req, "Requirement"), Artifact::new(design, "Design")],
///     vec![TraceLink::new(design, req)],
/// );
/// let project_rules = vec![RuleDefinition::new(
///     "single-design",
///     "",
///     "exactly-one(Requirement, CHILD, Design)",
/// )];
///
/// let mut verifier = Verifier::new(VerifierConfig::default(), DefaultRuleSet::empty()).unwrap();
/// let report = verifier.check(&snapshot, &project_rules).unwrap();
/// assert!(report.is_clean());
/// ```
#[derive(Debug, Clone)]
pub struct Verifier {
    config: VerifierConfig,
    defaults: DefaultRuleSet,
    cache: RuleCache,
    metrics: VerifierMetrics,
}

impl Verifier {
    /// Create a verifier evaluating `defaults` next to project rules
    ///
    /// Fails if `config` does not validate.
    pub fn new(config: VerifierConfig, defaults: DefaultRuleSet) -> Result<Self, VerifierError> {
        config.validate()?;
        let parser = RuleParser::with_max_depth(config.max_rule_depth);
        Ok(Self {
            config,
            defaults,
            cache: RuleCache::with_parser(parser),
            metrics: VerifierMetrics::new(),
        })
    }

    /// Create a verifier with the built-in default rules
    pub fn with_builtin_defaults(config: VerifierConfig) -> Result<Self, VerifierError> {
        Self::new(config, DefaultRuleSet::builtin()?)
    }

    /// Current configuration
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// The default rule group
    pub fn defaults(&self) -> &DefaultRuleSet {
        &self.defaults
    }

    /// Counters accumulated over all checks
    pub fn metrics(&self) -> &VerifierMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Check a snapshot against the default rules and `project_rules`
    ///
    /// Malformed project rules are skipped and listed in the report, unless
    /// `strict_rules` is set, in which case the first one aborts the check.
    pub fn check(
        &mut self,
        snapshot: &Snapshot,
        project_rules: &[RuleDefinition],
    ) -> Result<VerificationReport, VerifierError> {
        let start = Instant::now();
        let mut run = VerifierMetrics::new();

        let mut rejected_rules = Vec::new();
        let rules = self.collect_rules(project_rules, &mut rejected_rules, &mut run)?;

        let build = RelationshipGraph::from_snapshot(snapshot);
        run.links_skipped = build.skipped.len();

        let warnings = TreeVerifier::evaluate_with_metrics(&rules, &build.graph, &mut run);

        run.check_count = 1;
        run.total_runtime_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.metrics.merge(&run);

        info!(
            "Checked {} artifacts against {} rules: {} artifacts with warnings, {} links skipped, {} rules rejected",
            build.graph.len(),
            rules.len(),
            warnings.len(),
            build.skipped.len(),
            rejected_rules.len()
        );

        Ok(VerificationReport {
            warnings,
            skipped_links: build.skipped,
            rejected_rules,
            metrics: run,
        })
    }

    /// Fetch a snapshot and project rules from collaborators, then check
    pub fn check_from<P, R>(
        &mut self,
        provider: &P,
        repository: &R,
    ) -> Result<VerificationReport, VerifierError>
    where
        P: SnapshotProvider,
        P::Error: Display,
        R: RuleRepository,
        R::Error: Display,
    {
        let snapshot = provider
            .snapshot()
            .map_err(|e| VerifierError::Source(e.to_string()))?;
        let project_rules = repository
            .project_rules()
            .map_err(|e| VerifierError::Repository(e.to_string()))?;

        self.check(&snapshot, &project_rules)
    }

    /// Default rules followed by parsed project rules, minus disabled ones
    fn collect_rules(
        &mut self,
        project_rules: &[RuleDefinition],
        rejected: &mut Vec<RejectedRule>,
        run: &mut VerifierMetrics,
    ) -> Result<Vec<Rule>, VerifierError> {
        let mut rules = Vec::new();

        if self.config.include_default_rules {
            for rule in self.defaults.rules() {
                if self.config.is_disabled(rule.name()) {
                    debug!("Default rule '{}' is disabled", rule.name());
                    run.rules_disabled += 1;
                    continue;
                }
                rules.push(rule.clone());
            }
        }

        for definition in project_rules {
            if self.config.is_disabled(&definition.name) {
                debug!("Project rule '{}' is disabled", definition.name);
                run.rules_disabled += 1;
                continue;
            }

            match self.cache.get_or_parse(definition) {
                Ok(rule) => rules.push(rule.clone()),
                Err(error) if self.config.strict_rules => {
                    return Err(VerifierError::Rule {
                        name: definition.name.clone(),
                        source: error,
                    });
                }
                Err(error) => {
                    warn!("Skipping rule '{}': {}", definition.name, error);
                    run.rules_rejected += 1;
                    rejected.push(RejectedRule {
                        name: definition.name.clone(),
                        error,
                    });
                }
            }
        }

        Ok(rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracelint_domain::{Artifact, ArtifactId, TraceLink};

    fn id(n: u128) -> ArtifactId {
        ArtifactId::from_value(n)
    }

    fn snapshot() -> Snapshot {
        Snapshot::new(
            vec![
                Artifact::new(id(1), "Requirement"),
                Artifact::new(id(2), "Design"),
            ],
            vec![TraceLink::new(id(2), id(1)), TraceLink::new(id(3), id(1))],
        )
    }

    fn project_rules() -> Vec<RuleDefinition> {
        vec![
            RuleDefinition::new("needs-test", "", "at-least-one(Requirement, CHILD, Test)"),
            RuleDefinition::new("broken", "", "at-least-n(Requirement, CHILD, Test)"),
        ]
    }

    #[test]
    fn test_rejected_rule_does_not_stop_others() {
        let mut verifier = Verifier::new(VerifierConfig::default(), DefaultRuleSet::empty()).unwrap();
        let report = verifier.check(&snapshot(), &project_rules()).unwrap();

        assert!(report.warnings.contains(id(1), "needs-test"));
        assert_eq!(report.rejected_rules.len(), 1);
        assert_eq!(report.rejected_rules[0].name, "broken");
        assert_eq!(report.metrics.rules_rejected, 1);
    }

    #[test]
    fn test_strict_rules_abort() {
        let config = VerifierConfig {
            strict_rules: true,
            ..Default::default()
        };
        let mut verifier = Verifier::new(config, DefaultRuleSet::empty()).unwrap();
        let err = verifier.check(&snapshot(), &project_rules()).unwrap_err();

        assert!(matches!(err, VerifierError::Rule { ref name, .. } if name == "broken"));
    }

    #[test]
    fn test_both_constructors_validate_config() {
        let config = VerifierConfig {
            max_rule_depth: 0,
            ..Default::default()
        };
        assert!(matches!(
            Verifier::new(config.clone(), DefaultRuleSet::empty()),
            Err(VerifierError::Config(_))
        ));
        assert!(matches!(
            Verifier::with_builtin_defaults(config),
            Err(VerifierError::Config(_))
        ));

        let blank = VerifierConfig {
            disabled_rules: vec![" ".to_string()],
            ..Default::default()
        };
        assert!(Verifier::new(blank, DefaultRuleSet::empty()).is_err());
    }

    #[test]
    fn test_dangling_links_reported() {
        let mut verifier = Verifier::new(VerifierConfig::default(), DefaultRuleSet::empty()).unwrap();
        let report = verifier.check(&snapshot(), &[]).unwrap();

        assert_eq!(report.skipped_links.len(), 1);
        assert_eq!(report.skipped_links[0].source_id, id(3));
        assert_eq!(report.metrics.links_skipped, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn test_disabled_rules_skip_both_groups() {
        let config = VerifierConfig {
            disabled_rules: vec![
                "Requirement without test".to_string(),
                "needs-test".to_string(),
            ],
            ..Default::default()
        };
        let mut verifier = Verifier::with_builtin_defaults(config).unwrap();
        let report = verifier.check(&snapshot(), &project_rules()).unwrap();

        assert!(!report.warnings.contains(id(1), "needs-test"));
        assert!(!report.warnings.contains(id(1), "Requirement without test"));
        assert_eq!(report.metrics.rules_disabled, 2);
    }

    #[test]
    fn test_defaults_can_be_excluded() {
        let config = VerifierConfig {
            include_default_rules: false,
            ..Default::default()
        };
        let mut verifier = Verifier::with_builtin_defaults(config).unwrap();
        let report = verifier.check(&snapshot(), &[]).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.metrics.rules_evaluated, 0);
    }

    #[test]
    fn test_metrics_accumulate_across_checks() {
        let mut verifier = Verifier::new(VerifierConfig::default(), DefaultRuleSet::empty()).unwrap();
        verifier.check(&snapshot(), &project_rules()).unwrap();
        verifier.check(&snapshot(), &project_rules()).unwrap();

        assert_eq!(verifier.metrics().check_count, 2);
        assert_eq!(verifier.metrics().rules_rejected, 2);

        verifier.reset_metrics();
        assert_eq!(verifier.metrics().check_count, 0);
    }

    #[test]
    fn test_check_from_collaborators() {
        let mut verifier = Verifier::new(VerifierConfig::default(), DefaultRuleSet::empty()).unwrap();
        let report = verifier.check_from(&snapshot(), &project_rules()).unwrap();
        assert!(report.warnings.contains(id(1), "needs-test"));
    }

    #[test]
    fn test_report_serializes_rejections_with_code() {
        let mut verifier = Verifier::new(VerifierConfig::default(), DefaultRuleSet::empty()).unwrap();
        let report = verifier.check(&snapshot(), &project_rules()).unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["rejectedRules"][0]["name"], "broken");
        assert_eq!(json["rejectedRules"][0]["error"]["code"], "missing_field");
        assert_eq!(json["skippedLinks"][0]["missing"], "source");
    }
}
