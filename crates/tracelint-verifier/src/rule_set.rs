//! Rule definition sets loaded from TOML
//!
//! Rule files hold an array of `[[rules]]` tables, each with `name`,
//! optional `description` and `text`. The built-in defaults ship in the
//! same format.

use crate::VerifierError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracelint_domain::{Rule, RuleDefinition};
use tracelint_rules::RuleParser;
use tracing::debug;

const BUILTIN_RULES: &str = include_str!("defaults.toml");

/// A TOML document of rule definitions
///
/// Nothing is parsed at this level; project rule files are checked when the
/// verifier evaluates them so one bad rule does not hide the others.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleFile {
    /// Definitions in file order
    #[serde(default)]
    pub rules: Vec<RuleDefinition>,
}

impl RuleFile {
    /// Parse a rules document
    pub fn from_toml(toml_str: &str) -> Result<Self, VerifierError> {
        toml::from_str(toml_str)
            .map_err(|e| VerifierError::Repository(format!("Failed to parse rules TOML: {}", e)))
    }

    /// Load a rules document from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VerifierError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            VerifierError::Repository(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> Result<String, VerifierError> {
        toml::to_string_pretty(self)
            .map_err(|e| VerifierError::Repository(format!("Failed to serialize rules: {}", e)))
    }
}

/// The immutable rule group evaluated for every project
///
/// Unlike project rules, every definition here must parse: a broken default
/// set fails construction.
///
/// # Examples
///
/// ```
/// use tracelint_verifier::DefaultRuleSet;
///
/// let defaults = DefaultRuleSet::builtin().unwrap();
/// assert!(!defaults.is_empty());
/// assert_eq!(defaults.rules().len(), defaults.definitions().len());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultRuleSet {
    definitions: Vec<RuleDefinition>,
    rules: Vec<Rule>,
}

impl DefaultRuleSet {
    /// The rule set embedded in this crate
    pub fn builtin() -> Result<Self, VerifierError> {
        Self::from_toml(BUILTIN_RULES)
    }

    /// A set with no rules
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a rules document as a default set
    pub fn from_toml(toml_str: &str) -> Result<Self, VerifierError> {
        let file: RuleFile = toml::from_str(toml_str)
            .map_err(|e| VerifierError::Defaults(format!("Failed to parse TOML: {}", e)))?;
        Self::from_definitions(file.rules)
    }

    /// Build a set from definitions, parsing each one
    pub fn from_definitions(definitions: Vec<RuleDefinition>) -> Result<Self, VerifierError> {
        let parser = RuleParser::new();
        let rules = definitions
            .iter()
            .map(|d| {
                parser
                    .parse(&d.name, &d.description, &d.text)
                    .map_err(|e| VerifierError::Defaults(format!("Rule '{}': {}", d.name, e)))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Loaded {} default rules", rules.len());
        Ok(Self { definitions, rules })
    }

    /// Definitions as written
    pub fn definitions(&self) -> &[RuleDefinition] {
        &self.definitions
    }

    /// Parsed rules, in definition order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the set has no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_rules_parse() {
        let defaults = DefaultRuleSet::builtin().unwrap();
        assert_eq!(defaults.len(), 3);
        for (definition, rule) in defaults.definitions().iter().zip(defaults.rules()) {
            assert_eq!(definition.name, rule.name());
            assert!(rule.source_type().is_some(), "'{}' must apply somewhere", rule.name());
        }
    }

    #[test]
    fn test_builtin_names_are_unique() {
        let defaults = DefaultRuleSet::builtin().unwrap();
        let mut names: Vec<_> = defaults.definitions().iter().map(|d| &d.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), defaults.len());
    }

    #[test]
    fn test_broken_default_fails_construction() {
        let toml = r#"
            [[rules]]
            name = "broken"
            text = "at-least-one(Requirement, CHILD)"
        "#;
        let err = DefaultRuleSet::from_toml(toml).unwrap_err();
        assert!(matches!(err, VerifierError::Defaults(msg) if msg.contains("broken")));
    }

    #[test]
    fn test_rule_file_description_is_optional() {
        let file = RuleFile::from_toml(
            r#"
            [[rules]]
            name = "single-design"
            text = "exactly-one(Requirement, CHILD, Design)"
        "#,
        )
        .unwrap();
        assert_eq!(file.rules.len(), 1);
        assert_eq!(file.rules[0].description, "");
    }

    #[test]
    fn test_rule_file_toml_roundtrip() {
        let file = RuleFile {
            rules: vec![RuleDefinition::new("r", "d", "at-least-one(A, CHILD, B)")],
        };
        let toml = file.to_toml().unwrap();
        assert_eq!(RuleFile::from_toml(&toml).unwrap(), file);
    }

    #[test]
    fn test_empty_rule_file() {
        assert!(RuleFile::from_toml("").unwrap().rules.is_empty());
    }
}
