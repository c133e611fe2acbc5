//! Configuration for snapshot checks
//!
//! Controls which rule groups are evaluated and how strictly project rules
//! are treated.

use crate::VerifierError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracelint_rules::DEFAULT_MAX_DEPTH;

/// Upper bound accepted for `max_rule_depth`
const MAX_RULE_DEPTH_LIMIT: usize = 256;

/// Configuration for the [`Verifier`](crate::Verifier) service
///
/// # Examples
///
/// ```
/// use tracelint_verifier::VerifierConfig;
///
/// let config = VerifierConfig::from_toml(r#"
///     disabled_rules = ["Requirement without test"]
///     strict_rules = true
/// "#).unwrap();
///
/// assert!(config.include_default_rules);
/// assert_eq!(config.max_rule_depth, 32);
/// assert!(config.strict_rules);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Evaluate the built-in rule set alongside project rules
    /// Default: true
    #[serde(default = "default_include_default_rules")]
    pub include_default_rules: bool,

    /// Deepest rule tree the parser accepts
    /// Default: 32
    #[serde(default = "default_max_rule_depth")]
    pub max_rule_depth: usize,

    /// Rule names skipped in both groups (case sensitive)
    #[serde(default)]
    pub disabled_rules: Vec<String>,

    /// Abort the check on the first malformed project rule instead of
    /// skipping and reporting it
    /// Default: false
    #[serde(default)]
    pub strict_rules: bool,
}

fn default_include_default_rules() -> bool {
    true
}

fn default_max_rule_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            include_default_rules: true,
            max_rule_depth: DEFAULT_MAX_DEPTH,
            disabled_rules: Vec::new(),
            strict_rules: false,
        }
    }
}

impl VerifierConfig {
    /// Parse and validate a TOML document
    pub fn from_toml(toml_str: &str) -> Result<Self, VerifierError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| VerifierError::Config(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to a TOML document
    pub fn to_toml(&self) -> Result<String, VerifierError> {
        toml::to_string_pretty(self)
            .map_err(|e| VerifierError::Config(format!("Failed to serialize TOML: {}", e)))
    }

    /// Load from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VerifierError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            VerifierError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), VerifierError> {
        if self.max_rule_depth == 0 || self.max_rule_depth > MAX_RULE_DEPTH_LIMIT {
            return Err(VerifierError::Config(format!(
                "max_rule_depth must be between 1 and {}, got {}",
                MAX_RULE_DEPTH_LIMIT, self.max_rule_depth
            )));
        }

        if let Some(blank) = self.disabled_rules.iter().find(|n| n.trim().is_empty()) {
            return Err(VerifierError::Config(format!(
                "disabled_rules contains a blank name: {:?}",
                blank
            )));
        }

        Ok(())
    }

    /// Whether the rule named `name` is switched off
    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled_rules.iter().any(|n| n == name)
    }
}
