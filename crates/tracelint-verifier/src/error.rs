//! Error types for Verifier operations

use thiserror::Error;
use tracelint_rules::ParseError;

/// Errors that can occur while checking a snapshot
///
/// Evaluating parsed rules against a built graph cannot fail; these errors
/// come from configuration, rule loading and collaborators.
#[derive(Error, Debug)]
pub enum VerifierError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A project rule failed to parse while `strict_rules` is on
    #[error("Invalid rule '{name}': {source}")]
    Rule {
        /// Name of the rejected rule
        name: String,
        /// Why it was rejected
        source: ParseError,
    },

    /// The built-in rule set could not be loaded
    #[error("Default rule set error: {0}")]
    Defaults(String),

    /// The snapshot provider failed
    #[error("Snapshot source error: {0}")]
    Source(String),

    /// The rule repository failed
    #[error("Rule repository error: {0}")]
    Repository(String),
}
