//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Verifier error
    #[error("{0}")]
    Verifier(#[from] tracelint_verifier::VerifierError),

    /// Rule text rejected by the parser
    #[error("Invalid rule: {0}")]
    Rule(#[from] tracelint_rules::ParseError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The check found warnings and `--deny-warnings` was given
    #[error("{0} artifact(s) with warnings")]
    WarningsFound(usize),

    /// `validate` rejected the rule
    #[error("Rule rejected: {error}")]
    RuleRejected {
        /// Why the parser rejected it
        error: tracelint_rules::ParseError,
        /// The error as shown to the user, with a marker under the offending position
        rendered: String,
    },
}
