//! Error types for rule parsing

use thiserror::Error;

/// Why a piece of rule text was rejected
///
/// Offsets are byte offsets into the rule text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Rule text is empty or whitespace
    #[error("Rule text is empty")]
    EmptyRule,

    /// Rule name is empty or whitespace
    #[error("Rule name is empty")]
    EmptyName,

    /// Word in call position is not one of the five kinds
    #[error(
        "Unknown rule kind '{token}' at offset {offset}; expected one of \
         at-least-one, at-least-n, exactly-one, exactly-n, less-than-n"
    )]
    UnknownKind {
        /// The unrecognised word
        token: String,
        /// Where it starts
        offset: usize,
    },

    /// A leaf is missing one of its arguments
    #[error("'{kind}' at offset {offset} is missing its {field}")]
    MissingField {
        /// Kind keyword of the leaf
        kind: String,
        /// Name of the missing argument
        field: &'static str,
        /// Where the leaf starts
        offset: usize,
    },

    /// Threshold is not a non-negative integer
    #[error("Invalid threshold '{value}' at offset {offset}: expected a non-negative integer")]
    InvalidThreshold {
        /// The rejected threshold text
        value: String,
        /// Where it starts
        offset: usize,
    },

    /// A leaf has more arguments than its kind takes
    #[error("'{kind}' does not take argument '{value}' at offset {offset}")]
    UnexpectedField {
        /// Kind keyword of the leaf
        kind: String,
        /// The surplus argument
        value: String,
        /// Where it starts
        offset: usize,
    },

    /// Relation is neither CHILD nor SIBLING
    #[error("Unknown relation '{token}' at offset {offset}; expected CHILD or SIBLING")]
    UnknownRelation {
        /// The rejected relation
        token: String,
        /// Where it starts
        offset: usize,
    },

    /// Combinator without a rule on one side, or unmatched parenthesis
    #[error("Unbalanced combinator at offset {offset}: {detail}")]
    UnbalancedCombinator {
        /// Where the imbalance was detected
        offset: usize,
        /// What is missing
        detail: String,
    },

    /// `&&` and `||` used at the same nesting level
    #[error("Mixed '&&' and '||' at offset {offset}; group sub-rules with parentheses")]
    MixedCombinators {
        /// Offset of the first conflicting combinator
        offset: usize,
    },

    /// Token that cannot appear where it was found
    #[error("Expected {expected} at offset {offset}, found '{found}'")]
    UnexpectedToken {
        /// What the parser was looking for
        expected: &'static str,
        /// What it found
        found: String,
        /// Where it was found
        offset: usize,
    },

    /// Text ended in the middle of a rule
    #[error("Unexpected end of rule text; expected {expected}")]
    UnexpectedEnd {
        /// What the parser was looking for
        expected: &'static str,
    },

    /// Rule nests deeper than the parser allows
    #[error("Rule nests {depth} levels deep (max {max})")]
    TooDeep {
        /// Depth reached
        depth: usize,
        /// Configured maximum
        max: usize,
    },

    /// Parentheses nest too deeply to read, even if they add no depth
    #[error("Parentheses nest more than {max} levels at offset {offset}")]
    NestingTooDeep {
        /// Byte offset of the first '(' past the limit
        offset: usize,
        /// Nesting limit
        max: usize,
    },
}

impl ParseError {
    /// Stable machine-readable code for this error
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::EmptyRule => "empty_rule",
            ParseError::EmptyName => "empty_name",
            ParseError::UnknownKind { .. } => "unknown_kind",
            ParseError::MissingField { .. } => "missing_field",
            ParseError::InvalidThreshold { .. } => "invalid_threshold",
            ParseError::UnexpectedField { .. } => "unexpected_field",
            ParseError::UnknownRelation { .. } => "unknown_relation",
            ParseError::UnbalancedCombinator { .. } => "unbalanced_combinator",
            ParseError::MixedCombinators { .. } => "mixed_combinators",
            ParseError::UnexpectedToken { .. } => "unexpected_token",
            ParseError::UnexpectedEnd { .. } => "unexpected_end",
            ParseError::TooDeep { .. } => "too_deep",
            ParseError::NestingTooDeep { .. } => "nesting_too_deep",
        }
    }

    /// Byte offset of the offending token, where there is one
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::UnknownKind { offset, .. }
            | ParseError::MissingField { offset, .. }
            | ParseError::InvalidThreshold { offset, .. }
            | ParseError::UnexpectedField { offset, .. }
            | ParseError::UnknownRelation { offset, .. }
            | ParseError::UnbalancedCombinator { offset, .. }
            | ParseError::MixedCombinators { offset }
            | ParseError::UnexpectedToken { offset, .. }
            | ParseError::NestingTooDeep { offset, .. } => Some(*offset),
            ParseError::EmptyRule
            | ParseError::EmptyName
            | ParseError::UnexpectedEnd { .. }
            | ParseError::TooDeep { .. } => None,
        }
    }
}
