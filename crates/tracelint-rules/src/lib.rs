//! Tracelint Rules
//!
//! Turns rule text into validated rule trees.
//!
//! # Overview
//!
//! Rules are written in a small language of cardinality constraints joined by
//! boolean combinators:
//!
//! ```text
//! leaf      := KIND "(" [THRESHOLD ","] SOURCE_TYPE "," RELATION "," TARGET_TYPE ")"
//! composite := rule (COMBINATOR rule)+
//! rule      := leaf | composite | "(" rule ")"
//! KIND      := at-least-one | at-least-n | exactly-one | exactly-n | less-than-n
//! RELATION  := CHILD | SIBLING
//! COMBINATOR:= && | ||
//! ```
//!
//! Only the "-n" kinds take a threshold. A nesting level uses one combinator;
//! mixing `&&` and `||` needs parentheses.
//!
//! # Architecture
//!
//! ```text
//! Rule text → Lexer → Parser → Rule → (RuleCache) → Verifier
//!                                  ↘ RuleAuthoring → AcceptedRule
//! ```
//!
//! # Example Usage
//!
//! ```
//! use tracelint_rules::{parse, ParseError};
//!
//! let rule = parse(
//!     "design-coverage",
//!     "Every requirement needs a design",
//!     "at-least-one(Requirement, CHILD, Design)",
//! )
//! .unwrap();
//! assert_eq!(rule.text(), "at-least-one(Requirement, CHILD, Design)");
//!
//! let err = parse("bad", "", "most-n(2, Requirement, CHILD, Design)").unwrap_err();
//! assert!(matches!(err, ParseError::UnknownKind { .. }));
//! ```

#![warn(missing_docs)]

mod authoring;
mod cache;
mod error;
mod lexer;
mod parser;

pub use authoring::{AcceptedRule, RuleAuthoring};
pub use cache::RuleCache;
pub use error::ParseError;
pub use parser::{is_valid, parse, parse_condition, RuleParser, DEFAULT_MAX_DEPTH, MAX_NESTING};
