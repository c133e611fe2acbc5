//! Tracelint Verifier
//!
//! Evaluates structural rules against the relationship graph of a project
//! snapshot and reports which artifacts violate which rules.
//!
//! # Overview
//!
//! - **Tree verifier**: applies parsed rule trees to every matching node
//! - **Warning map**: artifact id to violated rule names, clean artifacts omitted
//! - **Default rule set**: built-in rules shipped with the crate, injected into the service
//! - **Verifier**: the checking service combining graph build, rule parsing, config and evaluation
//! - **Metrics**: counters for every check
//!
//! # Usage
//!
//! ```
//! use tracelint_domain::{Artifact, ArtifactId, RuleDefinition, Snapshot, TraceLink};
//! use tracelint_verifier::{Verifier, VerifierConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let req = ArtifactId::new();
//! let design = ArtifactId::new();
//! let snapshot = Snapshot::new(
//!     vec![Artifact::new(req, "Requirement"), Artifact::new(design, "Design")],
//!     vec![TraceLink::new(design, req)],
//! );
//!
//! let mut verifier = Verifier::with_builtin_defaults(VerifierConfig::default())?;
//! let report = verifier.check(&snapshot, &[])?;
//!
//! // No test traces to the requirement, no code to the design
//! assert!(report.warnings.contains(req, "Requirement without test"));
//! assert!(report.warnings.contains(design, "Design without implementation"));
//! println!("{}", report.metrics.summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! include_default_rules = true
//! max_rule_depth = 32
//! disabled_rules = ["Design without implementation"]
//! strict_rules = false
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod metrics;
mod rule_set;
mod tree_verifier;
mod verifier;
mod warnings;

pub use config::VerifierConfig;
pub use error::VerifierError;
pub use metrics::VerifierMetrics;
pub use rule_set::{DefaultRuleSet, RuleFile};
pub use tree_verifier::TreeVerifier;
pub use verifier::{RejectedRule, VerificationReport, Verifier};
pub use warnings::WarningMap;
