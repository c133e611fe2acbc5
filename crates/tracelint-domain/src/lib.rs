//! Tracelint Domain Layer
//!
//! This crate contains the core data model for Tracelint: the artifacts and
//! trace links handed over by the persistence layer, the relationship graph
//! derived from them, and the rule tree that structural warnings are
//! computed from.
//!
//! ## Key Concepts
//!
//! - **Artifact**: a typed unit of project content (requirement, design, ...)
//! - **Trace link**: a directed edge from a child artifact to the parent it traces to
//! - **Relationship graph**: an arena of artifact nodes rebuilt for every snapshot
//! - **Rule**: a named cardinality constraint or boolean composition of constraints
//!
//! ## Architecture
//!
//! This crate holds no I/O. Parsing rule text lives in `tracelint-rules` and
//! evaluation in `tracelint-verifier`; collaborators that supply snapshots and
//! rule definitions implement the traits in [`traits`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifact;
pub mod error;
pub mod graph;
pub mod rule;
pub mod traits;

// Re-exports for convenience
pub use artifact::{types_match, Artifact, ArtifactId, Snapshot, TraceLink};
pub use error::{DanglingReferenceError, DomainError, MissingEndpoint};
pub use graph::{ArtifactNode, GraphBuild, RelationshipGraph};
pub use rule::{
    Combinator, CompositeRule, Condition, Kind, LeafCondition, Relation, Rule, RuleDefinition,
    RuleId,
};
