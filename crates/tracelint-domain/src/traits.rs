//! Trait definitions for external collaborators
//!
//! Persistence of artifacts, trace links and rules lives outside Tracelint.
//! These traits are the boundary the verifier reads snapshots through.

use crate::{RuleDefinition, Snapshot};

/// Supplies the artifacts and trace links of one project version
pub trait SnapshotProvider {
    /// Error type for snapshot retrieval
    type Error;

    /// Fetch the current snapshot
    fn snapshot(&self) -> Result<Snapshot, Self::Error>;
}

/// Supplies the project-specific rule definitions
///
/// Built-in default rules are not part of this trait; they are injected
/// separately so project storage never has to know about them.
pub trait RuleRepository {
    /// Error type for rule retrieval
    type Error;

    /// Fetch all project rules, in authored order
    fn project_rules(&self) -> Result<Vec<RuleDefinition>, Self::Error>;
}

impl SnapshotProvider for Snapshot {
    type Error = std::convert::Infallible;

    fn snapshot(&self) -> Result<Snapshot, Self::Error> {
        Ok(self.clone())
    }
}

impl RuleRepository for Vec<RuleDefinition> {
    type Error = std::convert::Infallible;

    fn project_rules(&self) -> Result<Vec<RuleDefinition>, Self::Error> {
        Ok(self.clone())
    }
}
