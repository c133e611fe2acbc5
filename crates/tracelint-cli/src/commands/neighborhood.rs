//! Neighborhood command implementation.

use crate::cli::NeighborhoodArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::sources::JsonSnapshotFile;
use std::collections::HashSet;
use tracelint_domain::traits::SnapshotProvider;
use tracelint_domain::{ArtifactId, RelationshipGraph};

/// Execute the neighborhood command.
pub fn execute_neighborhood(args: NeighborhoodArgs, formatter: &Formatter) -> Result<()> {
    println!("{}", render_neighborhood(&args, formatter)?);
    Ok(())
}

/// Render the artifacts of the requested types around the starting artifact.
pub fn render_neighborhood(args: &NeighborhoodArgs, formatter: &Formatter) -> Result<String> {
    let start: ArtifactId = args
        .artifact
        .parse()
        .map_err(|e| CliError::InvalidInput(format!("{}", e)))?;

    let types: HashSet<String> = args
        .types
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if types.is_empty() {
        return Err(CliError::InvalidInput("--types needs at least one type".to_string()));
    }

    let snapshot = JsonSnapshotFile::new(&args.snapshot).snapshot()?;
    let build = RelationshipGraph::from_snapshot(&snapshot);
    let node = build
        .graph
        .node(start)
        .ok_or_else(|| CliError::InvalidInput(format!("Artifact {} is not in the snapshot", start)))?;

    let ids = node.neighborhood_of_type(&types);
    formatter.format_artifacts(&ids, &snapshot)
}
