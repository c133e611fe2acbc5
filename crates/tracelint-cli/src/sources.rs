//! File-backed snapshot and rule sources.

use crate::error::CliError;
use std::fs;
use std::path::PathBuf;
use tracelint_domain::traits::{RuleRepository, SnapshotProvider};
use tracelint_domain::{RuleDefinition, Snapshot};
use tracelint_verifier::RuleFile;
use tracing::debug;

/// A snapshot stored as a JSON document.
#[derive(Debug, Clone)]
pub struct JsonSnapshotFile {
    path: PathBuf,
}

impl JsonSnapshotFile {
    /// Point at a snapshot file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotProvider for JsonSnapshotFile {
    type Error = CliError;

    fn snapshot(&self) -> Result<Snapshot, CliError> {
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            CliError::InvalidInput(format!("Cannot read snapshot {}: {}", self.path.display(), e))
        })?;
        let snapshot: Snapshot = serde_json::from_str(&contents)?;
        debug!(
            "Loaded snapshot {} ({} artifacts, {} trace links)",
            self.path.display(),
            snapshot.artifacts.len(),
            snapshot.trace_links.len()
        );
        Ok(snapshot)
    }
}

/// Project rules stored as a TOML file, or no project rules at all.
#[derive(Debug, Clone, Default)]
pub struct TomlRuleFile {
    path: Option<PathBuf>,
}

impl TomlRuleFile {
    /// Point at a rules file; `None` yields no project rules.
    pub fn new(path: Option<impl Into<PathBuf>>) -> Self {
        Self {
            path: path.map(Into::into),
        }
    }
}

impl RuleRepository for TomlRuleFile {
    type Error = CliError;

    fn project_rules(&self) -> Result<Vec<RuleDefinition>, CliError> {
        match &self.path {
            Some(path) => {
                let file = RuleFile::from_file(path)?;
                debug!("Loaded {} project rules from {}", file.rules.len(), path.display());
                Ok(file.rules)
            }
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_snapshot_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "artifacts": [
                    {{"id": "00000000-0000-0000-0000-000000000001", "type": "Requirement"}},
                    {{"id": "00000000-0000-0000-0000-000000000002", "type": "Design"}}
                ],
                "traceLinks": [
                    {{"sourceId": "00000000-0000-0000-0000-000000000002",
                      "targetId": "00000000-0000-0000-0000-000000000001"}}
                ]
            }}"#
        )
        .unwrap();

        let snapshot = JsonSnapshotFile::new(file.path()).snapshot().unwrap();
        assert_eq!(snapshot.artifacts.len(), 2);
        assert!(snapshot.trace_links[0].visible);
    }

    #[test]
    fn test_missing_snapshot_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = JsonSnapshotFile::new(dir.path().join("missing.json")).snapshot();
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_rule_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[[rules]]\nname = \"single-design\"\ntext = \"exactly-one(Requirement, CHILD, Design)\""
        )
        .unwrap();

        let rules = TomlRuleFile::new(Some(file.path())).project_rules().unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].name, "single-design");
    }

    #[test]
    fn test_no_rule_file() {
        let rules = TomlRuleFile::new(None::<PathBuf>).project_rules().unwrap();
        assert!(rules.is_empty());
    }
}
