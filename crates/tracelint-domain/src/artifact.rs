//! Artifact module - the inputs handed over by the persistence layer

use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for an artifact, backed by a 128-bit UUID
///
/// Artifacts created by Tracelint itself get a UUIDv7, but any UUID coming
/// from the persistence layer is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ArtifactId(u128);

impl ArtifactId {
    /// Generate a new UUIDv7-based ArtifactId
    ///
    /// # Examples
    ///
    /// ```
    /// use tracelint_domain::ArtifactId;
    ///
    /// let id = ArtifactId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create an ArtifactId from a raw u128 value
    pub const fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse an ArtifactId from its hyphenated UUID form
    ///
    /// # Examples
    ///
    /// ```
    /// use tracelint_domain::ArtifactId;
    ///
    /// let id = ArtifactId::new();
    /// let parsed = ArtifactId::from_string(&id.to_string()).unwrap();
    /// assert_eq!(id, parsed);
    /// ```
    pub fn from_string(s: &str) -> Result<Self, DomainError> {
        uuid::Uuid::parse_str(s.trim())
            .map(|u| Self(u.as_u128()))
            .map_err(|e| DomainError::InvalidId {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for ArtifactId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ArtifactId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

impl FromStr for ArtifactId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_string(s)
    }
}

impl TryFrom<String> for ArtifactId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_string(&value)
    }
}

impl From<ArtifactId> for String {
    fn from(id: ArtifactId) -> Self {
        id.to_string()
    }
}

/// Case-insensitive comparison of artifact type names
///
/// Every type comparison in Tracelint goes through here.
pub fn types_match(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// A typed unit of project content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Unique identifier
    pub id: ArtifactId,

    /// Type name, e.g. "Requirement" or "Design"
    #[serde(rename = "type")]
    pub artifact_type: String,

    /// Human-readable name, used only for display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Artifact {
    /// Create an unnamed artifact
    pub fn new(id: ArtifactId, artifact_type: impl Into<String>) -> Self {
        Self {
            id,
            artifact_type: artifact_type.into(),
            name: None,
        }
    }

    /// Attach a display name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A directed trace link: `source_id` (child) traces to `target_id` (parent)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceLink {
    /// The child artifact
    pub source_id: ArtifactId,

    /// The parent artifact
    pub target_id: ArtifactId,

    /// Declined or hidden links are invisible and never become edges
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl TraceLink {
    /// Create a visible trace link
    pub fn new(source_id: ArtifactId, target_id: ArtifactId) -> Self {
        Self {
            source_id,
            target_id,
            visible: true,
        }
    }

    /// Create an invisible (declined) trace link
    pub fn invisible(source_id: ArtifactId, target_id: ArtifactId) -> Self {
        Self {
            source_id,
            target_id,
            visible: false,
        }
    }
}

/// Artifacts and trace links of one project version, as handed over by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// All artifacts, in caller order
    #[serde(default)]
    pub artifacts: Vec<Artifact>,

    /// All trace links, visible or not
    #[serde(default)]
    pub trace_links: Vec<TraceLink>,
}

impl Snapshot {
    /// Create a snapshot from its parts
    pub fn new(artifacts: Vec<Artifact>, trace_links: Vec<TraceLink>) -> Self {
        Self {
            artifacts,
            trace_links,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_id_display_and_parse() {
        let id = ArtifactId::new();
        let id_str = id.to_string();

        assert_eq!(id_str.len(), 36);
        assert_eq!(ArtifactId::from_string(&id_str).unwrap(), id);
        assert_eq!(id_str.parse::<ArtifactId>().unwrap(), id);
    }

    #[test]
    fn test_artifact_id_invalid_string() {
        assert!(ArtifactId::from_string("not-a-uuid").is_err());
        assert!(ArtifactId::from_string("").is_err());
    }

    #[test]
    fn test_types_match_ignores_case() {
        assert!(types_match("Requirement", "requirement"));
        assert!(types_match("DESIGN", "Design"));
        assert!(!types_match("Design", "Test"));
    }

    #[test]
    fn test_snapshot_json_shape() {
        let json = r#"{
            "artifacts": [
                {"id": "00000000-0000-0000-0000-000000000001", "type": "Requirement"},
                {"id": "00000000-0000-0000-0000-000000000002", "type": "Design", "name": "D0"}
            ],
            "traceLinks": [
                {"sourceId": "00000000-0000-0000-0000-000000000002",
                 "targetId": "00000000-0000-0000-0000-000000000001"},
                {"sourceId": "00000000-0000-0000-0000-000000000002",
                 "targetId": "00000000-0000-0000-0000-000000000001",
                 "visible": false}
            ]
        }"#;

        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.artifacts.len(), 2);
        assert_eq!(snapshot.artifacts[1].name.as_deref(), Some("D0"));
        assert!(snapshot.trace_links[0].visible);
        assert!(!snapshot.trace_links[1].visible);
        assert_eq!(snapshot.trace_links[0].target_id, ArtifactId::from_value(1));
    }

    #[test]
    fn test_snapshot_rejects_bad_id() {
        let json = r#"{"artifacts": [{"id": "nope", "type": "Requirement"}]}"#;
        assert!(serde_json::from_str::<Snapshot>(json).is_err());
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: round-trip through string representation preserves ID
        #[test]
        fn test_artifact_id_string_roundtrip(value: u128) {
            let id = ArtifactId::from_value(value);
            let parsed = ArtifactId::from_string(&id.to_string());
            prop_assert_eq!(parsed, Ok(id));
        }
    }
}
