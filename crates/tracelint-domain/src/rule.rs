//! Rule module - structural constraints over artifact-type relationships
//!
//! A [`Rule`] names a [`Condition`] tree. Leaves are cardinality constraints
//! counting children or siblings of a target type; composites join two or
//! more sub-conditions with a single [`Combinator`].
//!
//! The `Display` impls write the canonical rule text, which the parser in
//! `tracelint-rules` reads back into an equal tree:
//!
//! ```text
//! at-least-one(Requirement, CHILD, Design) && (exactly-n(2, Requirement, CHILD, Test) || less-than-n(1, Requirement, SIBLING, Requirement))
//! ```

use crate::artifact::types_match;
use crate::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cardinality constraint of a leaf condition
///
/// The "-n" variants carry their threshold, so a threshold can never be
/// missing or stray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// count >= 1
    AtLeastOne,
    /// count >= n
    AtLeastN(u32),
    /// count == 1
    ExactlyOne,
    /// count == n
    ExactlyN(u32),
    /// count < n
    LessThanN(u32),
}

impl Kind {
    /// All kind keywords, in grammar order
    pub const KEYWORDS: [&'static str; 5] = [
        "at-least-one",
        "at-least-n",
        "exactly-one",
        "exactly-n",
        "less-than-n",
    ];

    /// Keyword used in rule text
    pub fn keyword(&self) -> &'static str {
        match self {
            Kind::AtLeastOne => "at-least-one",
            Kind::AtLeastN(_) => "at-least-n",
            Kind::ExactlyOne => "exactly-one",
            Kind::ExactlyN(_) => "exactly-n",
            Kind::LessThanN(_) => "less-than-n",
        }
    }

    /// Whether the keyword takes an explicit threshold argument
    pub fn keyword_takes_threshold(keyword: &str) -> Option<bool> {
        match keyword.to_ascii_lowercase().as_str() {
            "at-least-one" | "exactly-one" => Some(false),
            "at-least-n" | "exactly-n" | "less-than-n" => Some(true),
            _ => None,
        }
    }

    /// Build a kind from its keyword and threshold
    ///
    /// Returns `None` for an unknown keyword or when the presence of
    /// `threshold` does not match the keyword.
    pub fn from_keyword(keyword: &str, threshold: Option<u32>) -> Option<Self> {
        match (keyword.to_ascii_lowercase().as_str(), threshold) {
            ("at-least-one", None) => Some(Kind::AtLeastOne),
            ("exactly-one", None) => Some(Kind::ExactlyOne),
            ("at-least-n", Some(n)) => Some(Kind::AtLeastN(n)),
            ("exactly-n", Some(n)) => Some(Kind::ExactlyN(n)),
            ("less-than-n", Some(n)) => Some(Kind::LessThanN(n)),
            _ => None,
        }
    }

    /// Effective threshold: 1 for the "-one" kinds
    pub fn threshold(&self) -> u32 {
        match self {
            Kind::AtLeastOne | Kind::ExactlyOne => 1,
            Kind::AtLeastN(n) | Kind::ExactlyN(n) | Kind::LessThanN(n) => *n,
        }
    }

    /// Threshold as written in rule text, if the kind has one
    pub fn explicit_threshold(&self) -> Option<u32> {
        match self {
            Kind::AtLeastOne | Kind::ExactlyOne => None,
            Kind::AtLeastN(n) | Kind::ExactlyN(n) | Kind::LessThanN(n) => Some(*n),
        }
    }

    /// Whether `count` related artifacts satisfy this constraint
    pub fn is_satisfied_by(&self, count: usize) -> bool {
        let count = count as u64;
        match *self {
            Kind::AtLeastOne => count >= 1,
            Kind::AtLeastN(n) => count >= u64::from(n),
            Kind::ExactlyOne => count == 1,
            Kind::ExactlyN(n) => count == u64::from(n),
            Kind::LessThanN(n) => count < u64::from(n),
        }
    }
}

/// Which derived neighbor set a leaf counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Artifacts tracing to the node
    Child,
    /// Other children of the node's parents
    Sibling,
}

impl Relation {
    /// Keyword used in rule text
    pub fn keyword(&self) -> &'static str {
        match self {
            Relation::Child => "CHILD",
            Relation::Sibling => "SIBLING",
        }
    }

    /// Parse a relation keyword (case-insensitive)
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "CHILD" => Some(Relation::Child),
            "SIBLING" => Some(Relation::Sibling),
            _ => None,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// Boolean combinator of a composite rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Every sub-rule must pass
    And,
    /// At least one sub-rule must pass
    Or,
}

impl Combinator {
    /// Operator used in rule text
    pub fn symbol(&self) -> &'static str {
        match self {
            Combinator::And => "&&",
            Combinator::Or => "||",
        }
    }
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A single cardinality constraint
///
/// Type names are checked on construction so that the canonical text of
/// every leaf parses back into the same leaf.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LeafCondition {
    kind: Kind,
    source_type: String,
    relation: Relation,
    target_type: String,
}

impl LeafCondition {
    /// Create a leaf condition
    ///
    /// Fails when either type name is empty, padded with whitespace, or
    /// contains a rule delimiter (`(`, `)`, `,`, `&&`, `||`).
    pub fn new(
        kind: Kind,
        source_type: impl Into<String>,
        relation: Relation,
        target_type: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let source_type = source_type.into();
        let target_type = target_type.into();
        check_type_name(&source_type)?;
        check_type_name(&target_type)?;
        Ok(Self {
            kind,
            source_type,
            relation,
            target_type,
        })
    }

    /// Cardinality constraint and its threshold
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Type of the artifacts this leaf is evaluated on
    pub fn source_type(&self) -> &str {
        &self.source_type
    }

    /// Neighbor set counted
    pub fn relation(&self) -> Relation {
        self.relation
    }

    /// Type of the neighbors counted
    pub fn target_type(&self) -> &str {
        &self.target_type
    }
}

fn check_type_name(name: &str) -> Result<(), DomainError> {
    let reason = if name.trim().is_empty() {
        "empty"
    } else if name.trim() != name {
        "leading or trailing whitespace"
    } else if name.contains(['(', ')', ',']) {
        "contains '(', ')' or ','"
    } else if name.contains("&&") || name.contains("||") {
        "contains '&&' or '||'"
    } else {
        return Ok(());
    };
    Err(DomainError::InvalidTypeName {
        value: name.to_string(),
        reason,
    })
}

impl fmt::Display for LeafCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.kind.keyword())?;
        if let Some(n) = self.kind.explicit_threshold() {
            write!(f, "{}, ", n)?;
        }
        write!(
            f,
            "{}, {}, {})",
            self.source_type, self.relation, self.target_type
        )
    }
}

/// Two or more sub-conditions joined by one combinator
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeRule {
    combinator: Combinator,
    sub_rules: Vec<Condition>,
}

impl CompositeRule {
    /// Create a composite; fails with fewer than two sub-rules
    pub fn new(combinator: Combinator, sub_rules: Vec<Condition>) -> Result<Self, DomainError> {
        if sub_rules.len() < 2 {
            return Err(DomainError::TooFewSubRules(sub_rules.len()));
        }
        Ok(Self {
            combinator,
            sub_rules,
        })
    }

    /// The combinator joining the sub-rules
    pub fn combinator(&self) -> Combinator {
        self.combinator
    }

    /// Sub-rules, in authored order
    pub fn sub_rules(&self) -> &[Condition] {
        &self.sub_rules
    }
}

impl fmt::Display for CompositeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, sub) in self.sub_rules.iter().enumerate() {
            if i > 0 {
                write!(f, " {} ", self.combinator)?;
            }
            match sub {
                Condition::Leaf(leaf) => write!(f, "{}", leaf)?,
                Condition::Composite(inner) => write!(f, "({})", inner)?,
            }
        }
        Ok(())
    }
}

/// Node of a rule tree
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Cardinality constraint
    Leaf(LeafCondition),
    /// Boolean combination of sub-conditions
    Composite(CompositeRule),
}

impl Condition {
    /// All leaves, depth first, in authored order
    pub fn leaves(&self) -> Vec<&LeafCondition> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a LeafCondition>) {
        match self {
            Condition::Leaf(leaf) => out.push(leaf),
            Condition::Composite(composite) => {
                for sub in &composite.sub_rules {
                    sub.collect_leaves(out);
                }
            }
        }
    }

    /// Nesting depth: 1 for a leaf
    pub fn depth(&self) -> usize {
        match self {
            Condition::Leaf(_) => 1,
            Condition::Composite(composite) => {
                1 + composite
                    .sub_rules
                    .iter()
                    .map(Condition::depth)
                    .max()
                    .unwrap_or(0)
            }
        }
    }
}

impl From<LeafCondition> for Condition {
    fn from(leaf: LeafCondition) -> Self {
        Condition::Leaf(leaf)
    }
}

impl From<CompositeRule> for Condition {
    fn from(composite: CompositeRule) -> Self {
        Condition::Composite(composite)
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Leaf(leaf) => write!(f, "{}", leaf),
            Condition::Composite(composite) => write!(f, "{}", composite),
        }
    }
}

/// A named rule, the unit applied by the verifier
///
/// `name` is what ends up in the warnings map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Rule {
    name: String,
    description: String,
    root: Condition,
}

impl Rule {
    /// Create a rule
    ///
    /// Name and description are trimmed, as they are when read from a
    /// definition; a blank name is rejected.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        root: Condition,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(DomainError::EmptyRuleName);
        }
        Ok(Self {
            name,
            description: description.into().trim().to_string(),
            root,
        })
    }

    /// Identifier surfaced in warnings
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Free-form explanation for rule authors
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Root of the condition tree
    pub fn root(&self) -> &Condition {
        &self.root
    }

    /// Whether every leaf of this rule is scoped to `artifact_type`
    pub fn applies_to(&self, artifact_type: &str) -> bool {
        self.root
            .leaves()
            .iter()
            .all(|leaf| types_match(&leaf.source_type, artifact_type))
    }

    /// The source type shared by all leaves, if there is one
    pub fn source_type(&self) -> Option<&str> {
        let leaves = self.root.leaves();
        let first = leaves.first()?;
        if leaves
            .iter()
            .all(|leaf| types_match(&leaf.source_type, &first.source_type))
        {
            Some(first.source_type.as_str())
        } else {
            None
        }
    }

    /// Canonical rule text of the root condition
    pub fn text(&self) -> String {
        self.root.to_string()
    }

    /// Convert back into the definition it can be re-parsed from
    pub fn to_definition(&self) -> RuleDefinition {
        RuleDefinition::new(&self.name, &self.description, self.text())
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}

/// Unique identifier handed out when a rule definition is accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RuleId(uuid::Uuid);

impl RuleId {
    /// Generate a new UUIDv7-based RuleId
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7())
    }

    /// The underlying UUID
    pub fn as_uuid(&self) -> uuid::Uuid {
        self.0
    }
}

impl Default for RuleId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Rule as authored: name, description and unparsed text
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RuleDefinition {
    /// Identifier surfaced in warnings
    pub name: String,

    /// Free-form explanation
    #[serde(default)]
    pub description: String,

    /// Rule text in the rule grammar
    pub text: String,
}

impl RuleDefinition {
    /// Create a rule definition
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(kind: Kind, source: &str, relation: Relation, target: &str) -> Condition {
        LeafCondition::new(kind, source, relation, target)
            .unwrap()
            .into()
    }

    #[test]
    fn test_kind_satisfaction() {
        assert!(Kind::AtLeastOne.is_satisfied_by(2));
        assert!(!Kind::AtLeastOne.is_satisfied_by(0));
        assert!(Kind::AtLeastN(2).is_satisfied_by(2));
        assert!(!Kind::AtLeastN(3).is_satisfied_by(2));
        assert!(Kind::ExactlyOne.is_satisfied_by(1));
        assert!(!Kind::ExactlyOne.is_satisfied_by(2));
        assert!(Kind::ExactlyN(0).is_satisfied_by(0));
        assert!(Kind::LessThanN(2).is_satisfied_by(1));
        assert!(!Kind::LessThanN(0).is_satisfied_by(0));
    }

    #[test]
    fn test_kind_thresholds() {
        assert_eq!(Kind::AtLeastOne.threshold(), 1);
        assert_eq!(Kind::ExactlyOne.explicit_threshold(), None);
        assert_eq!(Kind::ExactlyN(4).explicit_threshold(), Some(4));
    }

    #[test]
    fn test_kind_from_keyword_checks_threshold_presence() {
        assert_eq!(Kind::from_keyword("at-least-one", None), Some(Kind::AtLeastOne));
        assert_eq!(Kind::from_keyword("at-least-one", Some(2)), None);
        assert_eq!(Kind::from_keyword("exactly-n", None), None);
        assert_eq!(Kind::from_keyword("LESS-THAN-N", Some(3)), Some(Kind::LessThanN(3)));
        assert_eq!(Kind::from_keyword("most-n", Some(3)), None);
    }

    #[test]
    fn test_leaf_display() {
        let one =
            LeafCondition::new(Kind::AtLeastOne, "Requirement", Relation::Child, "Design").unwrap();
        assert_eq!(one.to_string(), "at-least-one(Requirement, CHILD, Design)");

        let n =
            LeafCondition::new(Kind::LessThanN(3), "Design", Relation::Sibling, "Design").unwrap();
        assert_eq!(n.to_string(), "less-than-n(3, Design, SIBLING, Design)");
    }

    #[test]
    fn test_composite_display_groups_nested() {
        let inner = CompositeRule::new(
            Combinator::Or,
            vec![
                leaf(Kind::ExactlyOne, "Requirement", Relation::Child, "Test"),
                leaf(Kind::AtLeastN(2), "Requirement", Relation::Child, "Test"),
            ],
        )
        .unwrap();
        let outer = CompositeRule::new(
            Combinator::And,
            vec![
                leaf(Kind::AtLeastOne, "Requirement", Relation::Child, "Design"),
                inner.into(),
            ],
        )
        .unwrap();

        assert_eq!(
            outer.to_string(),
            "at-least-one(Requirement, CHILD, Design) && \
             (exactly-one(Requirement, CHILD, Test) || at-least-n(2, Requirement, CHILD, Test))"
        );
    }

    #[test]
    fn test_composite_requires_two_sub_rules() {
        let single = vec![leaf(Kind::AtLeastOne, "A", Relation::Child, "B")];
        assert_eq!(
            CompositeRule::new(Combinator::And, single),
            Err(DomainError::TooFewSubRules(1))
        );
        assert!(CompositeRule::new(Combinator::Or, Vec::new()).is_err());
    }

    #[test]
    fn test_rule_scope() {
        let root = CompositeRule::new(
            Combinator::And,
            vec![
                leaf(Kind::AtLeastOne, "Requirement", Relation::Child, "Design"),
                leaf(Kind::AtLeastOne, "requirement", Relation::Child, "Test"),
            ],
        )
        .unwrap();
        let rule = Rule::new("covered", "", root.into()).unwrap();

        assert!(rule.applies_to("REQUIREMENT"));
        assert!(!rule.applies_to("Design"));
        assert_eq!(rule.source_type(), Some("Requirement"));
        assert_eq!(rule.root().leaves().len(), 2);
        assert_eq!(rule.root().depth(), 2);
    }

    #[test]
    fn test_mixed_source_types_apply_nowhere() {
        let root = CompositeRule::new(
            Combinator::Or,
            vec![
                leaf(Kind::AtLeastOne, "Requirement", Relation::Child, "Design"),
                leaf(Kind::AtLeastOne, "Design", Relation::Child, "Code"),
            ],
        )
        .unwrap();
        let rule = Rule::new("mixed", "", root.into()).unwrap();

        assert_eq!(rule.source_type(), None);
        assert!(!rule.applies_to("Requirement"));
        assert!(!rule.applies_to("Design"));
    }

    #[test]
    fn test_type_names_must_be_writable_as_rule_text() {
        for bad in ["", "  ", " Padded ", "R&&D", "A||B", "A,B", "Req (v2)", "x)"] {
            let result = LeafCondition::new(Kind::AtLeastOne, bad, Relation::Child, "Design");
            assert!(
                matches!(result, Err(DomainError::InvalidTypeName { .. })),
                "source '{}' accepted",
                bad
            );
            let result = LeafCondition::new(Kind::AtLeastOne, "Design", Relation::Child, bad);
            assert!(result.is_err(), "target '{}' accepted", bad);
        }

        for good in ["R&D", "a|b", "Software Requirement", "v2.1"] {
            assert!(LeafCondition::new(Kind::AtLeastOne, good, Relation::Child, good).is_ok());
        }
    }

    #[test]
    fn test_rule_name_is_trimmed_and_required() {
        let root = leaf(Kind::AtLeastOne, "Requirement", Relation::Child, "Design");
        let rule = Rule::new(" x ", " about x ", root.clone()).unwrap();
        assert_eq!(rule.name(), "x");
        assert_eq!(rule.description(), "about x");
        assert_eq!(rule.to_definition().name, "x");

        assert_eq!(Rule::new("   ", "", root), Err(DomainError::EmptyRuleName));
    }
}
