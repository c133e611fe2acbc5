//! Validation of rule definitions submitted by rule authors
//!
//! This is where rule text crosses a trust boundary, so it is strict and
//! side-effect free: a definition is either accepted as a parsed rule with a
//! fresh id, or rejected with the parse error. Nothing is stored here.

use crate::{ParseError, RuleParser};
use tracelint_domain::{Rule, RuleDefinition, RuleId};
use tracing::{info, warn};

/// A definition that passed validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptedRule {
    /// Identifier generated for the new rule
    pub id: RuleId,

    /// The parsed rule
    pub rule: Rule,
}

/// Validates rule definitions before persistence accepts them
#[derive(Debug, Clone, Default)]
pub struct RuleAuthoring {
    parser: RuleParser,
}

impl RuleAuthoring {
    /// Create an authoring validator using `parser`
    pub fn new(parser: RuleParser) -> Self {
        Self { parser }
    }

    /// Validate one definition
    ///
    /// # Examples
    ///
    /// ```
    /// use tracelint_domain::RuleDefinition;
    /// use tracelint_rules::RuleAuthoring;
    ///
    /// let authoring = RuleAuthoring::default();
    /// let definition = RuleDefinition::new(
    ///     "single-design",
    ///     "Requirements map to exactly one design",
    ///     "exactly-one(Requirement, CHILD, Design)",
    /// );
    ///
    /// let accepted = authoring.validate(&definition).unwrap();
    /// assert_eq!(accepted.rule.name(), "single-design");
    /// ```
    pub fn validate(&self, definition: &RuleDefinition) -> Result<AcceptedRule, ParseError> {
        match self
            .parser
            .parse(&definition.name, &definition.description, &definition.text)
        {
            Ok(rule) => {
                let id = RuleId::new();
                info!("Accepted rule '{}' as {}", rule.name(), id);
                Ok(AcceptedRule { id, rule })
            }
            Err(e) => {
                warn!("Rejected rule '{}': {}", definition.name, e);
                Err(e)
            }
        }
    }

    /// Validate several definitions, keeping input order
    pub fn validate_all<'a, I>(&self, definitions: I) -> Vec<Result<AcceptedRule, ParseError>>
    where
        I: IntoIterator<Item = &'a RuleDefinition>,
    {
        definitions
            .into_iter()
            .map(|definition| self.validate(definition))
            .collect()
    }
}
