//! Memoized rule parsing
//!
//! Parsing is deterministic, so a rule definition only needs parsing once.
//! Entries are keyed by the whole definition (name, description, text);
//! editing any of them produces a new entry. Failures are not cached.

use crate::{ParseError, RuleParser};
use std::collections::HashMap;
use tracelint_domain::{Rule, RuleDefinition};
use tracing::debug;

/// Cache of parsed rules
#[derive(Debug, Clone, Default)]
pub struct RuleCache {
    parser: RuleParser,
    entries: HashMap<RuleDefinition, Rule>,
    hits: u64,
    misses: u64,
}

impl RuleCache {
    /// Create an empty cache using the default parser
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty cache using `parser`
    pub fn with_parser(parser: RuleParser) -> Self {
        Self {
            parser,
            ..Self::default()
        }
    }

    /// Return the cached rule for `definition`, parsing it on first use
    pub fn get_or_parse(&mut self, definition: &RuleDefinition) -> Result<&Rule, ParseError> {
        if self.entries.contains_key(definition) {
            self.hits += 1;
        } else {
            let rule = self
                .parser
                .parse(&definition.name, &definition.description, &definition.text)?;
            debug!("Parsed rule '{}': {}", rule.name(), rule.text());
            self.misses += 1;
            self.entries.insert(definition.clone(), rule);
        }
        Ok(&self.entries[definition])
    }

    /// Number of cached rules
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lookups answered from the cache
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Lookups that had to parse
    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Drop every entry and reset the counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }
}
