//! Recursive-descent parser from rule text to rule trees

use crate::error::ParseError;
use crate::lexer::{tokenize, Token, TokenKind};
use tracelint_domain::{Combinator, CompositeRule, Condition, Kind, LeafCondition, Relation, Rule};

/// Default maximum nesting depth of a rule tree
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Deepest parenthesis nesting read before giving up, redundant pairs included
pub const MAX_NESTING: usize = 256;

const FIELDS_WITH_THRESHOLD: [&str; 4] = ["threshold", "source type", "relation", "target type"];
const FIELDS_WITHOUT_THRESHOLD: [&str; 3] = ["source type", "relation", "target type"];

/// Rule text parser
///
/// Holds only its limits; parsing the same text always gives the same result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleParser {
    max_depth: usize,
}

impl Default for RuleParser {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl RuleParser {
    /// Create a parser with the default depth limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser that rejects trees deeper than `max_depth`
    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: max_depth.max(1),
        }
    }

    /// Maximum accepted tree depth
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Parse a named rule
    pub fn parse(&self, name: &str, description: &str, text: &str) -> Result<Rule, ParseError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ParseError::EmptyName);
        }
        let root = self.parse_condition(text)?;
        Rule::new(name, description, root).map_err(|_| ParseError::EmptyName)
    }

    /// Parse rule text into a condition tree
    pub fn parse_condition(&self, text: &str) -> Result<Condition, ParseError> {
        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Err(ParseError::EmptyRule);
        }

        let mut state = ParserState {
            tokens,
            pos: 0,
        };
        let condition = state.parse_expr(0)?;

        if let Some(token) = state.next() {
            return Err(match token.kind {
                TokenKind::RParen => ParseError::UnbalancedCombinator {
                    offset: token.offset,
                    detail: "unmatched ')'".to_string(),
                },
                kind => ParseError::UnexpectedToken {
                    expected: "'&&', '||' or end of rule",
                    found: kind.to_string(),
                    offset: token.offset,
                },
            });
        }

        let depth = condition.depth();
        if depth > self.max_depth {
            return Err(ParseError::TooDeep {
                depth,
                max: self.max_depth,
            });
        }

        Ok(condition)
    }
}

/// Parse a named rule with the default parser
pub fn parse(name: &str, description: &str, text: &str) -> Result<Rule, ParseError> {
    RuleParser::default().parse(name, description, text)
}

/// Parse rule text into a condition tree with the default parser
pub fn parse_condition(text: &str) -> Result<Condition, ParseError> {
    RuleParser::default().parse_condition(text)
}

/// Whether `text` is a well-formed rule
pub fn is_valid(text: &str) -> bool {
    parse_condition(text).is_ok()
}

struct ParserState {
    tokens: Vec<Token>,
    pos: usize,
}

impl ParserState {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    /// expr := term (COMBINATOR term)*, one combinator per level
    ///
    /// `nesting` counts open parentheses; tree depth is checked on the result.
    fn parse_expr(&mut self, nesting: usize) -> Result<Condition, ParseError> {
        let mut sub_rules = vec![self.parse_term(nesting)?];
        let mut combinator: Option<(Combinator, usize)> = None;

        while let Some(token) = self.peek() {
            let current = match token.kind {
                TokenKind::And => Combinator::And,
                TokenKind::Or => Combinator::Or,
                _ => break,
            };
            let offset = token.offset;

            if let Some((previous, _)) = combinator {
                if previous != current {
                    return Err(ParseError::MixedCombinators { offset });
                }
            } else {
                combinator = Some((current, offset));
            }
            self.pos += 1;

            match self.peek().map(|t| &t.kind) {
                None | Some(TokenKind::RParen) | Some(TokenKind::And) | Some(TokenKind::Or) => {
                    return Err(ParseError::UnbalancedCombinator {
                        offset,
                        detail: format!("no rule after '{}'", current),
                    });
                }
                _ => {}
            }
            sub_rules.push(self.parse_term(nesting)?);
        }

        match combinator {
            None => Ok(sub_rules.remove(0)),
            Some((combinator, offset)) => CompositeRule::new(combinator, sub_rules)
                .map(Condition::Composite)
                .map_err(|e| ParseError::UnbalancedCombinator {
                    offset,
                    detail: e.to_string(),
                }),
        }
    }

    /// term := leaf | "(" expr ")"
    fn parse_term(&mut self, nesting: usize) -> Result<Condition, ParseError> {
        let Some(token) = self.next() else {
            return Err(ParseError::UnexpectedEnd { expected: "a rule" });
        };

        match token.kind {
            TokenKind::LParen => {
                if nesting >= MAX_NESTING {
                    return Err(ParseError::NestingTooDeep {
                        offset: token.offset,
                        max: MAX_NESTING,
                    });
                }
                let inner = self.parse_expr(nesting + 1)?;
                match self.next() {
                    Some(Token {
                        kind: TokenKind::RParen,
                        ..
                    }) => Ok(inner),
                    Some(other) => Err(ParseError::UnexpectedToken {
                        expected: "')'",
                        found: other.kind.to_string(),
                        offset: other.offset,
                    }),
                    None => Err(ParseError::UnbalancedCombinator {
                        offset: token.offset,
                        detail: "unclosed '('".to_string(),
                    }),
                }
            }
            TokenKind::And | TokenKind::Or => Err(ParseError::UnbalancedCombinator {
                offset: token.offset,
                detail: format!("no rule before '{}'", token.kind),
            }),
            TokenKind::Word(word) => self.parse_leaf(word, token.offset),
            other => Err(ParseError::UnexpectedToken {
                expected: "a rule",
                found: other.to_string(),
                offset: token.offset,
            }),
        }
    }

    /// leaf := KIND "(" [THRESHOLD ","] SOURCE "," RELATION "," TARGET ")"
    fn parse_leaf(&mut self, keyword: String, offset: usize) -> Result<Condition, ParseError> {
        let Some(takes_threshold) = Kind::keyword_takes_threshold(&keyword) else {
            return Err(ParseError::UnknownKind {
                token: keyword,
                offset,
            });
        };

        match self.next() {
            Some(Token {
                kind: TokenKind::LParen,
                ..
            }) => {}
            Some(other) => {
                return Err(ParseError::UnexpectedToken {
                    expected: "'('",
                    found: other.kind.to_string(),
                    offset: other.offset,
                })
            }
            None => return Err(ParseError::UnexpectedEnd { expected: "'('" }),
        }

        let fields: &[&'static str] = if takes_threshold {
            &FIELDS_WITH_THRESHOLD
        } else {
            &FIELDS_WITHOUT_THRESHOLD
        };
        let args = self.parse_arguments(&keyword, offset, fields)?;

        // A "-n" kind written without its threshold shows up as one argument
        // short with a non-numeric first argument.
        if takes_threshold && args.len() == fields.len() - 1 && !is_integer(&args[0].0) {
            return Err(ParseError::MissingField {
                kind: keyword,
                field: "threshold",
                offset,
            });
        }

        if args.len() < fields.len() {
            return Err(ParseError::MissingField {
                kind: keyword,
                field: fields[args.len()],
                offset,
            });
        }

        if args.len() > fields.len() {
            // Prefer pointing at a stray threshold on a "-one" kind
            let (value, at) = if !takes_threshold && is_integer(&args[0].0) {
                args[0].clone()
            } else {
                args[fields.len()].clone()
            };
            return Err(ParseError::UnexpectedField {
                kind: keyword,
                value,
                offset: at,
            });
        }

        let mut rest = args.into_iter();
        let threshold = if takes_threshold {
            match rest.next() {
                Some((value, at)) => Some(parse_threshold(value, at)?),
                None => None,
            }
        } else {
            None
        };

        let (Some((source_type, _)), Some((relation, relation_at)), Some((target_type, _))) =
            (rest.next(), rest.next(), rest.next())
        else {
            return Err(ParseError::MissingField {
                kind: keyword,
                field: "target type",
                offset,
            });
        };

        let Some(relation) = Relation::from_keyword(&relation) else {
            return Err(ParseError::UnknownRelation {
                token: relation,
                offset: relation_at,
            });
        };

        let Some(kind) = Kind::from_keyword(&keyword, threshold) else {
            return Err(ParseError::UnknownKind {
                token: keyword,
                offset,
            });
        };

        LeafCondition::new(kind, source_type, relation, target_type)
            .map(Condition::Leaf)
            .map_err(|e| ParseError::UnexpectedField {
                kind: keyword,
                value: e.to_string(),
                offset,
            })
    }

    /// Comma-separated words up to the closing parenthesis
    ///
    /// An empty slot (`a(, b)`) is reported as the field at that position.
    fn parse_arguments(
        &mut self,
        keyword: &str,
        offset: usize,
        fields: &[&'static str],
    ) -> Result<Vec<(String, usize)>, ParseError> {
        let mut args: Vec<(String, usize)> = Vec::new();

        loop {
            let Some(token) = self.next() else {
                return Err(ParseError::UnexpectedEnd { expected: "')'" });
            };

            match token.kind {
                TokenKind::Word(value) => args.push((value, token.offset)),
                TokenKind::Comma | TokenKind::RParen => {
                    return Err(ParseError::MissingField {
                        kind: keyword.to_string(),
                        field: fields.get(args.len()).copied().unwrap_or("argument"),
                        offset,
                    });
                }
                other => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "an argument",
                        found: other.to_string(),
                        offset: token.offset,
                    });
                }
            }

            match self.next() {
                Some(Token {
                    kind: TokenKind::Comma,
                    ..
                }) => continue,
                Some(Token {
                    kind: TokenKind::RParen,
                    ..
                }) => return Ok(args),
                Some(other) => {
                    return Err(ParseError::UnexpectedToken {
                        expected: "',' or ')'",
                        found: other.kind.to_string(),
                        offset: other.offset,
                    });
                }
                None => return Err(ParseError::UnexpectedEnd { expected: "')'" }),
            }
        }
    }
}

fn is_integer(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn parse_threshold(value: String, offset: usize) -> Result<u32, ParseError> {
    if !is_integer(&value) {
        return Err(ParseError::InvalidThreshold { value, offset });
    }
    value
        .parse::<u32>()
        .map_err(|_| ParseError::InvalidThreshold { value, offset })
}
