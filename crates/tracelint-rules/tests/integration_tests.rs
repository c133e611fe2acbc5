//! Integration tests for tracelint-rules
//!
//! These tests exercise the public parsing API end to end, including the
//! canonical text round trip.

use proptest::prelude::*;
use tracelint_domain::{
    Combinator, CompositeRule, Condition, DomainError, Kind, LeafCondition, Relation, Rule,
};
use tracelint_rules::{is_valid, parse, parse_condition, ParseError, RuleAuthoring, RuleCache};

#[test]
fn test_parse_composite_rule() {
    let rule = parse(
        "covered",
        "Requirements need a design and a test",
        "at-least-one(Requirement, CHILD, Design) && at-least-one(Requirement, CHILD, Test)",
    )
    .unwrap();

    assert_eq!(rule.name(), "covered");
    assert_eq!(rule.source_type(), Some("Requirement"));
    let Condition::Composite(composite) = rule.root() else {
        panic!("expected composite root");
    };
    assert_eq!(composite.combinator(), Combinator::And);
    assert_eq!(composite.sub_rules().len(), 2);
}

#[test]
fn test_unknown_kind_produces_no_rule() {
    let result = parse("r", "", "sometimes(Requirement, CHILD, Design)");
    assert!(matches!(result, Err(ParseError::UnknownKind { .. })));
}

#[test]
fn test_canonical_text_of_hand_built_rule() {
    let root = CompositeRule::new(
        Combinator::Or,
        vec![
            LeafCondition::new(Kind::ExactlyN(2), "Requirement", Relation::Child, "Test")
                .unwrap()
                .into(),
            CompositeRule::new(
                Combinator::And,
                vec![
                    LeafCondition::new(Kind::AtLeastOne, "Requirement", Relation::Child, "Design")
                        .unwrap()
                        .into(),
                    LeafCondition::new(Kind::LessThanN(3), "Requirement", Relation::Sibling, "Requirement")
                        .unwrap()
                        .into(),
                ],
            )
            .unwrap()
            .into(),
        ],
    )
    .unwrap();
    let rule = Rule::new("mixed", "", root.into()).unwrap();

    let text = rule.text();
    assert_eq!(
        text,
        "exactly-n(2, Requirement, CHILD, Test) || (at-least-one(Requirement, CHILD, Design) && \
         less-than-n(3, Requirement, SIBLING, Requirement))"
    );
    assert_eq!(&parse_condition(&text).unwrap(), rule.root());
}

#[test]
fn test_error_messages_name_the_problem() {
    let err = parse_condition("exactly-n(x, Requirement, CHILD, Design)").unwrap_err();
    assert_eq!(err.code(), "invalid_threshold");
    assert_eq!(err.offset(), Some(10));
    assert!(err.to_string().contains("'x'"));

    let err = parse_condition("at-least-one(R, CHILD, D) || at-least-one(R, CHILD, T) && at-least-one(R, CHILD, C)")
        .unwrap_err();
    assert_eq!(err.code(), "mixed_combinators");
    assert!(err.to_string().contains("parentheses"));
}

#[test]
fn test_cache_and_authoring_agree_with_parse() {
    let text = "less-than-n(2, Design, SIBLING, Design)";
    let definition = tracelint_domain::RuleDefinition::new("unique", "", text);

    let parsed = parse("unique", "", text).unwrap();
    let mut cache = RuleCache::new();
    let cached = cache.get_or_parse(&definition).unwrap().clone();
    let accepted = RuleAuthoring::default().validate(&definition).unwrap();

    assert_eq!(parsed, cached);
    assert_eq!(parsed, accepted.rule);
    assert!(is_valid(text));
}

#[test]
fn test_definition_round_trip() {
    let rule = parse(
        "r",
        "desc",
        "(exactly-one(R, CHILD, D) || exactly-one(R, CHILD, E)) && at-least-n(4, R, SIBLING, R)",
    )
    .unwrap();
    let def = rule.to_definition();
    assert_eq!(parse(&def.name, &def.description, &def.text).unwrap(), rule);
}

#[test]
fn test_type_names_the_grammar_cannot_hold_are_rejected() {
    for name in ["R&&D", "A||B", "A,B", "Req (v2)", " Padded ", ""] {
        let result = LeafCondition::new(Kind::AtLeastOne, name, Relation::Child, "Design");
        assert!(
            matches!(result, Err(DomainError::InvalidTypeName { .. })),
            "'{}' accepted",
            name
        );
    }
}

#[test]
fn test_padded_rule_name_round_trips() {
    let root = parse_condition("at-least-one(R, CHILD, D)").unwrap();
    let rule = Rule::new(" x ", " padded ", root).unwrap();
    let def = rule.to_definition();
    assert_eq!(parse(&def.name, &def.description, &def.text).unwrap(), rule);
}

/// Printable text, including delimiters and padding; unusable names are filtered out
fn raw_name() -> impl Strategy<Value = String> {
    "[ -~\u{e9}\u{a0}]{0,12}"
}

fn kind() -> impl Strategy<Value = Kind> {
    prop_oneof![
        Just(Kind::AtLeastOne),
        Just(Kind::ExactlyOne),
        any::<u32>().prop_map(Kind::AtLeastN),
        any::<u32>().prop_map(Kind::ExactlyN),
        any::<u32>().prop_map(Kind::LessThanN),
    ]
}

fn relation() -> impl Strategy<Value = Relation> {
    prop_oneof![Just(Relation::Child), Just(Relation::Sibling)]
}

fn condition() -> impl Strategy<Value = Condition> {
    let leaf = (kind(), raw_name(), relation(), raw_name()).prop_filter_map(
        "type name not writable as rule text",
        |(kind, source, relation, target)| {
            LeafCondition::new(kind, source, relation, target)
                .ok()
                .map(Condition::Leaf)
        },
    );

    leaf.prop_recursive(4, 32, 4, |inner| {
        (
            prop_oneof![Just(Combinator::And), Just(Combinator::Or)],
            prop::collection::vec(inner, 2..5),
        )
            .prop_map(|(combinator, sub_rules)| {
                Condition::Composite(
                    CompositeRule::new(combinator, sub_rules).expect("at least two sub-rules"),
                )
            })
    })
}

proptest! {
    /// Property: canonical text parses back into an equal tree
    #[test]
    fn test_canonical_text_round_trip(root in condition()) {
        let text = root.to_string();
        let parsed = parse_condition(&text);
        prop_assert_eq!(parsed, Ok(root));
    }

    /// Property: any constructible named rule survives its definition
    #[test]
    fn test_rule_definition_round_trip(
        name in raw_name(),
        description in raw_name(),
        root in condition(),
    ) {
        prop_assume!(!name.trim().is_empty());
        let rule = Rule::new(name, description, root).unwrap();
        let def = rule.to_definition();
        prop_assert_eq!(parse(&def.name, &def.description, &def.text), Ok(rule));
    }

    /// Property: parsing is deterministic
    #[test]
    fn test_parse_is_deterministic(root in condition()) {
        let text = root.to_string();
        prop_assert_eq!(parse_condition(&text), parse_condition(&text));
    }

    /// Property: arbitrary text never panics the parser
    #[test]
    fn test_arbitrary_text_does_not_panic(text in "[a-z()&|, 0-9-]{0,60}") {
        let _ = parse_condition(&text);
    }
}
