use ppl::{ParserConfig, parse, parse_with, parse_with_recovery, pretty, tokenize};
use proptest::prelude::*;

fn arb_field() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("a".to_string()),
        Just("status".to_string()),
        Just("host".to_string()),
        Just("user_id".to_string()),
        Just("resp.bytes".to_string()),
        Just("count".to_string()),
        Just("`odd name`".to_string()),
    ]
}

fn arb_string() -> impl Strategy<Value = String> {
    "[a-z '\"%*]{0,8}".prop_map(|s| format!("'{}'", s.replace('\'', "''")))
}

fn arb_literal() -> impl Strategy<Value = String> {
    prop_oneof![
        (0i64..1000).prop_map(|n| n.to_string()),
        (0i64..1000).prop_map(|n| format!("-{n}")),
        (0u32..1000, 1u32..100).prop_map(|(a, b)| format!("{a}.{b}")),
        arb_string(),
        Just("true".to_string()),
    ]
}

fn arb_value(depth: u32) -> BoxedStrategy<String> {
    let leaf = prop_oneof![arb_field(), arb_literal()];
    if depth == 0 {
        return leaf.boxed();
    }

    let binary = (
        arb_value(depth - 1),
        prop_oneof![Just("+"), Just("-"), Just("*"), Just("/"), Just("%")],
        arb_value(depth - 1),
    )
        .prop_map(|(lhs, op, rhs)| format!("{lhs} {op} {rhs}"));
    let grouped = arb_value(depth - 1).prop_map(|v| format!("({v})"));
    let call = (
        prop_oneof![Just("abs"), Just("upper"), Just("concat"), Just("round")],
        prop::collection::vec(arb_value(depth - 1), 1..3),
    )
        .prop_map(|(name, args)| format!("{name}({})", args.join(", ")));
    prop_oneof![leaf, binary, grouped, call].boxed()
}

fn arb_predicate(depth: u32) -> BoxedStrategy<String> {
    let comparison = (
        arb_value(1),
        prop_oneof![Just("="), Just("!="), Just("<"), Just("<="), Just(">"), Just(">=")],
        arb_value(1),
    )
        .prop_map(|(lhs, op, rhs)| format!("{lhs} {op} {rhs}"));
    let membership = (arb_field(), prop::collection::vec(arb_literal(), 1..4))
        .prop_map(|(field, list)| format!("{field} IN ({})", list.join(", ")));
    let leaf = prop_oneof![comparison, membership];
    if depth == 0 {
        return leaf.boxed();
    }

    let binary = (
        arb_predicate(depth - 1),
        prop_oneof![Just(" AND "), Just(" OR "), Just(" XOR "), Just(" ")],
        arb_predicate(depth - 1),
    )
        .prop_map(|(lhs, op, rhs)| match op {
            // `a = 1 -2 = b` would read as subtraction
            " " => format!("{lhs} ({rhs})"),
            op => format!("{lhs}{op}{rhs}"),
        });
    let negated = arb_predicate(depth - 1).prop_map(|p| format!("NOT ({p})"));
    let grouped = arb_predicate(depth - 1).prop_map(|p| format!("({p})"));
    prop_oneof![leaf, binary, negated, grouped].boxed()
}

fn arb_stage() -> impl Strategy<Value = String> {
    prop_oneof![
        arb_predicate(2).prop_map(|p| format!("where {p}")),
        (arb_field(), arb_value(2)).prop_map(|(f, v)| format!("eval {f} = {v}")),
        prop::collection::vec(arb_field(), 1..4).prop_map(|fs| format!("fields {}", fs.join(", "))),
        (arb_field(), arb_field()).prop_map(|(agg, by)| format!("stats avg({agg}), count() by {by}")),
        (arb_field(), any::<bool>()).prop_map(|(f, desc)| {
            format!("sort {}{f}", if desc { "- " } else { "" })
        }),
        (1u32..100).prop_map(|n| format!("head {n}")),
        arb_field().prop_map(|f| format!("dedup {f}")),
    ]
}

fn arb_query() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("logs"), Just("metrics"), Just("remote:logs")],
        prop::collection::vec(arb_stage(), 0..4),
    )
        .prop_map(|(table, stages)| {
            let mut query = format!("source={table}");
            for stage in stages {
                query.push_str(" | ");
                query.push_str(&stage);
            }
            query
        })
}

proptest! {
    #[test]
    fn parse_pretty_roundtrip(query in arb_query()) {
        let parsed = parse(&query).expect("generated query should parse");
        let rendered = parsed.to_string();
        let reparsed = parse(&rendered).expect("printed query should reparse");
        prop_assert_eq!(&parsed, &reparsed);

        let broken = pretty(&parsed, 40);
        prop_assert_eq!(parse(&broken).expect("multi-line output should reparse"), parsed);
    }

    #[test]
    fn printing_is_a_fixed_point(query in arb_query()) {
        let once = parse(&query).expect("generated query should parse").to_string();
        let twice = parse(&once).expect("printed query should reparse").to_string();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn arbitrary_input_never_panics(input in "\\PC{0,64}") {
        let _ = tokenize(&input);
        let _ = parse(&input);
        let _ = parse_with_recovery(&input, &ParserConfig::default());
    }

    #[test]
    fn recovery_agrees_with_strict_parse(query in arb_query()) {
        let config = ParserConfig::default();
        let output = parse_with_recovery(&query, &config);
        prop_assert!(output.is_ok());
        prop_assert_eq!(output.into_result(), parse_with(&query, &config));
    }

    #[test]
    fn lexer_always_ends_with_eof(input in "\\PC{0,64}") {
        let tokens = tokenize(&input);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(ppl::TokenKind::Eof));
        prop_assert_eq!(tokens.iter().filter(|t| t.kind == ppl::TokenKind::Eof).count(), 1);
    }
}
