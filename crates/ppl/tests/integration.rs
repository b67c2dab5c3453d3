//! Black-box integration tests for the PPL parser
//!
//! These tests exercise the full text → tokens → AST pipeline through the
//! public API only.

use ppl::ast::*;
use ppl::{
    DEFAULT_MAX_CHAIN, Diagnostics, Expected, ParseError, ParserConfig, Position, TokenKind,
    Visitor, parse, parse_tokens, parse_with, parse_with_recovery, tokenize, walk_query,
};

fn stage(source: &str, index: usize) -> Command {
    let query = parse(source).unwrap_or_else(|e| panic!("`{source}` failed: {e}"));
    query.commands[index].clone()
}

fn eval_value(source: &str) -> Expression {
    match stage(source, 1) {
        Command::Eval(eval) => eval.clauses[0].value.clone(),
        other => panic!("expected eval, got {other:?}"),
    }
}

fn where_condition(source: &str) -> LogicalExpr {
    match stage(source, 1) {
        Command::Where(w) => w.condition,
        other => panic!("expected where, got {other:?}"),
    }
}

fn first_syntax_error(source: &str) -> ppl::SyntaxError {
    let diagnostics = parse(source).unwrap_err();
    match diagnostics.first() {
        ParseError::Syntax(err) => err.clone(),
        other => panic!("expected syntax error, got {other:?}"),
    }
}

fn assert_round_trip(source: &str) {
    let query = parse(source).unwrap_or_else(|e| panic!("`{source}` failed: {e}"));
    let printed = query.to_string();
    let reparsed = parse(&printed).unwrap_or_else(|e| panic!("reparse of `{printed}`: {e}"));
    assert_eq!(query, reparsed, "printed as `{printed}`");
}

fn compare(field: &str, op: ComparisonOperator, value: i64) -> LogicalExpr {
    LogicalExpr::Comparison(ComparisonExpr::Compare {
        left: ValueExpr::field(field),
        op,
        right: ValueExpr::int(value),
    })
}

// ============ Query shape ============

#[test]
fn three_stage_query_shape() {
    let query = parse("search source=logs | where status=200 | stats count() by host").unwrap();
    let expected = Query {
        commands: vec![
            Command::Search(SearchCommand::From(FromClause {
                keyword: FromKeyword::Source,
                target: FromTarget::Tables(vec![TableSource::named("logs")]),
            })),
            Command::Where(WhereCommand {
                condition: compare("status", ComparisonOperator::Equal, 200),
            }),
            Command::Stats(StatsCommand {
                partitions: None,
                all_num: None,
                delim: None,
                aggregations: vec![AggregationTerm {
                    function: StatsFunction::CountAll,
                    alias: None,
                }],
                by: Some(StatsByClause::Fields(vec![QualifiedName::single("host")])),
                dedup_split_values: None,
            }),
        ],
    };
    assert_eq!(query, expected);
}

#[test]
fn search_keyword_is_optional() {
    assert_eq!(parse("source=logs").unwrap(), parse("search source=logs").unwrap());
}

#[test]
fn accessors_split_source_and_stages() {
    let query = parse("source=logs | head 1 | fields a").unwrap();
    assert!(query.source().is_some_and(Command::is_generating));
    assert_eq!(query.stages().len(), 2);
    assert!(!query.stages()[0].is_generating());
}

// ============ Precedence ============

#[test]
fn multiplicative_binds_tighter_than_additive() {
    let value = eval_value("source=t | eval x = a + b * 2");
    let expected = ValueExpr::binary(
        ValueExpr::field("a"),
        ArithmeticOperator::Add,
        ValueExpr::binary(
            ValueExpr::field("b"),
            ArithmeticOperator::Multiply,
            ValueExpr::int(2),
        ),
    );
    assert_eq!(value, Expression::Value(expected));
}

#[test]
fn juxtaposition_is_and() {
    let implicit = where_condition("source=t | where a>1 b<2");
    let explicit = where_condition("source=t | where a>1 AND b<2");
    assert_eq!(implicit, explicit);
    assert_eq!(
        explicit,
        LogicalExpr::and(
            compare("a", ComparisonOperator::Greater, 1),
            compare("b", ComparisonOperator::Less, 2),
        )
    );
}

#[test]
fn not_binds_tighter_than_binary_operators() {
    let condition = where_condition("source=t | where NOT a=1 OR b=2");
    let LogicalExpr::Binary { left, op, .. } = condition else {
        panic!("expected binary");
    };
    assert_eq!(op, LogicalOperator::Or);
    assert!(matches!(*left, LogicalExpr::Not(_)));
}

#[test]
fn xor_binds_loosest() {
    let condition = where_condition("source=t | where a=1 XOR b=2 AND c=3");
    let LogicalExpr::Binary { op, right, .. } = condition else {
        panic!("expected binary");
    };
    assert_eq!(op, LogicalOperator::Xor);
    assert!(matches!(
        *right,
        LogicalExpr::Binary {
            op: LogicalOperator::And,
            ..
        }
    ));
}

#[test]
fn leading_sign_is_part_of_literal() {
    let value = eval_value("source=t | eval x = -5");
    let expected = ValueExpr::Literal(Literal::Integer(IntegerLiteral {
        sign: Some(Sign::Minus),
        digits: "5".into(),
    }));
    assert_eq!(value, Expression::Value(expected));
}

#[test]
fn binary_minus_before_signed_literal() {
    let value = eval_value("source=t | eval x = a - -5");
    let Expression::Value(ValueExpr::BinaryArithmetic { op, right, .. }) = value else {
        panic!("expected arithmetic");
    };
    assert_eq!(op, ArithmeticOperator::Subtract);
    assert_eq!(*right, ValueExpr::int(-5));
}

#[test]
fn parenthesised_group_in_predicate_position() {
    let condition = where_condition("source=t | where (a + 1) * 2 > 3");
    let LogicalExpr::Comparison(ComparisonExpr::Compare { left, op, .. }) = condition else {
        panic!("expected comparison");
    };
    assert_eq!(op, ComparisonOperator::Greater);
    assert!(matches!(
        left,
        ValueExpr::BinaryArithmetic {
            op: ArithmeticOperator::Multiply,
            ..
        }
    ));

    let grouped = where_condition("source=t | where (a=1 OR b=2) c=3");
    assert!(matches!(
        grouped,
        LogicalExpr::Binary {
            op: LogicalOperator::And,
            ..
        }
    ));
}

// ============ Keywords as identifiers ============

#[test]
fn reserved_words_as_fields() {
    let Command::Fields(fields) = stage("source=t | fields count, max", 1) else {
        panic!("expected fields");
    };
    assert_eq!(
        fields.fields,
        vec![QualifiedName::single("count"), QualifiedName::single("max")]
    );
    assert_eq!(fields.mode, None);
}

#[test]
fn keyword_case_is_preserved_in_fields() {
    let Command::Fields(fields) = stage("source=t | fields Count", 1) else {
        panic!("expected fields");
    };
    assert_eq!(fields.fields[0].first().as_str(), "Count");
}

#[test]
fn bare_comparison_in_expression_position() {
    let value = eval_value("source=t | eval ok = a = 1");
    assert!(matches!(value, Expression::Comparison(_)));
}

// ============ Commands ============

#[test]
fn search_filter_before_and_after_source() {
    let Command::Search(after) = stage("search source=logs status=500", 0) else {
        panic!("expected search");
    };
    assert!(matches!(after, SearchCommand::FromFilter { .. }));

    let Command::Search(before) = stage("search status=500 source=logs", 0) else {
        panic!("expected search");
    };
    assert!(matches!(before, SearchCommand::FilterFrom { .. }));
    assert_eq!(after.filter(), before.filter());
    assert_eq!(after.from_clause(), before.from_clause());
}

#[test]
fn search_multiple_sources() {
    let Command::Search(search) = stage("source=remote:logs, metrics-2024.01.01, a.b", 0) else {
        panic!("expected search");
    };
    let FromTarget::Tables(tables) = &search.from_clause().target else {
        panic!("expected tables");
    };
    assert_eq!(
        tables,
        &vec![
            TableSource::Name {
                cluster: Some("remote".into()),
                name: QualifiedName::single("logs"),
            },
            TableSource::DateSuffixed("metrics-2024.01.01".into()),
            TableSource::Name {
                cluster: None,
                name: QualifiedName::dotted("a.b"),
            },
        ]
    );
}

#[test]
fn describe_and_show_datasources() {
    assert!(matches!(stage("describe logs", 0), Command::Describe(_)));
    assert_eq!(stage("show datasources", 0), Command::ShowDataSources);
}

#[test]
fn fields_with_mode() {
    let Command::Fields(fields) = stage("source=t | fields - a, b", 1) else {
        panic!("expected fields");
    };
    assert_eq!(fields.mode, Some(FieldsMode::Exclude));
    assert_eq!(fields.fields.len(), 2);
}

#[test]
fn rename_with_wildcards() {
    let Command::Rename(rename) = stage("source=t | rename host* AS server*, a AS b", 1) else {
        panic!("expected rename");
    };
    assert_eq!(rename.clauses.len(), 2);
    assert!(rename.clauses[0].original.is_pattern());
    assert!(!rename.clauses[1].renamed.is_pattern());
}

#[test]
fn stats_parameters_in_order() {
    let Command::Stats(stats) = stage(
        "source=t | stats partitions=2 allnum=true delim=',' avg(x) AS mean, dc(y) by a dedup_splitvalues=true",
        1,
    ) else {
        panic!("expected stats");
    };
    assert_eq!(stats.partitions, Some(IntegerLiteral::new(2)));
    assert_eq!(stats.all_num, Some(true));
    assert_eq!(stats.delim.as_deref(), Some(","));
    assert_eq!(stats.aggregations.len(), 2);
    assert_eq!(
        stats.aggregations[1].function,
        StatsFunction::DistinctCount(ValueExpr::field("y"))
    );
    assert_eq!(stats.dedup_split_values, Some(true));
}

#[test]
fn stats_parameters_out_of_order_fail() {
    for source in [
        "source=t | stats allnum=true partitions=2 count()",
        "source=t | stats delim=',' allnum=true count()",
        "source=t | stats count() partitions=2",
    ] {
        let diagnostics = parse(source).unwrap_err();
        assert!(
            matches!(diagnostics.first(), ParseError::Syntax(_)),
            "`{source}` should be a syntax error"
        );
    }
}

#[test]
fn stats_by_span_and_fields() {
    let Command::Stats(stats) = stage("source=t | stats count() by span(ts, 5m) AS bucket, host", 1) else {
        panic!("expected stats");
    };
    let by = stats.by.unwrap();
    let span = by.span().unwrap();
    assert_eq!(span.span.unit, Some(TimespanUnit::M));
    assert_eq!(span.alias, Some(QualifiedName::single("bucket")));
    assert_eq!(by.fields(), &[QualifiedName::single("host")]);
}

#[test]
fn dedup_sort_head() {
    let Command::Dedup(dedup) = stage("source=t | dedup 2 a keepempty=true", 1) else {
        panic!("expected dedup");
    };
    assert_eq!(dedup.count, Some(IntegerLiteral::new(2)));
    assert_eq!(dedup.keep_empty, Some(true));
    assert_eq!(dedup.consecutive, None);

    let Command::Sort(sort) = stage("source=t | sort - a, ip(b)", 1) else {
        panic!("expected sort");
    };
    assert_eq!(sort.fields[0].order, SortOrder::Descending);
    assert_eq!(sort.fields[1].cast, Some(SortCast::Ip));

    let Command::Head(head) = stage("source=t | head 10 from 20", 1) else {
        panic!("expected head");
    };
    assert_eq!(head.size, Some(IntegerLiteral::new(10)));
    assert_eq!(head.offset, Some(IntegerLiteral::new(20)));
    assert_eq!(
        stage("source=t | head", 1),
        Command::Head(HeadCommand {
            size: None,
            offset: None
        })
    );
}

#[test]
fn top_and_rare() {
    let Command::Top(top) = stage("source=t | top 3 a, b by c", 1) else {
        panic!("expected top");
    };
    assert_eq!(top.count, Some(IntegerLiteral::new(3)));
    assert_eq!(top.fields.len(), 2);
    assert_eq!(top.by, vec![QualifiedName::single("c")]);

    let Command::Rare(rare) = stage("source=t | rare a", 1) else {
        panic!("expected rare");
    };
    assert!(rare.by.is_empty());
}

#[test]
fn eval_multiple_clauses() {
    let Command::Eval(eval) = stage("source=t | eval a = 1, b = concat(x, 'y')", 1) else {
        panic!("expected eval");
    };
    assert_eq!(eval.clauses.len(), 2);
    let Expression::Value(ValueExpr::FunctionCall(call)) = &eval.clauses[1].value else {
        panic!("expected call");
    };
    assert_eq!(call.name, "concat");
    assert_eq!(call.args.len(), 2);
}

#[test]
fn text_extraction_commands() {
    let Command::Parse(parse_cmd) = stage(r"source=t | parse email '.+@(?<host>.+)'", 1) else {
        panic!("expected parse");
    };
    assert_eq!(parse_cmd.pattern, ".+@(?<host>.+)");

    let Command::Grok(grok) = stage("source=t | grok msg '%{IP:ip}'", 1) else {
        panic!("expected grok");
    };
    assert_eq!(grok.source, Expression::Value(ValueExpr::field("msg")));

    let Command::Patterns(patterns) = stage("source=t | patterns pattern='[0-9]' method=regex msg", 1)
    else {
        panic!("expected patterns");
    };
    assert_eq!(patterns.method, Some(PatternsMethod::Regex));
    assert_eq!(patterns.pattern.as_deref(), Some("[0-9]"));
}

#[test]
fn machine_learning_commands() {
    let Command::Kmeans(kmeans) = stage("source=t | kmeans iterations=5 centroids=3", 1) else {
        panic!("expected kmeans");
    };
    assert_eq!(kmeans.centroids, Some(IntegerLiteral::new(3)));
    assert_eq!(kmeans.iterations, Some(IntegerLiteral::new(5)));

    let Command::Ad(ad) = stage("source=t | ad time_field='ts' shingle_size=8", 1) else {
        panic!("expected ad");
    };
    assert_eq!(ad.time_field.as_deref(), Some("ts"));
    assert_eq!(ad.shingle_size, Some(IntegerLiteral::new(8)));

    let Command::Ml(ml) = stage("source=t | ml action='train' algorithm='rcf'", 1) else {
        panic!("expected ml");
    };
    assert_eq!(ml.arg("action"), Some(&Literal::string("train")));

    assert!(parse("source=t | kmeans centroids=3 centroids=4").is_err());
}

#[test]
fn relevance_predicates() {
    let condition = where_condition(
        "source=t | where match(message, 'timeout', operator='AND') OR query_string(['title' ^ 2], 'x')",
    );
    let LogicalExpr::Binary { left, right, .. } = condition else {
        panic!("expected binary");
    };
    let LogicalExpr::Relevance(RelevanceExpr::SingleField { function, args, .. }) = *left else {
        panic!("expected single field relevance");
    };
    assert_eq!(function, SingleFieldRelevance::Match);
    assert_eq!(args[0].name, "operator");
    assert!(matches!(
        *right,
        LogicalExpr::Relevance(RelevanceExpr::MultiField { .. })
    ));
}

#[test]
fn condition_function_as_predicate() {
    let condition = where_condition("source=t | where isnull(a) AND like(b, 'x%')");
    let LogicalExpr::Binary { left, right, .. } = condition else {
        panic!("expected binary");
    };
    assert!(matches!(*left, LogicalExpr::Boolean(_)));
    assert!(matches!(*right, LogicalExpr::Boolean(_)));
}

// ============ Round trip ============

#[test]
fn printed_queries_reparse_equal() {
    for source in [
        "search source=logs | where status=200 | stats count() by host",
        "source=t | where NOT (a=1 OR b=2) XOR c REGEXP 'x.*'",
        "source=t | eval x = (a + b) * -2, y = a % 3 / b",
        "source=t | where a IN (1, 2.5, 'three') | fields + `weird name`, `.hidden`",
        "source=t | eval d = DATE '2024-01-01', i = INTERVAL 2 HOUR, n = TIMESTAMP '2024-01-01 00:00:00'",
        "source=t | eval c = cast(a AS DOUBLE), e = extract(YEAR_MONTH FROM ts)",
        "source=t | rename `a``b` AS \"c*\" | top 1 a by b",
        "source=t | stats take(msg, 3) AS sample, percentile<99>(lat) by span(ts, 1d)",
        "source=t | where multi_match(['a', b ^ 1.5], 'q', fuzziness='AUTO')",
        "source=t | eval r = round(x, digits=2), f = if(a > 1 AND b < 2, 'y', 'n')",
        "source=t | patterns method=punct new_field='p' message",
        "source=prometheus.query_range('up', 1, 2, 10)",
    ] {
        assert_round_trip(source);
    }
}

#[test]
fn pretty_breaks_stages_onto_lines() {
    let query = parse("source=logs | where status=500 | stats count() by host | head 5").unwrap();
    let printed = ppl::pretty(&query, 20);
    assert_eq!(printed.lines().count(), query.commands.len());
    assert_eq!(parse(&printed).unwrap(), query);
}

// ============ Diagnostics ============

#[test]
fn missing_table_name_reports_eof() {
    let err = first_syntax_error("search source=");
    assert_eq!(err.found, TokenKind::Eof);
    assert_eq!(err.position, Position::new(14, 1, 15));
    assert!(err.expects(Expected::Token(TokenKind::Ident)));
    assert!(err.expects(Expected::KeywordAsIdentifier));
}

#[test]
fn error_position_on_later_line() {
    let err = first_syntax_error("source=logs\n| where a = ");
    assert_eq!(err.position.line, 2);
    assert_eq!(err.found, TokenKind::Eof);
}

#[test]
fn unexpected_token_is_reported() {
    let err = first_syntax_error("source=logs | fields a b");
    assert_eq!(err.found, TokenKind::Ident);
    assert_eq!(err.found_text, "b");
    assert!(err.expects(Expected::Token(TokenKind::Comma)));
    assert!(err.to_string().contains("expected one of"));
}

#[test]
fn lexical_errors_fail_the_query() {
    let diagnostics = parse("source=logs | where a = #").unwrap_err();
    assert!(matches!(diagnostics.first(), ParseError::Lexical { text, .. } if text == "#"));
}

#[test]
fn empty_input_is_an_error() {
    assert!(parse("").is_err());
    assert!(parse("   ").is_err());
}

// ============ Resource limits ============

fn nested_parens(depth: usize) -> String {
    format!("source=t | where {}a=1{}", "(".repeat(depth), ")".repeat(depth))
}

#[test]
fn depth_limit_is_a_resource_error() {
    let config = ParserConfig::new().with_max_depth(16);
    assert!(parse_with(&nested_parens(8), &config).is_ok());

    let diagnostics = parse_with(&nested_parens(40), &config).unwrap_err();
    assert!(matches!(
        diagnostics.first(),
        ParseError::StackLimitExceeded { limit: 16, .. }
    ));
    assert!(diagnostics.first().is_resource_limit());
}

#[test]
fn deep_nesting_within_limit_on_large_stack() {
    let handle = std::thread::Builder::new()
        .stack_size(256 * 1024 * 1024)
        .spawn(|| {
            let config = ParserConfig::new().with_max_depth(2_000);
            parse_with(&nested_parens(1_000), &config).map(|q| q.commands.len())
        })
        .unwrap();
    assert_eq!(handle.join().unwrap(), Ok(2));
}

#[test]
fn default_depth_limit_stops_adversarial_input() {
    let handle = std::thread::Builder::new()
        .stack_size(16 * 1024 * 1024)
        .spawn(|| parse(&nested_parens(10_000)))
        .unwrap();
    let diagnostics = handle.join().unwrap().unwrap_err();
    assert!(matches!(
        diagnostics.first(),
        ParseError::StackLimitExceeded { .. }
    ));
}

#[test]
fn operator_chain_limit() {
    let config = ParserConfig::new().with_max_chain(3);
    assert!(parse_with("source=t | eval x = a + b + c + d", &config).is_ok());
    // Each chain releases its budget, so siblings do not add up
    assert!(parse_with("source=t | eval x = a + b + c + d, y = a * b * c * d", &config).is_ok());
    assert!(parse_with("source=t | where a=1 b=2 c=3 d=4 | where a=1 OR b=2 OR c=3", &config).is_ok());

    let diagnostics = parse_with("source=t | eval x = a + b + c + d + e", &config).unwrap_err();
    assert_eq!(
        diagnostics.first(),
        &ParseError::StackLimitExceeded {
            position: Position::new(34, 1, 35),
            limit: 3,
        }
    );

    // Operators inside a nested operand stack on the enclosing chain
    assert!(parse_with("source=t | where a=1 b=2 (c=1 d=2 e=3)", &config).is_err());
}

#[test]
fn long_flat_chain_is_rejected_on_small_stack() {
    let handle = std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(|| {
            let sum = parse(&format!("source=t | eval x = {}", vec!["a"; 45_000].join(" + ")));
            let filter = parse(&format!("source=t | where {}", vec!["a=1"; 30_000].join(" ")));
            (sum.map(|_| ()), filter.map(|_| ()))
        })
        .unwrap();
    let (sum, filter) = handle.join().unwrap();
    for result in [sum, filter] {
        let diagnostics = result.unwrap_err();
        assert!(matches!(
            diagnostics.first(),
            ParseError::StackLimitExceeded { limit: DEFAULT_MAX_CHAIN, .. }
        ));
    }
}

#[test]
fn chain_at_default_limit_prints_walks_and_drops() {
    let handle = std::thread::Builder::new()
        .stack_size(8 * 1024 * 1024)
        .spawn(|| {
            // One more term than operators, so the chain uses the whole budget
            let terms = vec!["a"; DEFAULT_MAX_CHAIN + 1].join(" + ");
            let query = parse(&format!("source=t | eval x = {terms}")).unwrap();
            let mut counter = Counter::default();
            walk_query(&mut counter, &query);
            let reparsed = parse(&query.to_string()).unwrap();
            (counter.fields, reparsed == query)
        })
        .unwrap();
    // Every term plus the table and the assigned field
    assert_eq!(handle.join().unwrap(), (DEFAULT_MAX_CHAIN + 3, true));
}

#[test]
fn input_byte_limit() {
    let config = ParserConfig::new().with_max_input_bytes(10);
    let diagnostics = parse_with("source=logs | head 5", &config).unwrap_err();
    assert_eq!(
        diagnostics.first(),
        &ParseError::InputTooLarge {
            position: Position::new(0, 1, 1),
            size: 20,
            limit: 10,
            unit: "bytes",
        }
    );
}

#[test]
fn token_count_limit() {
    let config = ParserConfig::new().with_max_tokens(3);
    let diagnostics = parse_with("source=logs | head 5", &config).unwrap_err();
    let ParseError::InputTooLarge { position, unit, .. } = diagnostics.first() else {
        panic!("expected input too large");
    };
    assert_eq!(*unit, "tokens");
    assert_eq!(*position, Position::new(12, 1, 13));
}

// ============ Recovery ============

#[test]
fn recovery_keeps_good_stages() {
    let output = parse_with_recovery(
        "source=logs | stats | where a=1 | head x | fields b",
        &ParserConfig::default(),
    );
    assert_eq!(output.errors.len(), 2);
    let query = output.query.clone().unwrap();
    let names: Vec<&str> = query.commands.iter().map(Command::name).collect();
    assert_eq!(names, vec!["search", "where", "fields"]);
    assert!(!output.is_ok());
    assert!(output.into_result().is_err());
}

#[test]
fn recovery_without_generating_command() {
    let output = parse_with_recovery("| head 5", &ParserConfig::default());
    assert!(output.query.is_none());
    assert!(!output.errors.is_empty());
}

#[test]
fn recovery_of_clean_query_matches_parse() {
    let source = "source=logs | head 5";
    let output = parse_with_recovery(source, &ParserConfig::default());
    assert!(output.is_ok());
    assert_eq!(output.into_result(), parse(source));
}

// ============ Tokens and concurrency ============

#[test]
fn parse_from_tokens() {
    let tokens = tokenize("source=logs | head 5");
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    let query = parse_tokens(&tokens, &ParserConfig::default()).unwrap();
    assert_eq!(query, parse("source=logs | head 5").unwrap());
}

#[test]
fn concurrent_parses_share_grammar_tables() {
    let sources = [
        "source=a | where x=1",
        "source=b | stats count() by y",
        "source=c | fields count, max",
        "source=d | eval z = abs(-1)",
    ];
    std::thread::scope(|scope| {
        let handles: Vec<_> = sources
            .iter()
            .map(|source| scope.spawn(move || parse(source)))
            .collect();
        for handle in handles {
            let result: Result<Query, Diagnostics> = handle.join().unwrap();
            assert!(result.is_ok());
        }
    });
}

// ============ Visitor ============

#[derive(Default)]
struct Counter {
    commands: usize,
    literals: usize,
    fields: usize,
    calls: Vec<String>,
    tables: Vec<String>,
    numbers: Vec<String>,
}

impl Visitor for Counter {
    fn enter_command(&mut self, _: &Command) {
        self.commands += 1;
    }

    fn enter_qualified_name(&mut self, _: &QualifiedName) {
        self.fields += 1;
    }

    fn enter_table_source(&mut self, table: &TableSource) {
        self.tables.push(match table {
            TableSource::Name {
                cluster: Some(cluster),
                name,
            } => format!("{cluster}:{name}"),
            TableSource::Name { name, .. } => name.to_string(),
            TableSource::DateSuffixed(name) => name.clone(),
        });
    }

    fn enter_integer_literal(&mut self, integer: &IntegerLiteral) {
        self.numbers.push(integer.to_string());
    }

    fn enter_decimal_literal(&mut self, decimal: &DecimalLiteral) {
        self.numbers.push(decimal.to_string());
    }

    fn enter_literal(&mut self, _: &Literal) {
        self.literals += 1;
    }

    fn enter_function_call(&mut self, call: &FunctionCall) {
        self.calls.push(call.name.clone());
    }
}

#[test]
fn visitor_sees_every_node() {
    let query = parse("source=t | where a=1 OR b=2 | eval c = upper(lower(d)) | head 5").unwrap();
    let mut counter = Counter::default();
    walk_query(&mut counter, &query);
    assert_eq!(counter.commands, 4);
    // `head 5` holds a bare count, not a literal expression
    assert_eq!(counter.literals, 2);
    assert_eq!(counter.calls, vec!["upper", "lower"]);
    assert_eq!(counter.numbers, vec!["1", "2", "5"]);
}

#[test]
fn visitor_sees_tables_and_parameters() {
    let query = parse(
        "source=remote:web, logs-2021.01.11 | head 5 from 2 | top 3 host \
         | stats percentile<95>(latency) | kmeans centroids=4 | ad number_of_trees=10 time_decay=0.5",
    )
    .unwrap();
    let mut counter = Counter::default();
    walk_query(&mut counter, &query);
    assert_eq!(counter.tables, vec!["remote:web", "logs-2021.01.11"]);
    assert_eq!(counter.numbers, vec!["5", "2", "3", "95", "4", "10", "0.5"]);
}
