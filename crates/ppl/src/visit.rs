//! Depth-first traversal of a parsed query
//!
//! Implement [`Visitor`], override the hooks of interest and hand the query to
//! [`walk_query`]. Every `enter_*` hook runs before the node's children are
//! visited and the matching `exit_*` hook after them.
//!
//! ```
//! use ppl::ast::QualifiedName;
//! use ppl::{Visitor, parse, walk_query};
//!
//! #[derive(Default)]
//! struct Fields(Vec<String>);
//!
//! impl Visitor for Fields {
//!     fn enter_qualified_name(&mut self, name: &QualifiedName) {
//!         self.0.push(name.to_string());
//!     }
//! }
//!
//! let query = parse("source=logs | where status = 500 | fields host").unwrap();
//! let mut fields = Fields::default();
//! walk_query(&mut fields, &query);
//! assert_eq!(fields.0, vec!["logs", "status", "host"]);
//! ```

use crate::ast::*;

macro_rules! hooks {
    ($($enter:ident, $exit:ident: $node:ty;)*) => {
        $(
            fn $enter(&mut self, _node: &$node) {}
            fn $exit(&mut self, _node: &$node) {}
        )*
    };
}

/// Enter/exit hook pairs, all no-ops by default
pub trait Visitor {
    hooks! {
        enter_query, exit_query: Query;
        enter_command, exit_command: Command;
        enter_from_clause, exit_from_clause: FromClause;
        enter_table_source, exit_table_source: TableSource;
        enter_logical_expr, exit_logical_expr: LogicalExpr;
        enter_comparison_expr, exit_comparison_expr: ComparisonExpr;
        enter_value_expr, exit_value_expr: ValueExpr;
        enter_function_call, exit_function_call: FunctionCall;
        enter_function_arg, exit_function_arg: FunctionArg;
        enter_relevance_expr, exit_relevance_expr: RelevanceExpr;
        enter_weighted_field, exit_weighted_field: WeightedField;
        enter_literal, exit_literal: Literal;
        enter_integer_literal, exit_integer_literal: IntegerLiteral;
        enter_decimal_literal, exit_decimal_literal: DecimalLiteral;
        enter_qualified_name, exit_qualified_name: QualifiedName;
        enter_wildcard_name, exit_wildcard_name: WildcardQualifiedName;
        enter_aggregation_term, exit_aggregation_term: AggregationTerm;
        enter_sort_field, exit_sort_field: SortField;
        enter_eval_clause, exit_eval_clause: EvalClause;
        enter_rename_clause, exit_rename_clause: RenameClause;
        enter_by_span, exit_by_span: BySpan;
        enter_span_clause, exit_span_clause: SpanClause;
    }
}

pub fn walk_query<V: Visitor + ?Sized>(visitor: &mut V, query: &Query) {
    visitor.enter_query(query);
    for command in &query.commands {
        walk_command(visitor, command);
    }
    visitor.exit_query(query);
}

pub fn walk_command<V: Visitor + ?Sized>(visitor: &mut V, command: &Command) {
    visitor.enter_command(command);
    match command {
        Command::Search(search) => match search {
            SearchCommand::From(from) => walk_from_clause(visitor, from),
            SearchCommand::FromFilter { from, filter } => {
                walk_from_clause(visitor, from);
                walk_logical_expr(visitor, filter);
            }
            SearchCommand::FilterFrom { filter, from } => {
                walk_logical_expr(visitor, filter);
                walk_from_clause(visitor, from);
            }
        },
        Command::Describe(describe) => walk_tables(visitor, &describe.tables),
        Command::ShowDataSources => {}
        Command::Where(w) => walk_logical_expr(visitor, &w.condition),
        Command::Fields(fields) => walk_names(visitor, &fields.fields),
        Command::Rename(rename) => {
            for clause in &rename.clauses {
                visitor.enter_rename_clause(clause);
                walk_wildcard_name(visitor, &clause.original);
                walk_wildcard_name(visitor, &clause.renamed);
                visitor.exit_rename_clause(clause);
            }
        }
        Command::Stats(stats) => walk_stats(visitor, stats),
        Command::Dedup(dedup) => {
            walk_integer(visitor, &dedup.count);
            walk_names(visitor, &dedup.fields);
        }
        Command::Sort(sort) => {
            for field in &sort.fields {
                visitor.enter_sort_field(field);
                walk_qualified_name(visitor, &field.field);
                visitor.exit_sort_field(field);
            }
        }
        Command::Eval(eval) => {
            for clause in &eval.clauses {
                visitor.enter_eval_clause(clause);
                walk_qualified_name(visitor, &clause.field);
                walk_expression(visitor, &clause.value);
                visitor.exit_eval_clause(clause);
            }
        }
        Command::Head(head) => {
            walk_integer(visitor, &head.size);
            walk_integer(visitor, &head.offset);
        }
        Command::Top(top) => {
            walk_integer(visitor, &top.count);
            walk_names(visitor, &top.fields);
            walk_names(visitor, &top.by);
        }
        Command::Rare(rare) => {
            walk_names(visitor, &rare.fields);
            walk_names(visitor, &rare.by);
        }
        Command::Grok(grok) => walk_expression(visitor, &grok.source),
        Command::Parse(parse) => walk_expression(visitor, &parse.source),
        Command::Patterns(patterns) => walk_expression(visitor, &patterns.source),
        Command::Kmeans(kmeans) => {
            walk_integer(visitor, &kmeans.centroids);
            walk_integer(visitor, &kmeans.iterations);
        }
        Command::Ad(ad) => {
            for count in [
                &ad.number_of_trees,
                &ad.shingle_size,
                &ad.sample_size,
                &ad.output_after,
                &ad.training_data_size,
            ] {
                walk_integer(visitor, count);
            }
            for rate in [&ad.time_decay, &ad.anomaly_rate, &ad.anomaly_score_threshold] {
                walk_decimal(visitor, rate);
            }
        }
        Command::Ml(ml) => {
            for value in ml.args.values() {
                walk_literal(visitor, value);
            }
        }
    }
    visitor.exit_command(command);
}

pub fn walk_from_clause<V: Visitor + ?Sized>(visitor: &mut V, from: &FromClause) {
    visitor.enter_from_clause(from);
    match &from.target {
        FromTarget::Tables(tables) => walk_tables(visitor, tables),
        FromTarget::Function { name, args } => {
            walk_qualified_name(visitor, name);
            walk_args(visitor, args);
        }
    }
    visitor.exit_from_clause(from);
}

fn walk_tables<V: Visitor + ?Sized>(visitor: &mut V, tables: &[TableSource]) {
    for table in tables {
        walk_table_source(visitor, table);
    }
}

/// The cluster prefix and date-suffixed index names are only visible
/// through the table hooks
pub fn walk_table_source<V: Visitor + ?Sized>(visitor: &mut V, table: &TableSource) {
    visitor.enter_table_source(table);
    if let TableSource::Name { name, .. } = table {
        walk_qualified_name(visitor, name);
    }
    visitor.exit_table_source(table);
}

fn walk_names<V: Visitor + ?Sized>(visitor: &mut V, names: &[QualifiedName]) {
    for name in names {
        walk_qualified_name(visitor, name);
    }
}

fn walk_stats<V: Visitor + ?Sized>(visitor: &mut V, stats: &StatsCommand) {
    walk_integer(visitor, &stats.partitions);
    for term in &stats.aggregations {
        visitor.enter_aggregation_term(term);
        match &term.function {
            StatsFunction::Call { arg, .. } | StatsFunction::DistinctCount(arg) => {
                walk_value_expr(visitor, arg);
            }
            StatsFunction::CountAll => {}
            StatsFunction::Percentile { percent, field } => {
                walk_integer_literal(visitor, percent);
                walk_qualified_name(visitor, field);
            }
            StatsFunction::Take { field, size } => {
                walk_qualified_name(visitor, field);
                walk_integer(visitor, size);
            }
        }
        if let Some(alias) = &term.alias {
            walk_wildcard_name(visitor, alias);
        }
        visitor.exit_aggregation_term(term);
    }

    let Some(by) = &stats.by else {
        return;
    };
    if let Some(by_span) = by.span() {
        visitor.enter_by_span(by_span);
        let span = &by_span.span;
        visitor.enter_span_clause(span);
        walk_qualified_name(visitor, &span.field);
        walk_literal(visitor, &span.value);
        visitor.exit_span_clause(span);
        if let Some(alias) = &by_span.alias {
            walk_qualified_name(visitor, alias);
        }
        visitor.exit_by_span(by_span);
    }
    walk_names(visitor, by.fields());
}

pub fn walk_expression<V: Visitor + ?Sized>(visitor: &mut V, expression: &Expression) {
    match expression {
        Expression::Logical(logical) => walk_logical_expr(visitor, logical),
        Expression::Comparison(comparison) => walk_comparison_expr(visitor, comparison),
        Expression::Value(value) => walk_value_expr(visitor, value),
    }
}

pub fn walk_logical_expr<V: Visitor + ?Sized>(visitor: &mut V, logical: &LogicalExpr) {
    visitor.enter_logical_expr(logical);
    match logical {
        LogicalExpr::Binary { left, right, .. } => {
            walk_logical_expr(visitor, left);
            walk_logical_expr(visitor, right);
        }
        LogicalExpr::Not(operand) => walk_logical_expr(visitor, operand),
        LogicalExpr::Comparison(comparison) => walk_comparison_expr(visitor, comparison),
        LogicalExpr::Relevance(relevance) => walk_relevance_expr(visitor, relevance),
        LogicalExpr::Boolean(call) => walk_function_call(visitor, call),
    }
    visitor.exit_logical_expr(logical);
}

pub fn walk_comparison_expr<V: Visitor + ?Sized>(visitor: &mut V, comparison: &ComparisonExpr) {
    visitor.enter_comparison_expr(comparison);
    match comparison {
        ComparisonExpr::Compare { left, right, .. } => {
            walk_value_expr(visitor, left);
            walk_value_expr(visitor, right);
        }
        ComparisonExpr::In { value, list } => {
            walk_value_expr(visitor, value);
            for literal in list {
                walk_literal(visitor, literal);
            }
        }
    }
    visitor.exit_comparison_expr(comparison);
}

pub fn walk_value_expr<V: Visitor + ?Sized>(visitor: &mut V, value: &ValueExpr) {
    visitor.enter_value_expr(value);
    match value {
        ValueExpr::BinaryArithmetic { left, right, .. } => {
            walk_value_expr(visitor, left);
            walk_value_expr(visitor, right);
        }
        ValueExpr::FunctionCall(call) => walk_function_call(visitor, call),
        ValueExpr::Cast { expr, .. } => walk_expression(visitor, expr),
        ValueExpr::Literal(literal) => walk_literal(visitor, literal),
        ValueExpr::Field(name) => walk_qualified_name(visitor, name),
        ValueExpr::Parenthesized(inner) => walk_value_expr(visitor, inner),
        ValueExpr::Position { substring, string } => {
            walk_value_expr(visitor, substring);
            walk_value_expr(visitor, string);
        }
        ValueExpr::Extract { arg, .. } | ValueExpr::GetFormat { arg, .. } => {
            walk_value_expr(visitor, arg);
        }
        ValueExpr::Timestamp { first, second, .. } => {
            walk_value_expr(visitor, first);
            walk_value_expr(visitor, second);
        }
    }
    visitor.exit_value_expr(value);
}

pub fn walk_function_call<V: Visitor + ?Sized>(visitor: &mut V, call: &FunctionCall) {
    visitor.enter_function_call(call);
    walk_args(visitor, &call.args);
    visitor.exit_function_call(call);
}

fn walk_args<V: Visitor + ?Sized>(visitor: &mut V, args: &[FunctionArg]) {
    for arg in args {
        visitor.enter_function_arg(arg);
        walk_expression(visitor, &arg.value);
        visitor.exit_function_arg(arg);
    }
}

pub fn walk_relevance_expr<V: Visitor + ?Sized>(visitor: &mut V, relevance: &RelevanceExpr) {
    visitor.enter_relevance_expr(relevance);
    let (query, args) = match relevance {
        RelevanceExpr::SingleField {
            field, query, args, ..
        } => {
            walk_relevance_field(visitor, field);
            (query, args)
        }
        RelevanceExpr::MultiField {
            fields,
            query,
            args,
            ..
        } => {
            for weighted in fields {
                visitor.enter_weighted_field(weighted);
                walk_relevance_field(visitor, &weighted.field);
                if let Some(weight) = &weighted.weight {
                    walk_literal(visitor, weight);
                }
                visitor.exit_weighted_field(weighted);
            }
            (query, args)
        }
    };
    walk_relevance_value(visitor, query);
    for arg in args {
        walk_relevance_value(visitor, &arg.value);
    }
    visitor.exit_relevance_expr(relevance);
}

fn walk_relevance_field<V: Visitor + ?Sized>(visitor: &mut V, field: &RelevanceField) {
    if let RelevanceField::Name(name) = field {
        walk_qualified_name(visitor, name);
    }
}

fn walk_relevance_value<V: Visitor + ?Sized>(visitor: &mut V, value: &RelevanceValue) {
    match value {
        RelevanceValue::Name(name) => walk_qualified_name(visitor, name),
        RelevanceValue::Literal(literal) => walk_literal(visitor, literal),
    }
}

pub fn walk_literal<V: Visitor + ?Sized>(visitor: &mut V, literal: &Literal) {
    visitor.enter_literal(literal);
    match literal {
        Literal::Integer(integer) => walk_integer_literal(visitor, integer),
        Literal::Decimal(decimal) => walk_decimal_literal(visitor, decimal),
        Literal::Interval { value, .. } => walk_value_expr(visitor, value),
        _ => {}
    }
    visitor.exit_literal(literal);
}

pub fn walk_integer_literal<V: Visitor + ?Sized>(visitor: &mut V, integer: &IntegerLiteral) {
    visitor.enter_integer_literal(integer);
    visitor.exit_integer_literal(integer);
}

pub fn walk_decimal_literal<V: Visitor + ?Sized>(visitor: &mut V, decimal: &DecimalLiteral) {
    visitor.enter_decimal_literal(decimal);
    visitor.exit_decimal_literal(decimal);
}

// Command parameters hold bare numbers rather than literal expressions

fn walk_integer<V: Visitor + ?Sized>(visitor: &mut V, integer: &Option<IntegerLiteral>) {
    if let Some(integer) = integer {
        walk_integer_literal(visitor, integer);
    }
}

fn walk_decimal<V: Visitor + ?Sized>(visitor: &mut V, decimal: &Option<DecimalLiteral>) {
    if let Some(decimal) = decimal {
        walk_decimal_literal(visitor, decimal);
    }
}

pub fn walk_qualified_name<V: Visitor + ?Sized>(visitor: &mut V, name: &QualifiedName) {
    visitor.enter_qualified_name(name);
    visitor.exit_qualified_name(name);
}

pub fn walk_wildcard_name<V: Visitor + ?Sized>(visitor: &mut V, name: &WildcardQualifiedName) {
    visitor.enter_wildcard_name(name);
    visitor.exit_wildcard_name(name);
}
