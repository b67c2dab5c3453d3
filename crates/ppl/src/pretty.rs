//! Pretty printing for PPL queries
//!
//! Provides both single-line (`Display`) and width-aware multi-line formatting
//! that puts each pipeline stage on its own line. Printed text parses back to
//! an equal tree: identifiers that would not lex as identifiers are
//! backtick-quoted, and sub-expressions are parenthesised by precedence.

use std::fmt::{self, Display};

use crate::ast::*;
use crate::keyword::{Keyword, grammar};
use crate::lexer::is_plain_identifier;

// ============ Names and literals ============

impl Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.as_str();
        if needs_backticks(name) {
            write!(f, "`{}`", name.replace('`', "``"))
        } else {
            f.write_str(name)
        }
    }
}

fn needs_backticks(name: &str) -> bool {
    if is_plain_identifier(name) {
        return false;
    }
    match Keyword::lookup(name) {
        Some(keyword) => !grammar().can_be_ident(keyword),
        None => true,
    }
}

impl Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_separated(f, self.parts(), ".")
    }
}

impl Display for Wildcard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Wildcard::Pattern(text) => f.write_str(text),
            Wildcard::Quoted { style, inner } => {
                let q = style.quote_char();
                let inner = inner.to_string();
                let doubled: String = [q, q].iter().collect();
                write!(f, "{q}{}{q}", inner.replace(q, &doubled))
            }
        }
    }
}

impl Display for WildcardQualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_separated(f, self.parts(), ".")
    }
}

impl Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sign::Plus => "+",
            Sign::Minus => "-",
        })
    }
}

impl Display for IntegerLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sign) = self.sign {
            write!(f, "{sign}")?;
        }
        f.write_str(&self.digits)
    }
}

impl Display for DecimalLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(sign) = self.sign {
            write!(f, "{sign}")?;
        }
        f.write_str(&self.digits)
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(n) => write!(f, "{n}"),
            Literal::Decimal(n) => write!(f, "{n}"),
            Literal::String(s) => write_string(f, s),
            Literal::Boolean(b) => write!(f, "{b}"),
            Literal::Interval { value, unit } => write!(f, "INTERVAL {value} {unit}"),
            Literal::Date(s) => {
                f.write_str("DATE ")?;
                write_string(f, s)
            }
            Literal::Time(s) => {
                f.write_str("TIME ")?;
                write_string(f, s)
            }
            Literal::Timestamp(s) => {
                f.write_str("TIMESTAMP ")?;
                write_string(f, s)
            }
        }
    }
}

/// Quote `s` so that the lexer reads it back unchanged.
///
/// Backslash pairs are kept verbatim by the lexer, so the quote character
/// is picked such that no pair ends in it; the quote itself is doubled.
fn write_string(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    let quote = if survives_quote(s, '"') { '"' } else { '\'' };
    let doubled: String = [quote, quote].iter().collect();
    write!(f, "{quote}{}{quote}", s.replace(quote, &doubled))
}

fn survives_quote(s: &str, quote: char) -> bool {
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) if next != quote => {}
                _ => return false,
            }
        }
    }
    true
}

// ============ Operators ============

impl Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogicalOperator::And => "AND",
            LogicalOperator::Or => "OR",
            LogicalOperator::Xor => "XOR",
        })
    }
}

impl Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ComparisonOperator::Equal => "=",
            ComparisonOperator::NotEqual => "!=",
            ComparisonOperator::Less => "<",
            ComparisonOperator::NotGreater => "<=",
            ComparisonOperator::Greater => ">",
            ComparisonOperator::NotLess => ">=",
            ComparisonOperator::Regexp => "REGEXP",
        })
    }
}

impl Display for ArithmeticOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ArithmeticOperator::Add => "+",
            ArithmeticOperator::Subtract => "-",
            ArithmeticOperator::Multiply => "*",
            ArithmeticOperator::Divide => "/",
            ArithmeticOperator::Modulo => "%",
        })
    }
}

// ============ Expressions ============

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Logical(logical) => write!(f, "{logical}"),
            Expression::Comparison(comparison) => write!(f, "{comparison}"),
            Expression::Value(value) => write!(f, "{value}"),
        }
    }
}

impl Display for LogicalExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalExpr::Binary { left, op, right } => {
                let bp = op.binding_power();
                // Left-associative: an equal-power right operand needs parens
                write_logical(f, left, logical_power(left) < bp)?;
                write!(f, " {op} ")?;
                write_logical(f, right, logical_power(right) <= bp)
            }
            LogicalExpr::Not(operand) => {
                f.write_str("NOT ")?;
                write_logical(f, operand, logical_power(operand) < NOT_BINDING_POWER)
            }
            LogicalExpr::Comparison(comparison) => write!(f, "{comparison}"),
            LogicalExpr::Relevance(relevance) => write!(f, "{relevance}"),
            LogicalExpr::Boolean(call) => write!(f, "{call}"),
        }
    }
}

/// Binding power of the outermost operator; leaves never need parens
fn logical_power(expr: &LogicalExpr) -> u8 {
    match expr {
        LogicalExpr::Binary { op, .. } => op.binding_power(),
        _ => u8::MAX,
    }
}

fn write_logical(f: &mut fmt::Formatter<'_>, expr: &LogicalExpr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

impl Display for ComparisonExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComparisonExpr::Compare { left, op, right } => write!(f, "{left} {op} {right}"),
            ComparisonExpr::In { value, list } => {
                write!(f, "{value} IN (")?;
                write_separated(f, list, ", ")?;
                f.write_str(")")
            }
        }
    }
}

impl Display for ValueExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueExpr::BinaryArithmetic { left, op, right } => {
                let bp = op.binding_power();
                write_value(f, left, arithmetic_power(left) < bp)?;
                write!(f, " {op} ")?;
                write_value(f, right, arithmetic_power(right) <= bp)
            }
            ValueExpr::FunctionCall(call) => write!(f, "{call}"),
            ValueExpr::Cast { expr, data_type } => write!(f, "CAST({expr} AS {data_type})"),
            ValueExpr::Literal(literal) => write!(f, "{literal}"),
            ValueExpr::Field(name) => write!(f, "{name}"),
            ValueExpr::Parenthesized(inner) => write!(f, "({inner})"),
            ValueExpr::Position { substring, string } => {
                write!(f, "POSITION({substring} IN {string})")
            }
            ValueExpr::Extract { part, arg } => write!(f, "EXTRACT({part} FROM {arg})"),
            ValueExpr::Timestamp {
                function,
                unit,
                first,
                second,
            } => write!(f, "{function}({unit}, {first}, {second})"),
            ValueExpr::GetFormat { format_type, arg } => {
                write!(f, "GET_FORMAT({format_type}, {arg})")
            }
        }
    }
}

fn arithmetic_power(expr: &ValueExpr) -> u8 {
    match expr {
        ValueExpr::BinaryArithmetic { op, .. } => op.binding_power(),
        _ => u8::MAX,
    }
}

fn write_value(f: &mut fmt::Formatter<'_>, expr: &ValueExpr, parens: bool) -> fmt::Result {
    if parens {
        write!(f, "({expr})")
    } else {
        write!(f, "{expr}")
    }
}

impl Display for FunctionCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        write_separated(f, &self.args, ", ")?;
        f.write_str(")")
    }
}

impl Display for FunctionArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{name}={}", self.value),
            // `a = 1` alone would read back as a named argument
            None if is_assignment(&self.value) => write!(f, "({})", self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

fn is_assignment(expr: &Expression) -> bool {
    let comparison = match expr {
        Expression::Comparison(comparison)
        | Expression::Logical(LogicalExpr::Comparison(comparison)) => comparison,
        _ => return false,
    };
    matches!(
        comparison,
        ComparisonExpr::Compare {
            left: ValueExpr::Field(name),
            op: ComparisonOperator::Equal,
            ..
        } if name.parts().len() == 1
    )
}

impl Display for RelevanceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (query, args) = match self {
            RelevanceExpr::SingleField {
                function,
                field,
                query,
                args,
            } => {
                write!(f, "{}({field}, ", function.keyword().canonical_name())?;
                (query, args)
            }
            RelevanceExpr::MultiField {
                function,
                fields,
                query,
                args,
            } => {
                write!(f, "{}([", function.keyword().canonical_name())?;
                write_separated(f, fields, ", ")?;
                f.write_str("], ")?;
                (query, args)
            }
        };
        write!(f, "{query}")?;
        for arg in args {
            write!(f, ", {arg}")?;
        }
        f.write_str(")")
    }
}

impl Display for RelevanceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelevanceField::Name(name) => write!(f, "{name}"),
            RelevanceField::Quoted(text) => write_string(f, text),
        }
    }
}

impl Display for WeightedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.field)?;
        if let Some(weight) = &self.weight {
            write!(f, " ^ {weight}")?;
        }
        Ok(())
    }
}

impl Display for RelevanceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelevanceValue::Name(name) => write!(f, "{name}"),
            RelevanceValue::Literal(literal) => write!(f, "{literal}"),
        }
    }
}

impl Display for RelevanceArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

// ============ Commands ============

impl Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_separated(f, &self.commands, " | ")
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Search(search) => write!(f, "{search}"),
            Command::Describe(describe) => {
                f.write_str("describe ")?;
                write_separated(f, &describe.tables, ", ")
            }
            Command::ShowDataSources => f.write_str("show datasources"),
            Command::Where(w) => write!(f, "where {}", w.condition),
            Command::Fields(fields) => {
                f.write_str("fields ")?;
                match fields.mode {
                    Some(FieldsMode::Include) => f.write_str("+ ")?,
                    Some(FieldsMode::Exclude) => f.write_str("- ")?,
                    None => {}
                }
                write_separated(f, &fields.fields, ", ")
            }
            Command::Rename(rename) => {
                f.write_str("rename ")?;
                write_separated(f, &rename.clauses, ", ")
            }
            Command::Stats(stats) => write!(f, "{stats}"),
            Command::Dedup(dedup) => {
                f.write_str("dedup ")?;
                if let Some(count) = &dedup.count {
                    write!(f, "{count} ")?;
                }
                write_separated(f, &dedup.fields, ", ")?;
                if let Some(keep_empty) = dedup.keep_empty {
                    write!(f, " keepempty={keep_empty}")?;
                }
                if let Some(consecutive) = dedup.consecutive {
                    write!(f, " consecutive={consecutive}")?;
                }
                Ok(())
            }
            Command::Sort(sort) => {
                f.write_str("sort ")?;
                write_separated(f, &sort.fields, ", ")
            }
            Command::Eval(eval) => {
                f.write_str("eval ")?;
                write_separated(f, &eval.clauses, ", ")
            }
            Command::Head(head) => {
                f.write_str("head")?;
                if let Some(size) = &head.size {
                    write!(f, " {size}")?;
                }
                if let Some(offset) = &head.offset {
                    write!(f, " from {offset}")?;
                }
                Ok(())
            }
            Command::Top(top) => {
                f.write_str("top ")?;
                if let Some(count) = &top.count {
                    write!(f, "{count} ")?;
                }
                write_separated(f, &top.fields, ", ")?;
                write_by(f, &top.by)
            }
            Command::Rare(rare) => {
                f.write_str("rare ")?;
                write_separated(f, &rare.fields, ", ")?;
                write_by(f, &rare.by)
            }
            Command::Grok(grok) => {
                write!(f, "grok {} ", grok.source)?;
                write_string(f, &grok.pattern)
            }
            Command::Parse(parse) => {
                write!(f, "parse {} ", parse.source)?;
                write_string(f, &parse.pattern)
            }
            Command::Patterns(patterns) => {
                f.write_str("patterns ")?;
                if let Some(new_field) = &patterns.new_field {
                    f.write_str("new_field=")?;
                    write_string(f, new_field)?;
                    f.write_str(" ")?;
                }
                if let Some(pattern) = &patterns.pattern {
                    f.write_str("pattern=")?;
                    write_string(f, pattern)?;
                    f.write_str(" ")?;
                }
                if let Some(method) = patterns.method {
                    write!(f, "method={} ", method.keyword().canonical_name())?;
                }
                write!(f, "{}", patterns.source)
            }
            Command::Kmeans(kmeans) => {
                f.write_str("kmeans")?;
                if let Some(centroids) = &kmeans.centroids {
                    write!(f, " centroids={centroids}")?;
                }
                if let Some(iterations) = &kmeans.iterations {
                    write!(f, " iterations={iterations}")?;
                }
                if let Some(distance_type) = &kmeans.distance_type {
                    f.write_str(" distance_type=")?;
                    write_string(f, distance_type)?;
                }
                Ok(())
            }
            Command::Ad(ad) => write!(f, "{ad}"),
            Command::Ml(ml) => {
                f.write_str("ml")?;
                for (name, value) in &ml.args {
                    write!(f, " {}={value}", Ident::new(name.as_str()))?;
                }
                Ok(())
            }
        }
    }
}

impl Display for SearchCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchCommand::From(from) => write!(f, "search {from}"),
            SearchCommand::FromFilter { from, filter } => write!(f, "search {from} {filter}"),
            SearchCommand::FilterFrom { filter, from } => write!(f, "search {filter} {from}"),
        }
    }
}

impl Display for FromClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.keyword.keyword().canonical_name())?;
        match &self.target {
            FromTarget::Tables(tables) => write_separated(f, tables, ", "),
            FromTarget::Function { name, args } => {
                write!(f, "{name}(")?;
                write_separated(f, args, ", ")?;
                f.write_str(")")
            }
        }
    }
}

impl Display for TableSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableSource::Name { cluster, name } => {
                if let Some(cluster) = cluster {
                    write!(f, "{cluster}:")?;
                }
                write!(f, "{name}")
            }
            TableSource::DateSuffixed(text) => f.write_str(text),
        }
    }
}

impl Display for RenameClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} AS {}", self.original, self.renamed)
    }
}

impl Display for StatsCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("stats ")?;
        if let Some(partitions) = &self.partitions {
            write!(f, "partitions={partitions} ")?;
        }
        if let Some(all_num) = self.all_num {
            write!(f, "allnum={all_num} ")?;
        }
        if let Some(delim) = &self.delim {
            f.write_str("delim=")?;
            write_string(f, delim)?;
            f.write_str(" ")?;
        }
        write_separated(f, &self.aggregations, ", ")?;
        match &self.by {
            Some(StatsByClause::Fields(fields)) => {
                f.write_str(" by ")?;
                write_separated(f, fields, ", ")?;
            }
            Some(StatsByClause::Span(span)) => write!(f, " by {span}")?,
            Some(StatsByClause::SpanAndFields(span, fields)) => {
                write!(f, " by {span}, ")?;
                write_separated(f, fields, ", ")?;
            }
            None => {}
        }
        if let Some(dedup) = self.dedup_split_values {
            write!(f, " dedup_splitvalues={dedup}")?;
        }
        Ok(())
    }
}

impl Display for AggregationTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.function {
            StatsFunction::Call { function, arg } => {
                write!(f, "{}({arg})", function.keyword().canonical_name())?
            }
            StatsFunction::CountAll => f.write_str("count()")?,
            StatsFunction::DistinctCount(arg) => write!(f, "distinct_count({arg})")?,
            StatsFunction::Percentile { percent, field } => {
                write!(f, "percentile<{percent}>({field})")?
            }
            StatsFunction::Take { field, size } => {
                write!(f, "take({field}")?;
                if let Some(size) = size {
                    write!(f, ", {size}")?;
                }
                f.write_str(")")?;
            }
        }
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

impl Display for BySpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.span)?;
        if let Some(alias) = &self.alias {
            write!(f, " AS {alias}")?;
        }
        Ok(())
    }
}

impl Display for SpanClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "span({}, {}", self.field, self.value)?;
        if let Some(unit) = self.unit {
            write!(f, " {}", unit.keyword().canonical_name())?;
        }
        f.write_str(")")
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.order == SortOrder::Descending {
            f.write_str("- ")?;
        }
        match self.cast {
            Some(cast) => write!(f, "{}({})", cast.keyword().canonical_name(), self.field),
            None => write!(f, "{}", self.field),
        }
    }
}

impl Display for EvalClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.field, self.value)
    }
}

impl Display for AdCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ad")?;
        let integers = [
            ("number_of_trees", &self.number_of_trees),
            ("shingle_size", &self.shingle_size),
            ("sample_size", &self.sample_size),
            ("output_after", &self.output_after),
        ];
        for (name, value) in integers {
            if let Some(value) = value {
                write!(f, " {name}={value}")?;
            }
        }
        let decimals = [
            ("time_decay", &self.time_decay),
            ("anomaly_rate", &self.anomaly_rate),
        ];
        for (name, value) in decimals {
            if let Some(value) = value {
                write!(f, " {name}={value}")?;
            }
        }
        let strings = [
            ("category_field", &self.category_field),
            ("time_field", &self.time_field),
            ("date_format", &self.date_format),
            ("time_zone", &self.time_zone),
        ];
        for (name, value) in strings {
            if let Some(value) = value {
                write!(f, " {name}=")?;
                write_string(f, value)?;
            }
        }
        if let Some(size) = &self.training_data_size {
            write!(f, " training_data_size={size}")?;
        }
        if let Some(threshold) = &self.anomaly_score_threshold {
            write!(f, " anomaly_score_threshold={threshold}")?;
        }
        Ok(())
    }
}

fn write_by(f: &mut fmt::Formatter<'_>, by: &[QualifiedName]) -> fmt::Result {
    if by.is_empty() {
        return Ok(());
    }
    f.write_str(" by ")?;
    write_separated(f, by, ", ")
}

fn write_separated<T: Display>(f: &mut fmt::Formatter<'_>, items: &[T], sep: &str) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

// ============ Line breaking ============

/// Pretty print a query, one stage per line once it exceeds `width`
pub fn pretty(query: &Query, width: usize) -> String {
    let one_line = query.to_string();
    if one_line.len() <= width || query.commands.len() <= 1 {
        return one_line;
    }

    let mut stages = query.commands.iter().map(ToString::to_string);
    let mut out = stages.next().unwrap_or_default();
    for stage in stages {
        out.push_str("\n| ");
        out.push_str(&stage);
    }
    out
}

impl Query {
    /// Pretty print with line breaking at the given width
    pub fn pretty(&self, width: usize) -> String {
        pretty(self, width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse;

    fn round_trip(source: &str) -> String {
        let query = parse(source).unwrap();
        let printed = query.to_string();
        let reparsed = parse(&printed).unwrap_or_else(|e| panic!("reparse of `{printed}`: {e}"));
        assert_eq!(query, reparsed, "round trip failed for: {source}");
        printed
    }

    #[test]
    fn display_simple() {
        assert_eq!(
            round_trip("source=logs | where status=200 | stats count() by host"),
            "search source=logs | where status = 200 | stats count() by host"
        );
    }

    #[test]
    fn operators_are_spaced() {
        // `a-b` would lex as a single identifier
        assert_eq!(round_trip("source=t | eval x = a - b * c"), "search source=t | eval x = a - b * c");
    }

    #[test]
    fn logical_parens_by_precedence() {
        let printed = round_trip("source=t | where (a=1 AND b=2) OR c=3");
        assert_eq!(printed, "search source=t | where (a = 1 AND b = 2) OR c = 3");
        let printed = round_trip("source=t | where a=1 AND (b=2 AND c=3)");
        assert_eq!(printed, "search source=t | where a = 1 AND (b = 2 AND c = 3)");
        let printed = round_trip("source=t | where NOT (a=1 OR b=2)");
        assert_eq!(printed, "search source=t | where NOT (a = 1 OR b = 2)");
    }

    #[test]
    fn awkward_identifiers_are_quoted() {
        let printed = round_trip("source=t | fields `my field`, count, `a.b`");
        assert_eq!(printed, "search source=t | fields `my field`, count, `a.b`");
        round_trip("source=t | fields `and`");
    }

    #[test]
    fn strings_survive() {
        round_trip(r#"source=t | where a = 'it''s' | parse msg '(?<ip>\d+\.\d+)'"#);
        round_trip(r#"source=t | where a = "say \"hi\"""#);
        round_trip(r#"source=t | where a = 'back\"slash'"#);
    }

    #[test]
    fn commands_round_trip() {
        for source in [
            "describe logs, remote:other",
            "show datasources",
            "search a=1 source=logs",
            "source=logs-2021.01.11 a>1",
            "source=t | fields - a, b.c",
            "source=t | rename a* AS b*, 'c' AS d",
            "source=t | stats partitions=2 allnum=true delim=',' avg(x) AS m, dc(y) by span(ts, 1h) AS s, host dedup_splitvalues=false",
            "source=t | stats percentile<90>(lat), take(msg, 2) by a",
            "source=t | dedup 2 a, b keepempty=true consecutive=false",
            "source=t | sort - a, num(b), + c",
            "source=t | eval x = if(a > 1, 'y', 'n'), z = cast(a AS STRING)",
            "source=t | head 5 from 10",
            "source=t | top 3 a by b | rare c by d",
            "source=t | grok msg '%{IP:ip}'",
            "source=t | patterns new_field='p' punct msg",
            "source=t | kmeans centroids=3 iterations=2 distance_type='COSINE'",
            "source=t | ad shingle_size=8 time_decay=0.001 time_field='ts'",
            "source=t | ml action='train' size=3",
            "source=t | where match(msg, 'err', operator='AND') AND multi_match(['a' ^ 2, b], 'x')",
            "source=t | eval d = DATE '2020-01-01' + INTERVAL 1 DAY",
            "source=t | eval x = extract(DAY_HOUR FROM ts), y = timestampadd(DAY, 1, ts)",
            "source=t | eval p = position('a' IN name), g = get_format(DATE, 'USA')",
            "source=t | where a IN (1, -2, 'x') XOR b REGEXP 'y'",
            "source=t | eval x = if((a = 1), 1, 0)",
        ] {
            round_trip(source);
        }
    }

    #[test]
    fn pretty_breaks_long_pipelines() {
        let query = parse("source=logs | where status=500 | stats count() by host | head 5").unwrap();
        assert_eq!(pretty(&query, 200), query.to_string());
        let broken = query.pretty(30);
        let lines: Vec<&str> = broken.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("| where"));
        assert_eq!(parse(&broken).unwrap(), query);
    }
}
