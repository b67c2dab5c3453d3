//! Command grammar and dispatch

use indexmap::IndexMap;

use super::name::is_ident_token;
use super::{PResult, Parser, furthest};
use crate::ast::{
    AdCommand, AggregateFunction, AggregationTerm, BySpan, Command, DedupCommand,
    DescribeCommand, EvalClause, EvalCommand, FieldsCommand, FieldsMode, FromClause, FromKeyword,
    FromTarget, GrokCommand, HeadCommand, KmeansCommand, MlCommand, ParseCommand,
    PatternsCommand, PatternsMethod, RareCommand, RenameClause, RenameCommand, SearchCommand,
    SortCast, SortCommand, SortField, SortOrder, SpanClause, StatsByClause, StatsCommand,
    StatsFunction, TableSource, TimespanUnit, TopCommand, WhereCommand,
};
use crate::keyword::{Keyword as K, PIPE_COMMANDS, TIMESPAN_UNITS};
use crate::token::TokenKind;

const PATTERNS_PARAMS: &[K] = &[K::NewField, K::Pattern, K::Method];

const KMEANS_PARAMS: &[K] = &[K::Centroids, K::Iterations, K::DistanceType];

const AD_PARAMS: &[K] = &[
    K::NumberOfTrees,
    K::ShingleSize,
    K::SampleSize,
    K::OutputAfter,
    K::TimeDecay,
    K::AnomalyRate,
    K::CategoryField,
    K::TimeField,
    K::DateFormat,
    K::TimeZone,
    K::TrainingDataSize,
    K::AnomalyScoreThreshold,
];

type CommandParser<'t, 'src> = fn(&mut Parser<'t, 'src>) -> PResult<Command>;

impl<'t, 'src> Parser<'t, 'src> {
    // ============ Generating commands ============

    /// `search`, `describe` or `show datasources`
    pub(super) fn source_command(&mut self) -> PResult<Command> {
        let next = self.stream.peek_nth(1).kind;
        match self.stream.peek_kind() {
            TokenKind::Keyword(K::Describe) if next != TokenKind::Equal => {
                self.stream.advance();
                let tables = self.table_source_list()?;
                Ok(Command::Describe(DescribeCommand { tables }))
            }
            TokenKind::Keyword(K::Show) if next == TokenKind::Keyword(K::Datasources) => {
                self.stream.advance();
                self.stream.advance();
                Ok(Command::ShowDataSources)
            }
            _ => self.search().map(Command::Search),
        }
    }

    fn search(&mut self) -> PResult<SearchCommand> {
        if self.stream.eat_keyword(K::Search).is_none() {
            self.stream
                .note_all([K::Describe, K::Show].map(TokenKind::Keyword));
        }

        if !self.at_from_clause() {
            self.stream
                .note_all([K::Source, K::Index].map(TokenKind::Keyword));
            return self.filter_then_from();
        }

        let mark = self.stream.mark();
        match self.from_then_filter() {
            Ok(search) => Ok(search),
            Err(err) if err.is_resource_limit() => Err(err),
            Err(first) => {
                log::trace!("search: from-first form failed, trying filter-first");
                self.stream.reset(mark);
                self.filter_then_from()
                    .map_err(|second| furthest(first, second))
            }
        }
    }

    fn at_from_clause(&self) -> bool {
        matches!(
            self.stream.peek_kind(),
            TokenKind::Keyword(K::Source | K::Index)
        ) && self.stream.peek_nth(1).kind == TokenKind::Equal
    }

    /// `source=t` or `source=t <filter>`
    fn from_then_filter(&mut self) -> PResult<SearchCommand> {
        let from = self.from_clause()?;
        if self.stream.at(TokenKind::Pipe) || self.stream.at(TokenKind::Eof) {
            return Ok(SearchCommand::From(from));
        }
        let filter = self.logical_expression()?;
        Ok(SearchCommand::FromFilter { from, filter })
    }

    /// `<filter> source=t`; juxtaposition stops in front of the from clause
    fn filter_then_from(&mut self) -> PResult<SearchCommand> {
        let saved = std::mem::replace(&mut self.stop_at_from, true);
        let filter = self.logical_expression();
        self.stop_at_from = saved;
        let filter = filter?;
        let from = self.from_clause()?;
        Ok(SearchCommand::FilterFrom { filter, from })
    }

    fn from_clause(&mut self) -> PResult<FromClause> {
        let keyword = match self.stream.peek_kind() {
            TokenKind::Keyword(K::Source) => FromKeyword::Source,
            TokenKind::Keyword(K::Index) => FromKeyword::Index,
            _ => {
                self.stream
                    .note_all([K::Source, K::Index].map(TokenKind::Keyword));
                return Err(self.stream.error());
            }
        };
        self.stream.advance();
        self.stream.expect(TokenKind::Equal)?;

        let first = self.table_source()?;
        if let TableSource::Name {
            cluster: None,
            name,
        } = &first
            && self.stream.at(TokenKind::LParen)
        {
            let name = name.clone();
            let args = self.function_args()?;
            return Ok(FromClause {
                keyword,
                target: FromTarget::Function { name, args },
            });
        }

        let mut tables = vec![first];
        while self.stream.eat(TokenKind::Comma).is_some() {
            tables.push(self.table_source()?);
        }
        Ok(FromClause {
            keyword,
            target: FromTarget::Tables(tables),
        })
    }

    // ============ Dispatch ============

    /// A pipeline stage, selected by its leading command word
    pub(super) fn pipe_command(&mut self) -> PResult<Command> {
        let parser: Option<CommandParser<'t, 'src>> = match self.stream.peek_kind() {
            TokenKind::Keyword(K::Where) => Some(Self::where_command),
            TokenKind::Keyword(K::Fields) => Some(Self::fields_command),
            TokenKind::Keyword(K::Rename) => Some(Self::rename_command),
            TokenKind::Keyword(K::Stats) => Some(Self::stats_command),
            TokenKind::Keyword(K::Dedup) => Some(Self::dedup_command),
            TokenKind::Keyword(K::Sort) => Some(Self::sort_command),
            TokenKind::Keyword(K::Eval) => Some(Self::eval_command),
            TokenKind::Keyword(K::Head) => Some(Self::head_command),
            TokenKind::Keyword(K::Top) => Some(Self::top_command),
            TokenKind::Keyword(K::Rare) => Some(Self::rare_command),
            TokenKind::Keyword(K::Grok) => Some(Self::grok_command),
            TokenKind::Keyword(K::Parse) => Some(Self::parse_command),
            TokenKind::Keyword(K::Patterns) => Some(Self::patterns_command),
            TokenKind::Keyword(K::Kmeans) => Some(Self::kmeans_command),
            TokenKind::Keyword(K::Ad) => Some(Self::ad_command),
            TokenKind::Keyword(K::Ml) => Some(Self::ml_command),
            _ => None,
        };
        let Some(parser) = parser else {
            self.stream
                .note_all(PIPE_COMMANDS.iter().copied().map(TokenKind::Keyword));
            return Err(self.stream.error());
        };
        self.stream.advance();
        parser(self)
    }

    // ============ Filtering and projection ============

    fn where_command(&mut self) -> PResult<Command> {
        let condition = self.logical_expression()?;
        Ok(Command::Where(WhereCommand { condition }))
    }

    fn fields_command(&mut self) -> PResult<Command> {
        let mode = if self.stream.eat(TokenKind::Plus).is_some() {
            Some(FieldsMode::Include)
        } else if self.stream.eat(TokenKind::Minus).is_some() {
            Some(FieldsMode::Exclude)
        } else {
            None
        };
        let fields = self.field_list()?;
        Ok(Command::Fields(FieldsCommand { mode, fields }))
    }

    fn rename_command(&mut self) -> PResult<Command> {
        let mut clauses = vec![self.rename_clause()?];
        while self.stream.eat(TokenKind::Comma).is_some() {
            clauses.push(self.rename_clause()?);
        }
        Ok(Command::Rename(RenameCommand { clauses }))
    }

    fn rename_clause(&mut self) -> PResult<RenameClause> {
        let original = self.wildcard_qualified_name()?;
        self.stream.expect_keyword(K::As)?;
        let renamed = self.wildcard_qualified_name()?;
        Ok(RenameClause { original, renamed })
    }

    // ============ Stats ============

    fn stats_command(&mut self) -> PResult<Command> {
        let partitions = if self.eat_param(K::Partitions) {
            Some(self.integer_literal()?)
        } else {
            None
        };
        let all_num = if self.eat_param(K::Allnum) {
            Some(self.boolean_literal()?)
        } else {
            None
        };
        let delim = if self.eat_param(K::Delim) {
            Some(self.string_literal()?)
        } else {
            None
        };

        let mut aggregations = vec![self.aggregation_term()?];
        while self.stream.eat(TokenKind::Comma).is_some() {
            aggregations.push(self.aggregation_term()?);
        }

        let by = if self.stream.eat_keyword(K::By).is_some() {
            Some(self.stats_by()?)
        } else {
            None
        };
        let dedup_split_values = if self.eat_param(K::DedupSplitvalues) {
            Some(self.boolean_literal()?)
        } else {
            None
        };

        Ok(Command::Stats(StatsCommand {
            partitions,
            all_num,
            delim,
            aggregations,
            by,
            dedup_split_values,
        }))
    }

    fn aggregation_term(&mut self) -> PResult<AggregationTerm> {
        let function = self.stats_function()?;
        let alias = if self.stream.eat_keyword(K::As).is_some() {
            Some(self.wildcard_qualified_name()?)
        } else {
            None
        };
        Ok(AggregationTerm { function, alias })
    }

    fn stats_function(&mut self) -> PResult<StatsFunction> {
        let next = self.stream.peek_nth(1).kind;
        let keyword = self.stream.peek_kind().keyword();
        match keyword {
            Some(K::Count)
                if next == TokenKind::LParen
                    && self.stream.peek_nth(2).kind == TokenKind::RParen =>
            {
                self.stream.advance();
                self.stream.advance();
                self.stream.advance();
                Ok(StatsFunction::CountAll)
            }
            Some(K::DistinctCount | K::Dc) if next == TokenKind::LParen => {
                self.stream.advance();
                self.nested(|p| {
                    p.stream.advance();
                    let arg = p.value_expression()?;
                    p.stream.expect(TokenKind::RParen)?;
                    Ok(StatsFunction::DistinctCount(arg))
                })
            }
            Some(K::Percentile) if next == TokenKind::Less => {
                self.stream.advance();
                self.stream.advance();
                let percent = self.integer_literal()?;
                self.stream.expect(TokenKind::Greater)?;
                self.stream.expect(TokenKind::LParen)?;
                let field = self.qualified_name()?;
                self.stream.expect(TokenKind::RParen)?;
                Ok(StatsFunction::Percentile { percent, field })
            }
            Some(K::Take) if next == TokenKind::LParen => {
                self.stream.advance();
                self.stream.advance();
                let field = self.qualified_name()?;
                let size = if self.stream.eat(TokenKind::Comma).is_some() {
                    Some(self.integer_literal()?)
                } else {
                    None
                };
                self.stream.expect(TokenKind::RParen)?;
                Ok(StatsFunction::Take { field, size })
            }
            Some(keyword) if next == TokenKind::LParen => {
                let Some(function) = AggregateFunction::from_keyword(keyword) else {
                    return Err(self.aggregation_expected());
                };
                self.stream.advance();
                self.nested(|p| {
                    p.stream.advance();
                    let arg = p.value_expression()?;
                    p.stream.expect(TokenKind::RParen)?;
                    Ok(StatsFunction::Call { function, arg })
                })
            }
            _ => Err(self.aggregation_expected()),
        }
    }

    fn aggregation_expected(&mut self) -> crate::error::ParseError {
        self.stream.note_all(
            AggregateFunction::ALL
                .iter()
                .map(|f| f.keyword())
                .chain([K::DistinctCount, K::Dc, K::Percentile, K::Take])
                .map(TokenKind::Keyword),
        );
        self.stream.error()
    }

    /// `fields`, `span(...) [AS name]` or `span(...) [AS name], fields`
    fn stats_by(&mut self) -> PResult<StatsByClause> {
        if !(self.stream.at_keyword(K::Span)
            && self.stream.peek_nth(1).kind == TokenKind::LParen)
        {
            return self.field_list().map(StatsByClause::Fields);
        }

        let span = self.span_clause()?;
        let alias = if self.stream.eat_keyword(K::As).is_some() {
            Some(self.qualified_name()?)
        } else {
            None
        };
        let by_span = BySpan { span, alias };
        if self.stream.eat(TokenKind::Comma).is_some() {
            let fields = self.field_list()?;
            Ok(StatsByClause::SpanAndFields(by_span, fields))
        } else {
            Ok(StatsByClause::Span(by_span))
        }
    }

    /// `span(field, interval [unit])`
    fn span_clause(&mut self) -> PResult<SpanClause> {
        self.stream.expect_keyword(K::Span)?;
        self.nested(|p| {
            p.stream.expect(TokenKind::LParen)?;
            let field = p.qualified_name()?;
            p.stream.expect(TokenKind::Comma)?;
            let value = p.literal_value()?;
            let unit = p.timespan_unit();
            p.stream.expect(TokenKind::RParen)?;
            Ok(SpanClause { field, value, unit })
        })
    }

    fn timespan_unit(&mut self) -> Option<TimespanUnit> {
        if let TokenKind::Keyword(keyword) = self.stream.peek_kind()
            && let Some(unit) = TimespanUnit::from_keyword(keyword)
        {
            self.stream.advance();
            return Some(unit);
        }
        self.stream
            .note_all(TIMESPAN_UNITS.iter().copied().map(TokenKind::Keyword));
        None
    }

    // ============ Row shaping ============

    fn dedup_command(&mut self) -> PResult<Command> {
        let count = if self.at_integer() {
            Some(self.integer_literal()?)
        } else {
            None
        };
        let fields = self.field_list()?;
        let keep_empty = if self.eat_param(K::Keepempty) {
            Some(self.boolean_literal()?)
        } else {
            None
        };
        let consecutive = if self.eat_param(K::Consecutive) {
            Some(self.boolean_literal()?)
        } else {
            None
        };
        Ok(Command::Dedup(DedupCommand {
            count,
            fields,
            keep_empty,
            consecutive,
        }))
    }

    fn sort_command(&mut self) -> PResult<Command> {
        let mut fields = vec![self.sort_field()?];
        while self.stream.eat(TokenKind::Comma).is_some() {
            fields.push(self.sort_field()?);
        }
        Ok(Command::Sort(SortCommand { fields }))
    }

    /// `[+|-] field` or `[+|-] auto|str|ip|num(field)`
    fn sort_field(&mut self) -> PResult<SortField> {
        let order = if self.stream.eat(TokenKind::Minus).is_some() {
            SortOrder::Descending
        } else {
            self.stream.eat(TokenKind::Plus);
            SortOrder::Ascending
        };

        let cast = match self.stream.peek_kind() {
            TokenKind::Keyword(keyword) if self.stream.peek_nth(1).kind == TokenKind::LParen => {
                SortCast::from_keyword(keyword)
            }
            _ => None,
        };
        let Some(cast) = cast else {
            let field = self.qualified_name()?;
            return Ok(SortField {
                order,
                cast: None,
                field,
            });
        };

        self.stream.advance();
        self.stream.advance();
        let field = self.qualified_name()?;
        self.stream.expect(TokenKind::RParen)?;
        Ok(SortField {
            order,
            cast: Some(cast),
            field,
        })
    }

    fn eval_command(&mut self) -> PResult<Command> {
        let mut clauses = vec![self.eval_clause()?];
        while self.stream.eat(TokenKind::Comma).is_some() {
            clauses.push(self.eval_clause()?);
        }
        Ok(Command::Eval(EvalCommand { clauses }))
    }

    fn eval_clause(&mut self) -> PResult<EvalClause> {
        let field = self.qualified_name()?;
        self.stream.expect(TokenKind::Equal)?;
        let value = self.expression()?;
        Ok(EvalClause { field, value })
    }

    fn head_command(&mut self) -> PResult<Command> {
        let size = if self.at_integer() {
            Some(self.integer_literal()?)
        } else {
            None
        };
        let offset = if self.stream.eat_keyword(K::From).is_some() {
            Some(self.integer_literal()?)
        } else {
            None
        };
        Ok(Command::Head(HeadCommand { size, offset }))
    }

    fn top_command(&mut self) -> PResult<Command> {
        let count = if self.at_integer() {
            Some(self.integer_literal()?)
        } else {
            None
        };
        let fields = self.field_list()?;
        let by = self.by_fields()?;
        Ok(Command::Top(TopCommand { count, fields, by }))
    }

    fn rare_command(&mut self) -> PResult<Command> {
        let fields = self.field_list()?;
        let by = self.by_fields()?;
        Ok(Command::Rare(RareCommand { fields, by }))
    }

    fn by_fields(&mut self) -> PResult<Vec<crate::ast::QualifiedName>> {
        if self.stream.eat_keyword(K::By).is_some() {
            self.field_list()
        } else {
            Ok(Vec::new())
        }
    }

    // ============ Text extraction ============

    fn grok_command(&mut self) -> PResult<Command> {
        let source = self.expression()?;
        let pattern = self.string_literal()?;
        Ok(Command::Grok(GrokCommand { source, pattern }))
    }

    fn parse_command(&mut self) -> PResult<Command> {
        let source = self.expression()?;
        let pattern = self.string_literal()?;
        Ok(Command::Parse(ParseCommand { source, pattern }))
    }

    /// Parameters in any order, then the source expression. The method may be
    /// written `method=punct` or as the bare word.
    fn patterns_command(&mut self) -> PResult<Command> {
        let mut new_field = None;
        let mut pattern = None;
        let mut method = None;

        loop {
            if let Some(param) = self.bag_param(PATTERNS_PARAMS) {
                match param {
                    K::NewField => self.bag_value(&mut new_field, param, Self::string_literal)?,
                    K::Pattern => self.bag_value(&mut pattern, param, Self::string_literal)?,
                    _ => self.bag_value(&mut method, param, Self::patterns_method)?,
                }
            } else if self.at_bare_method() {
                if method.is_some() {
                    return Err(self.duplicate(K::Method));
                }
                method = Some(self.patterns_method()?);
            } else {
                break;
            }
        }

        let source = self.expression()?;
        Ok(Command::Patterns(PatternsCommand {
            new_field,
            pattern,
            method,
            source,
        }))
    }

    fn patterns_method(&mut self) -> PResult<PatternsMethod> {
        let method = self
            .stream
            .peek_kind()
            .keyword()
            .and_then(PatternsMethod::from_keyword);
        match method {
            Some(method) => {
                self.stream.advance();
                Ok(method)
            }
            None => {
                self.stream
                    .note_all([K::Punct, K::Regex].map(TokenKind::Keyword));
                Err(self.stream.error())
            }
        }
    }

    /// A bare `punct`/`regex` is the method only when a source expression
    /// follows; otherwise it is the source field itself
    fn at_bare_method(&self) -> bool {
        matches!(
            self.stream.peek_kind(),
            TokenKind::Keyword(K::Punct | K::Regex)
        ) && matches!(
            self.stream.peek_nth(1).kind,
            TokenKind::Ident
                | TokenKind::BquotaString
                | TokenKind::DquotaString
                | TokenKind::SquotaString
                | TokenKind::Integer
                | TokenKind::Decimal
                | TokenKind::LParen
                | TokenKind::Keyword(_)
        )
    }

    // ============ Machine learning ============

    fn kmeans_command(&mut self) -> PResult<Command> {
        let mut kmeans = KmeansCommand::default();
        while let Some(param) = self.bag_param(KMEANS_PARAMS) {
            match param {
                K::Centroids => {
                    self.bag_value(&mut kmeans.centroids, param, Self::integer_literal)?
                }
                K::Iterations => {
                    self.bag_value(&mut kmeans.iterations, param, Self::integer_literal)?
                }
                _ => self.bag_value(&mut kmeans.distance_type, param, Self::string_literal)?,
            }
        }
        Ok(Command::Kmeans(kmeans))
    }

    fn ad_command(&mut self) -> PResult<Command> {
        let mut ad = AdCommand::default();
        while let Some(param) = self.bag_param(AD_PARAMS) {
            match param {
                K::NumberOfTrees => {
                    self.bag_value(&mut ad.number_of_trees, param, Self::integer_literal)?
                }
                K::ShingleSize => {
                    self.bag_value(&mut ad.shingle_size, param, Self::integer_literal)?
                }
                K::SampleSize => {
                    self.bag_value(&mut ad.sample_size, param, Self::integer_literal)?
                }
                K::OutputAfter => {
                    self.bag_value(&mut ad.output_after, param, Self::integer_literal)?
                }
                K::TimeDecay => self.bag_value(&mut ad.time_decay, param, Self::decimal_literal)?,
                K::AnomalyRate => {
                    self.bag_value(&mut ad.anomaly_rate, param, Self::decimal_literal)?
                }
                K::CategoryField => {
                    self.bag_value(&mut ad.category_field, param, Self::string_literal)?
                }
                K::TimeField => self.bag_value(&mut ad.time_field, param, Self::string_literal)?,
                K::DateFormat => {
                    self.bag_value(&mut ad.date_format, param, Self::string_literal)?
                }
                K::TimeZone => self.bag_value(&mut ad.time_zone, param, Self::string_literal)?,
                K::TrainingDataSize => {
                    self.bag_value(&mut ad.training_data_size, param, Self::integer_literal)?
                }
                _ => self.bag_value(
                    &mut ad.anomaly_score_threshold,
                    param,
                    Self::decimal_literal,
                )?,
            }
        }
        Ok(Command::Ad(ad))
    }

    /// `ml name=value ...` with free-form argument names
    fn ml_command(&mut self) -> PResult<Command> {
        let mut args = IndexMap::new();
        while is_ident_token(self.stream.peek())
            && self.stream.peek_nth(1).kind == TokenKind::Equal
        {
            let mark = self.stream.mark();
            let name = self.ident()?;
            if args.contains_key(name.as_str()) {
                self.stream.reset(mark);
                return Err(self.stream.error_with_message(format!(
                    "duplicate parameter `{}`",
                    name.as_str()
                )));
            }
            self.stream.advance();
            let value = self.literal_value()?;
            args.insert(name.as_str().to_string(), value);
        }
        self.stream.note(crate::error::Expected::Token(TokenKind::Ident));
        Ok(Command::Ml(MlCommand { args }))
    }

    // ============ Parameters ============

    /// `name=` for a fixed-position parameter
    fn eat_param(&mut self, keyword: K) -> bool {
        if self.stream.at_keyword(keyword) && self.stream.peek_nth(1).kind == TokenKind::Equal {
            self.stream.advance();
            self.stream.advance();
            true
        } else {
            false
        }
    }

    /// Which of `params` starts here as `name=`, without consuming it
    fn bag_param(&mut self, params: &[K]) -> Option<K> {
        let found = match self.stream.peek_kind() {
            TokenKind::Keyword(keyword)
                if params.contains(&keyword)
                    && self.stream.peek_nth(1).kind == TokenKind::Equal =>
            {
                Some(keyword)
            }
            _ => None,
        };
        if found.is_none() {
            self.stream
                .note_all(params.iter().copied().map(TokenKind::Keyword));
        }
        found
    }

    /// Consume `param=value` into an empty slot
    fn bag_value<T>(
        &mut self,
        slot: &mut Option<T>,
        param: K,
        value: impl FnOnce(&mut Self) -> PResult<T>,
    ) -> PResult<()> {
        if slot.is_some() {
            return Err(self.duplicate(param));
        }
        self.stream.advance();
        self.stream.advance();
        *slot = Some(value(self)?);
        Ok(())
    }

    fn duplicate(&self, param: K) -> crate::error::ParseError {
        self.stream
            .error_with_message(format!("duplicate parameter `{}`", param.canonical_name()))
    }
}

// ============ Sanity Tests ============
