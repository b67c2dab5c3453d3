//! Function calls, special call forms and relevance functions

use super::name::is_ident_token;
use super::{PResult, Parser};
use crate::ast::{
    ComparisonExpr, ComparisonOperator, DataType, Expression, FunctionArg, FunctionCall,
    GetFormatType, LogicalExpr, MultiFieldRelevance, QualifiedName, RelevanceArg, RelevanceExpr,
    RelevanceField, RelevanceValue, SingleFieldRelevance, TimestampFunction, ValueExpr,
    WeightedField,
};
use crate::keyword::{DATA_TYPES, FunctionFamily, Keyword, RELEVANCE_ARGS};
use crate::token::TokenKind;

impl<'t, 'src> Parser<'t, 'src> {
    /// `name(args)` for a built-in eval function; the name token is current
    pub(super) fn function_call(&mut self, family: FunctionFamily) -> PResult<FunctionCall> {
        let name = self.stream.advance();
        let args = self.function_args()?;
        Ok(FunctionCall {
            name: name.text.to_ascii_lowercase(),
            family,
            args,
        })
    }

    /// `( [arg (, arg)*] )`
    pub(super) fn function_args(&mut self) -> PResult<Vec<FunctionArg>> {
        self.nested(|p| {
            p.stream.expect(TokenKind::LParen)?;
            let mut args = Vec::new();
            if p.stream.eat(TokenKind::RParen).is_some() {
                return Ok(args);
            }
            args.push(p.function_arg()?);
            while p.stream.eat(TokenKind::Comma).is_some() {
                args.push(p.function_arg()?);
            }
            p.stream.expect(TokenKind::RParen)?;
            Ok(args)
        })
    }

    /// `[name =] expression`
    ///
    /// `a = 1` alone is a named argument. When more of a predicate follows,
    /// as in `a = 1 AND b = 2`, the prefix becomes its first comparison.
    fn function_arg(&mut self) -> PResult<FunctionArg> {
        if !(is_ident_token(self.stream.peek())
            && self.stream.peek_nth(1).kind == TokenKind::Equal)
        {
            return self.expression().map(FunctionArg::positional);
        }

        let name = self.ident()?;
        self.stream.advance();
        let value = self.expression()?;
        if self.stream.at(TokenKind::Comma) || self.stream.at(TokenKind::RParen) {
            return Ok(FunctionArg {
                name: Some(name),
                value,
            });
        }

        let Expression::Value(right) = value else {
            return Err(self.stream.error());
        };
        log::trace!("`{}=` starts a predicate argument", name.as_str());
        let left = ValueExpr::Field(QualifiedName::new(name, []));
        let first = LogicalExpr::Comparison(ComparisonExpr::Compare {
            left,
            op: ComparisonOperator::Equal,
            right,
        });
        self.predicate_tail(first).map(FunctionArg::positional)
    }

    /// `CAST(expr AS type)`
    pub(super) fn cast(&mut self) -> PResult<ValueExpr> {
        self.stream.expect_keyword(Keyword::Cast)?;
        self.nested(|p| {
            p.stream.expect(TokenKind::LParen)?;
            let expr = p.expression()?;
            p.stream.expect_keyword(Keyword::As)?;
            let data_type = p.data_type()?;
            p.stream.expect(TokenKind::RParen)?;
            Ok(ValueExpr::Cast {
                expr: Box::new(expr),
                data_type,
            })
        })
    }

    fn data_type(&mut self) -> PResult<DataType> {
        if let TokenKind::Keyword(keyword) = self.stream.peek_kind()
            && let Some(data_type) = DataType::from_keyword(keyword)
        {
            self.stream.advance();
            return Ok(data_type);
        }
        self.stream
            .note_all(DATA_TYPES.iter().copied().map(TokenKind::Keyword));
        Err(self.stream.error())
    }

    /// `EXTRACT(part FROM value)`
    pub(super) fn extract(&mut self) -> PResult<ValueExpr> {
        self.stream.expect_keyword(Keyword::Extract)?;
        self.nested(|p| {
            p.stream.expect(TokenKind::LParen)?;
            let part = p.datetime_unit(true)?;
            p.stream.expect_keyword(Keyword::From)?;
            let arg = p.value_expression()?;
            p.stream.expect(TokenKind::RParen)?;
            Ok(ValueExpr::Extract {
                part,
                arg: Box::new(arg),
            })
        })
    }

    /// `GET_FORMAT(type, value)`
    pub(super) fn get_format(&mut self) -> PResult<ValueExpr> {
        self.stream.expect_keyword(Keyword::GetFormat)?;
        self.nested(|p| {
            p.stream.expect(TokenKind::LParen)?;
            let format_type = match p.stream.peek_kind() {
                TokenKind::Keyword(keyword) => GetFormatType::from_keyword(keyword),
                _ => None,
            };
            let Some(format_type) = format_type else {
                p.stream.note_all(
                    GetFormatType::ALL
                        .iter()
                        .map(|t| TokenKind::Keyword(t.keyword())),
                );
                return Err(p.stream.error());
            };
            p.stream.advance();
            p.stream.expect(TokenKind::Comma)?;
            let arg = p.value_expression()?;
            p.stream.expect(TokenKind::RParen)?;
            Ok(ValueExpr::GetFormat {
                format_type,
                arg: Box::new(arg),
            })
        })
    }

    /// `TIMESTAMPADD(unit, a, b)` / `TIMESTAMPDIFF(unit, a, b)`
    pub(super) fn timestamp_function(&mut self) -> PResult<ValueExpr> {
        let name = self.stream.advance();
        let function = name
            .kind
            .keyword()
            .and_then(TimestampFunction::from_keyword)
            .ok_or_else(|| self.stream.error())?;
        self.nested(|p| {
            p.stream.expect(TokenKind::LParen)?;
            let unit = p.datetime_unit(false)?;
            p.stream.expect(TokenKind::Comma)?;
            let first = p.value_expression()?;
            p.stream.expect(TokenKind::Comma)?;
            let second = p.value_expression()?;
            p.stream.expect(TokenKind::RParen)?;
            Ok(ValueExpr::Timestamp {
                function,
                unit,
                first: Box::new(first),
                second: Box::new(second),
            })
        })
    }

    /// `POSITION(substring IN string)`
    pub(super) fn position(&mut self) -> PResult<ValueExpr> {
        self.stream.expect_keyword(Keyword::Position)?;
        self.nested(|p| {
            p.stream.expect(TokenKind::LParen)?;
            let substring = p.value_expression()?;
            p.stream.expect_keyword(Keyword::In)?;
            let string = p.value_expression()?;
            p.stream.expect(TokenKind::RParen)?;
            Ok(ValueExpr::Position {
                substring: Box::new(substring),
                string: Box::new(string),
            })
        })
    }

    // ============ Relevance ============

    /// Single-field `match(field, query, ...)` or multi-field
    /// `multi_match([f1, f2 ^ 2], query, ...)`; the name token is current
    pub(super) fn relevance_expression(&mut self) -> PResult<RelevanceExpr> {
        let name = self.stream.advance();
        let keyword = name.kind.keyword();
        let single = keyword.and_then(SingleFieldRelevance::from_keyword);
        let multi = keyword.and_then(MultiFieldRelevance::from_keyword);

        self.nested(|p| {
            p.stream.expect(TokenKind::LParen)?;
            let expr = match (single, multi) {
                (Some(function), _) => {
                    let field = p.relevance_field()?;
                    p.stream.expect(TokenKind::Comma)?;
                    let query = p.relevance_value()?;
                    let args = p.relevance_args()?;
                    RelevanceExpr::SingleField {
                        function,
                        field,
                        query,
                        args,
                    }
                }
                (None, Some(function)) => {
                    p.stream.expect(TokenKind::LBracket)?;
                    let mut fields = vec![p.weighted_field()?];
                    while p.stream.eat(TokenKind::Comma).is_some() {
                        fields.push(p.weighted_field()?);
                    }
                    p.stream.expect(TokenKind::RBracket)?;
                    p.stream.expect(TokenKind::Comma)?;
                    let query = p.relevance_value()?;
                    let args = p.relevance_args()?;
                    RelevanceExpr::MultiField {
                        function,
                        fields,
                        query,
                        args,
                    }
                }
                (None, None) => return Err(p.stream.error()),
            };
            p.stream.expect(TokenKind::RParen)?;
            Ok(expr)
        })
    }

    fn relevance_field(&mut self) -> PResult<RelevanceField> {
        if self.at_string() {
            return self.string_literal().map(RelevanceField::Quoted);
        }
        self.qualified_name().map(RelevanceField::Name)
    }

    /// Field with an optional boost, `f ^ 2` or juxtaposed `f 2.5`
    fn weighted_field(&mut self) -> PResult<WeightedField> {
        let field = self.relevance_field()?;
        let weight = if self.stream.eat(TokenKind::Caret).is_some() {
            Some(self.numeric_literal()?)
        } else if matches!(
            self.stream.peek_kind(),
            TokenKind::Integer | TokenKind::Decimal
        ) {
            Some(self.numeric_literal()?)
        } else {
            None
        };
        Ok(WeightedField { field, weight })
    }

    fn relevance_value(&mut self) -> PResult<RelevanceValue> {
        if self.at_literal() {
            return self.literal_value().map(RelevanceValue::Literal);
        }
        if self.at_ident() {
            return self.qualified_name().map(RelevanceValue::Name);
        }
        self.literal_value().map(RelevanceValue::Literal)
    }

    /// `(, name = value)*`
    fn relevance_args(&mut self) -> PResult<Vec<RelevanceArg>> {
        let mut args = Vec::new();
        while self.stream.eat(TokenKind::Comma).is_some() {
            let name = match self.stream.peek_kind() {
                TokenKind::Keyword(keyword) if RELEVANCE_ARGS.contains(&keyword) => {
                    self.stream.advance();
                    keyword.canonical_name()
                }
                _ => {
                    self.stream
                        .note_all(RELEVANCE_ARGS.iter().copied().map(TokenKind::Keyword));
                    return Err(self.stream.error());
                }
            };
            self.stream.expect(TokenKind::Equal)?;
            let value = self.relevance_value()?;
            args.push(RelevanceArg { name, value });
        }
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::*;
    use crate::parse::parse;

    fn first_value(source: &str) -> ValueExpr {
        let query = parse(&format!("source=t | eval v = {source}")).unwrap();
        let Command::Eval(eval) = &query.commands[1] else {
            panic!("expected eval");
        };
        match &eval.clauses[0].value {
            Expression::Value(value) => value.clone(),
            other => panic!("expected value, got {other:?}"),
        }
    }

    #[test]
    fn named_and_positional_args() {
        let ValueExpr::FunctionCall(call) = first_value("round(x, digits=2)") else {
            panic!("expected call");
        };
        assert_eq!(call.name, "round");
        assert_eq!(call.family, crate::keyword::FunctionFamily::Mathematical);
        assert!(call.args[0].name.is_none());
        assert_eq!(call.args[1].name.as_ref().map(Ident::as_str), Some("digits"));
    }

    #[test]
    fn special_call_forms() {
        assert!(matches!(
            first_value("cast(a AS DOUBLE)"),
            ValueExpr::Cast {
                data_type: DataType::Double,
                ..
            }
        ));
        assert!(matches!(
            first_value("extract(DAY_HOUR FROM ts)"),
            ValueExpr::Extract {
                part: DateTimeUnit::DayHour,
                ..
            }
        ));
        assert!(matches!(
            first_value("get_format(DATETIME, 'USA')"),
            ValueExpr::GetFormat {
                format_type: GetFormatType::Datetime,
                ..
            }
        ));
        assert!(matches!(
            first_value("timestampdiff(DAY, a, b)"),
            ValueExpr::Timestamp {
                function: TimestampFunction::Diff,
                unit: DateTimeUnit::Day,
                ..
            }
        ));
        assert!(matches!(
            first_value("position('x' IN name)"),
            ValueExpr::Position { .. }
        ));
    }

    #[test]
    fn assignment_prefix_of_predicate_argument() {
        let ValueExpr::FunctionCall(call) = first_value("if(a = 1, 'x', 'y')") else {
            panic!("expected call");
        };
        assert_eq!(call.args[0].name.as_ref().map(Ident::as_str), Some("a"));

        let ValueExpr::FunctionCall(call) = first_value("if(a = 1 AND b > 2, 'x', 'y')") else {
            panic!("expected call");
        };
        assert!(call.args[0].name.is_none());
        let Expression::Logical(LogicalExpr::Binary { left, op, .. }) = &call.args[0].value else {
            panic!("expected predicate");
        };
        assert_eq!(*op, LogicalOperator::And);
        assert!(matches!(
            **left,
            LogicalExpr::Comparison(ComparisonExpr::Compare {
                op: ComparisonOperator::Equal,
                ..
            })
        ));
    }

    #[test]
    fn timestampadd_rejects_compound_unit() {
        assert!(parse("source=t | eval v = timestampadd(DAY_HOUR, 1, ts)").is_err());
    }

    #[test]
    fn multi_field_relevance_weights() {
        let query = parse(
            "source=t | where multi_match(['title' ^ 2, body 1.5, tags], 'rust', operator='AND')",
        )
        .unwrap();
        let Command::Where(w) = &query.commands[1] else {
            panic!("expected where");
        };
        let LogicalExpr::Relevance(RelevanceExpr::MultiField { fields, args, .. }) = &w.condition
        else {
            panic!("expected relevance");
        };
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].weight, Some(Literal::int(2)));
        assert!(matches!(fields[1].weight, Some(Literal::Decimal(_))));
        assert_eq!(fields[2].weight, None);
        assert_eq!(args[0].name, "operator");
    }
}
