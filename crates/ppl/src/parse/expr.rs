//! Expression precedence engine
//!
//! Binding powers, higher binds tighter:
//! - logical: XOR 3, AND 4 (also implicit between juxtaposed predicates), OR 5,
//!   prefix NOT 6
//! - comparison and IN: a single non-associative level over two values
//! - arithmetic: `+ -` 7, `* / %` 8
//!
//! All binary operators are left-associative; the right operand is parsed at
//! the operator's binding power + 1. Each operator in a chain counts against
//! `ParserConfig::max_chain` so that flat chains stay as bounded as nesting.

use super::name::is_ident_token;
use super::{PResult, Parser};
use crate::ast::{
    ArithmeticOperator, ComparisonExpr, ComparisonOperator, Expression, Literal,
    LogicalExpr, LogicalOperator, MultiFieldRelevance, NOT_BINDING_POWER, SingleFieldRelevance,
    ValueExpr,
};
use crate::error::Expected;
use crate::keyword::{FunctionFamily, Keyword, grammar};
use crate::token::TokenKind;

/// Either side of the logical/value divide, before it is known which one an
/// expression position holds
enum Operand {
    Logical(LogicalExpr),
    Value(ValueExpr),
}

const COMPARISON_OPERATORS: &[(TokenKind, ComparisonOperator)] = &[
    (TokenKind::Equal, ComparisonOperator::Equal),
    (TokenKind::NotEqual, ComparisonOperator::NotEqual),
    (TokenKind::Less, ComparisonOperator::Less),
    (TokenKind::NotGreater, ComparisonOperator::NotGreater),
    (TokenKind::Greater, ComparisonOperator::Greater),
    (TokenKind::NotLess, ComparisonOperator::NotLess),
    (
        TokenKind::Keyword(Keyword::Regexp),
        ComparisonOperator::Regexp,
    ),
];

const ARITHMETIC_OPERATORS: &[(TokenKind, ArithmeticOperator)] = &[
    (TokenKind::Plus, ArithmeticOperator::Add),
    (TokenKind::Minus, ArithmeticOperator::Subtract),
    (TokenKind::Star, ArithmeticOperator::Multiply),
    (TokenKind::Divide, ArithmeticOperator::Divide),
    (TokenKind::Modulo, ArithmeticOperator::Modulo),
];

/// Keywords that open a special value form
const VALUE_KEYWORDS: &[Keyword] = &[
    Keyword::True,
    Keyword::False,
    Keyword::Interval,
    Keyword::Date,
    Keyword::Time,
    Keyword::Timestamp,
    Keyword::Cast,
    Keyword::Extract,
    Keyword::GetFormat,
    Keyword::Timestampadd,
    Keyword::Timestampdiff,
    Keyword::Position,
];

impl<'t, 'src> Parser<'t, 'src> {
    // ============ Entry points ============

    /// Logical or value expression; a lone comparison is reported as such
    pub(super) fn expression(&mut self) -> PResult<Expression> {
        match self.logical_unit()? {
            Operand::Value(value) => Ok(Expression::Value(value)),
            Operand::Logical(lhs) => self.predicate_tail(lhs),
        }
    }

    /// Continue a predicate whose first operand is already parsed
    pub(super) fn predicate_tail(&mut self, lhs: LogicalExpr) -> PResult<Expression> {
        Ok(match self.logical_tail(lhs, 0)? {
            LogicalExpr::Comparison(comparison) => Expression::Comparison(comparison),
            logical => Expression::Logical(logical),
        })
    }

    /// Predicate expression as used by `where` and `search`
    pub(super) fn logical_expression(&mut self) -> PResult<LogicalExpr> {
        self.logical_bp(0)
    }

    // ============ Logical level ============

    fn logical_bp(&mut self, min_bp: u8) -> PResult<LogicalExpr> {
        let lhs = self.logical_leaf()?;
        self.logical_tail(lhs, min_bp)
    }

    fn logical_leaf(&mut self) -> PResult<LogicalExpr> {
        match self.logical_unit()? {
            Operand::Logical(logical) => Ok(logical),
            Operand::Value(_) => {
                for (kind, _) in COMPARISON_OPERATORS {
                    self.stream.note(Expected::Token(*kind));
                }
                self.stream.note(Expected::Token(TokenKind::Keyword(Keyword::In)));
                Err(self.stream.error())
            }
        }
    }

    fn logical_tail(&mut self, lhs: LogicalExpr, min_bp: u8) -> PResult<LogicalExpr> {
        self.chained(|p| p.logical_chain(lhs, min_bp))
    }

    fn logical_chain(&mut self, mut lhs: LogicalExpr, min_bp: u8) -> PResult<LogicalExpr> {
        loop {
            let (op, explicit) = if self.stream.at_keyword(Keyword::Or) {
                (LogicalOperator::Or, true)
            } else if self.stream.at_keyword(Keyword::And) {
                (LogicalOperator::And, true)
            } else if self.stream.at_keyword(Keyword::Xor) {
                (LogicalOperator::Xor, true)
            } else if self.at_logical_start() {
                (LogicalOperator::And, false)
            } else {
                break;
            };

            let bp = op.binding_power();
            if bp < min_bp {
                break;
            }
            self.link()?;
            if explicit {
                self.stream.advance();
            } else {
                log::trace!("implicit AND before `{}`", self.stream.peek().text);
            }
            let rhs = self.logical_bp(bp + 1)?;
            lhs = LogicalExpr::binary(lhs, op, rhs);
        }
        Ok(lhs)
    }

    /// One predicate, or a value when no comparison follows it
    fn logical_unit(&mut self) -> PResult<Operand> {
        if self.stream.eat_keyword(Keyword::Not).is_some() {
            let operand = self.nested(|p| p.logical_bp(NOT_BINDING_POWER))?;
            return Ok(Operand::Logical(LogicalExpr::Not(Box::new(operand))));
        }

        if self.at_relevance() {
            return Ok(Operand::Logical(LogicalExpr::Relevance(
                self.relevance_expression()?,
            )));
        }

        if self.stream.at(TokenKind::LParen) {
            // The group is parsed once; what it turns out to hold decides
            // whether it is a predicate or the start of a value.
            let inner = self.nested(|p| {
                p.stream.advance();
                let inner = p.expression()?;
                p.stream.expect(TokenKind::RParen)?;
                Ok(inner)
            })?;
            return match inner {
                Expression::Logical(logical) => Ok(Operand::Logical(logical)),
                Expression::Comparison(comparison) => {
                    Ok(Operand::Logical(LogicalExpr::Comparison(comparison)))
                }
                Expression::Value(value) => {
                    let value =
                        self.arithmetic_tail(ValueExpr::Parenthesized(Box::new(value)), 0)?;
                    self.comparison_tail(value)
                }
            };
        }

        let value = self.value_expression()?;
        self.comparison_tail(value)
    }

    fn comparison_tail(&mut self, left: ValueExpr) -> PResult<Operand> {
        if let Some(op) = self.comparison_operator() {
            self.stream.advance();
            let right = self.value_expression()?;
            return Ok(Operand::Logical(LogicalExpr::Comparison(
                ComparisonExpr::Compare { left, op, right },
            )));
        }

        if self.stream.eat_keyword(Keyword::In).is_some() {
            let list = self.value_list()?;
            return Ok(Operand::Logical(LogicalExpr::Comparison(ComparisonExpr::In {
                value: left,
                list,
            })));
        }

        Ok(match left {
            ValueExpr::FunctionCall(call) if call.family == FunctionFamily::Condition => {
                Operand::Logical(LogicalExpr::Boolean(call))
            }
            value => Operand::Value(value),
        })
    }

    fn comparison_operator(&mut self) -> Option<ComparisonOperator> {
        COMPARISON_OPERATORS
            .iter()
            .find(|(kind, _)| self.stream.at(*kind))
            .map(|(_, op)| *op)
    }

    /// `( literal (, literal)* )`
    fn value_list(&mut self) -> PResult<Vec<Literal>> {
        self.stream.expect(TokenKind::LParen)?;
        let mut list = vec![self.literal_value()?];
        while self.stream.eat(TokenKind::Comma).is_some() {
            list.push(self.literal_value()?);
        }
        self.stream.expect(TokenKind::RParen)?;
        Ok(list)
    }

    /// Whether a juxtaposed predicate starts here (no expectations recorded)
    fn at_logical_start(&self) -> bool {
        let token = self.stream.peek();
        if self.stop_at_from
            && matches!(
                token.kind,
                TokenKind::Keyword(Keyword::Source | Keyword::Index)
            )
            && self.stream.peek_nth(1).kind == TokenKind::Equal
        {
            return false;
        }
        match token.kind {
            TokenKind::LParen | TokenKind::Keyword(Keyword::Not) => true,
            TokenKind::Keyword(keyword)
                if VALUE_KEYWORDS.contains(&keyword)
                    || SingleFieldRelevance::from_keyword(keyword).is_some()
                    || MultiFieldRelevance::from_keyword(keyword).is_some() =>
            {
                true
            }
            _ => self.at_ident() || self.at_literal(),
        }
    }

    fn at_relevance(&self) -> bool {
        match self.stream.peek_kind() {
            TokenKind::Keyword(keyword) => {
                (SingleFieldRelevance::from_keyword(keyword).is_some()
                    || MultiFieldRelevance::from_keyword(keyword).is_some())
                    && self.stream.peek_nth(1).kind == TokenKind::LParen
            }
            _ => false,
        }
    }

    // ============ Value level ============

    pub(super) fn value_expression(&mut self) -> PResult<ValueExpr> {
        self.value_bp(0)
    }

    fn value_bp(&mut self, min_bp: u8) -> PResult<ValueExpr> {
        let lhs = self.value_primary()?;
        self.arithmetic_tail(lhs, min_bp)
    }

    fn arithmetic_tail(&mut self, lhs: ValueExpr, min_bp: u8) -> PResult<ValueExpr> {
        self.chained(|p| p.arithmetic_chain(lhs, min_bp))
    }

    fn arithmetic_chain(&mut self, mut lhs: ValueExpr, min_bp: u8) -> PResult<ValueExpr> {
        while let Some(op) = self.arithmetic_operator() {
            let bp = op.binding_power();
            if bp < min_bp {
                break;
            }
            self.link()?;
            self.stream.advance();
            let rhs = self.value_bp(bp + 1)?;
            lhs = ValueExpr::binary(lhs, op, rhs);
        }
        Ok(lhs)
    }

    fn arithmetic_operator(&mut self) -> Option<ArithmeticOperator> {
        ARITHMETIC_OPERATORS
            .iter()
            .find(|(kind, _)| self.stream.at(*kind))
            .map(|(_, op)| *op)
    }

    fn value_primary(&mut self) -> PResult<ValueExpr> {
        if self.at_literal() {
            return self.literal_value().map(ValueExpr::Literal);
        }

        let token = *self.stream.peek();
        let next = self.stream.peek_nth(1).kind;
        match token.kind {
            TokenKind::LParen => self.nested(|p| {
                p.stream.advance();
                let inner = p.value_expression()?;
                p.stream.expect(TokenKind::RParen)?;
                Ok(ValueExpr::Parenthesized(Box::new(inner)))
            }),
            TokenKind::Keyword(Keyword::Cast) => self.cast(),
            TokenKind::Keyword(Keyword::Extract) => self.extract(),
            TokenKind::Keyword(Keyword::GetFormat) => self.get_format(),
            TokenKind::Keyword(Keyword::Timestampadd | Keyword::Timestampdiff) => {
                self.timestamp_function()
            }
            TokenKind::Keyword(Keyword::Position) if next == TokenKind::LParen => self.position(),
            TokenKind::Keyword(keyword) if next == TokenKind::LParen => {
                match grammar().function_family(keyword) {
                    Some(family) => self.function_call(family).map(ValueExpr::FunctionCall),
                    None if is_ident_token(&token) => self.field(),
                    None => Err(self.value_expected()),
                }
            }
            _ if self.at_ident() => self.field(),
            _ => Err(self.value_expected()),
        }
    }

    fn field(&mut self) -> PResult<ValueExpr> {
        self.qualified_name().map(ValueExpr::Field)
    }

    fn value_expected(&mut self) -> crate::error::ParseError {
        self.stream.note_all([
            TokenKind::LParen,
            TokenKind::Integer,
            TokenKind::Decimal,
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::DquotaString,
            TokenKind::SquotaString,
            TokenKind::Ident,
            TokenKind::BquotaString,
        ]);
        self.stream
            .note_all(VALUE_KEYWORDS.iter().copied().map(TokenKind::Keyword));
        self.note_keyword_as_ident();
        self.stream.error()
    }
}
