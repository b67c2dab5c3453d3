//! Literal values

use super::{PResult, Parser};
use crate::ast::{DateTimeUnit, DecimalLiteral, IntegerLiteral, Literal, Sign};
use crate::keyword::{COMPLEX_DATETIME_PARTS, Keyword, SIMPLE_DATETIME_PARTS};
use crate::lexer::unquote;
use crate::token::TokenKind;

impl<'t, 'src> Parser<'t, 'src> {
    /// A sign directly before a number is part of the literal
    fn at_signed(&self, number: TokenKind) -> bool {
        matches!(self.stream.peek_kind(), TokenKind::Plus | TokenKind::Minus)
            && self.stream.peek_nth(1).kind == number
    }

    pub(super) fn at_integer(&mut self) -> bool {
        self.at_signed(TokenKind::Integer) || self.stream.at(TokenKind::Integer)
    }

    fn at_number(&self) -> bool {
        matches!(
            self.stream.peek_kind(),
            TokenKind::Integer | TokenKind::Decimal
        ) || self.at_signed(TokenKind::Integer)
            || self.at_signed(TokenKind::Decimal)
    }

    fn sign(&mut self) -> Option<Sign> {
        if self.stream.eat(TokenKind::Plus).is_some() {
            Some(Sign::Plus)
        } else if self.stream.eat(TokenKind::Minus).is_some() {
            Some(Sign::Minus)
        } else {
            None
        }
    }

    pub(super) fn integer_literal(&mut self) -> PResult<IntegerLiteral> {
        let sign = self.sign();
        let digits = self.stream.expect(TokenKind::Integer)?;
        Ok(IntegerLiteral {
            sign,
            digits: digits.text.to_string(),
        })
    }

    pub(super) fn decimal_literal(&mut self) -> PResult<DecimalLiteral> {
        let sign = self.sign();
        let digits = self.stream.expect(TokenKind::Decimal)?;
        Ok(DecimalLiteral {
            sign,
            digits: digits.text.to_string(),
        })
    }

    /// Integer or decimal, with optional sign
    pub(super) fn numeric_literal(&mut self) -> PResult<Literal> {
        let sign = self.sign();
        let token = *self.stream.peek();
        let digits = token.text.to_string();
        match token.kind {
            TokenKind::Integer => {
                self.stream.advance();
                Ok(Literal::Integer(IntegerLiteral { sign, digits }))
            }
            TokenKind::Decimal => {
                self.stream.advance();
                Ok(Literal::Decimal(DecimalLiteral { sign, digits }))
            }
            _ => {
                self.stream
                    .note_all([TokenKind::Integer, TokenKind::Decimal]);
                Err(self.stream.error())
            }
        }
    }

    pub(super) fn at_string(&self) -> bool {
        matches!(
            self.stream.peek_kind(),
            TokenKind::DquotaString | TokenKind::SquotaString
        )
    }

    pub(super) fn string_literal(&mut self) -> PResult<String> {
        if self.at_string() {
            return Ok(unquote(self.stream.advance().text));
        }
        self.stream
            .note_all([TokenKind::DquotaString, TokenKind::SquotaString]);
        Err(self.stream.error())
    }

    pub(super) fn boolean_literal(&mut self) -> PResult<bool> {
        if self.stream.eat_keyword(Keyword::True).is_some() {
            Ok(true)
        } else if self.stream.eat_keyword(Keyword::False).is_some() {
            Ok(false)
        } else {
            Err(self.stream.error())
        }
    }

    /// Whether a literal starts here (no expectations recorded)
    pub(super) fn at_literal(&self) -> bool {
        if self.at_number() || self.at_string() {
            return true;
        }
        match self.stream.peek_kind() {
            TokenKind::Keyword(Keyword::True | Keyword::False | Keyword::Interval) => true,
            TokenKind::Keyword(Keyword::Date | Keyword::Time | Keyword::Timestamp) => matches!(
                self.stream.peek_nth(1).kind,
                TokenKind::DquotaString | TokenKind::SquotaString
            ),
            _ => false,
        }
    }

    pub(super) fn literal_value(&mut self) -> PResult<Literal> {
        if self.at_number() {
            return self.numeric_literal();
        }
        if self.at_string() {
            return self.string_literal().map(Literal::String);
        }
        let token = *self.stream.peek();
        match token.kind {
            TokenKind::Keyword(Keyword::True) => {
                self.stream.advance();
                Ok(Literal::Boolean(true))
            }
            TokenKind::Keyword(Keyword::False) => {
                self.stream.advance();
                Ok(Literal::Boolean(false))
            }
            TokenKind::Keyword(Keyword::Interval) => self.nested(|p| {
                p.stream.advance();
                let value = p.value_expression()?;
                let unit = p.datetime_unit(true)?;
                Ok(Literal::Interval {
                    value: Box::new(value),
                    unit,
                })
            }),
            TokenKind::Keyword(keyword @ (Keyword::Date | Keyword::Time | Keyword::Timestamp))
                if self.at_literal() =>
            {
                self.stream.advance();
                let text = self.string_literal()?;
                Ok(match keyword {
                    Keyword::Date => Literal::Date(text),
                    Keyword::Time => Literal::Time(text),
                    _ => Literal::Timestamp(text),
                })
            }
            _ => {
                self.stream.note_all([
                    TokenKind::Integer,
                    TokenKind::Decimal,
                    TokenKind::Plus,
                    TokenKind::Minus,
                    TokenKind::DquotaString,
                    TokenKind::SquotaString,
                    TokenKind::Keyword(Keyword::True),
                    TokenKind::Keyword(Keyword::False),
                    TokenKind::Keyword(Keyword::Interval),
                    TokenKind::Keyword(Keyword::Date),
                    TokenKind::Keyword(Keyword::Time),
                    TokenKind::Keyword(Keyword::Timestamp),
                ]);
                Err(self.stream.error())
            }
        }
    }

    /// Date/time part keyword; compound parts such as `DAY_HOUR` only when allowed
    pub(super) fn datetime_unit(&mut self, allow_compound: bool) -> PResult<DateTimeUnit> {
        if let TokenKind::Keyword(keyword) = self.stream.peek_kind()
            && let Some(unit) = DateTimeUnit::from_keyword(keyword)
            && (allow_compound || !unit.is_compound())
        {
            self.stream.advance();
            return Ok(unit);
        }
        let parts = if allow_compound {
            [SIMPLE_DATETIME_PARTS, COMPLEX_DATETIME_PARTS].concat()
        } else {
            SIMPLE_DATETIME_PARTS.to_vec()
        };
        self.stream
            .note_all(parts.into_iter().map(TokenKind::Keyword));
        Err(self.stream.error())
    }
}
