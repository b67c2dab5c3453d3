//! Identifiers, qualified names, wildcards and table sources

use super::{PResult, Parser};
use crate::ast::{Ident, QualifiedName, QuoteStyle, TableSource, Wildcard, WildcardQualifiedName};
use crate::keyword::grammar;
use crate::lexer::unquote;
use crate::token::{Token, TokenKind};

impl<'t, 'src> Parser<'t, 'src> {
    /// Whether the current token can start an identifier (no expectations recorded)
    pub(super) fn at_ident(&self) -> bool {
        is_ident_token(self.stream.peek())
            || (self.stream.peek_kind() == TokenKind::Dot
                && self.stream.peek_nth(1).kind == TokenKind::Ident)
    }

    /// Identifier: plain, backtick-quoted, `.hidden`, or a reserved word that
    /// doubles as an identifier
    pub(super) fn ident(&mut self) -> PResult<Ident> {
        if self.stream.peek_kind() == TokenKind::Dot
            && self.stream.peek_nth(1).kind == TokenKind::Ident
        {
            self.stream.advance();
            let name = self.stream.advance();
            return Ok(Ident::new(format!(".{}", name.text)));
        }
        self.name_segment()
    }

    /// Identifier after a `.` separator, where the `.hidden` form is not allowed
    fn name_segment(&mut self) -> PResult<Ident> {
        let token = *self.stream.peek();
        match token.kind {
            TokenKind::Ident => {
                self.stream.advance();
                Ok(Ident::new(token.text))
            }
            TokenKind::BquotaString => {
                self.stream.advance();
                Ok(Ident::new(unquote(token.text)))
            }
            TokenKind::Keyword(keyword) if grammar().can_be_ident(keyword) => {
                log::trace!("reserved word `{}` used as identifier", token.text);
                self.stream.advance();
                Ok(Ident::new(token.text))
            }
            _ => {
                self.stream
                    .note_all([TokenKind::Ident, TokenKind::BquotaString]);
                self.note_keyword_as_ident();
                Err(self.stream.error())
            }
        }
    }

    pub(super) fn qualified_name(&mut self) -> PResult<QualifiedName> {
        let first = self.ident()?;
        let mut rest = Vec::new();
        while self.stream.eat(TokenKind::Dot).is_some() {
            rest.push(self.name_segment()?);
        }
        Ok(QualifiedName::new(first, rest))
    }

    /// `name (, name)*`
    pub(super) fn field_list(&mut self) -> PResult<Vec<QualifiedName>> {
        let mut fields = vec![self.qualified_name()?];
        while self.stream.eat(TokenKind::Comma).is_some() {
            fields.push(self.qualified_name()?);
        }
        Ok(fields)
    }

    pub(super) fn wildcard(&mut self) -> PResult<Wildcard> {
        let token = *self.stream.peek();
        let wildcard = match token.kind {
            TokenKind::Ident => Wildcard::pattern(token.text),
            TokenKind::Star => Wildcard::pattern("*"),
            TokenKind::Keyword(keyword) if grammar().can_be_ident(keyword) => {
                Wildcard::pattern(token.text)
            }
            TokenKind::BquotaString | TokenKind::SquotaString | TokenKind::DquotaString => {
                quoted_wildcard(token.text)
            }
            _ => {
                self.stream.note_all([
                    TokenKind::Ident,
                    TokenKind::Star,
                    TokenKind::BquotaString,
                    TokenKind::SquotaString,
                    TokenKind::DquotaString,
                ]);
                self.note_keyword_as_ident();
                return Err(self.stream.error());
            }
        };
        self.stream.advance();
        Ok(wildcard)
    }

    pub(super) fn wildcard_qualified_name(&mut self) -> PResult<WildcardQualifiedName> {
        let first = self.wildcard()?;
        let mut rest = Vec::new();
        while self.stream.eat(TokenKind::Dot).is_some() {
            rest.push(self.wildcard()?);
        }
        Ok(WildcardQualifiedName::new(first, rest))
    }

    /// `[cluster:]name(.name)*` or a date-suffixed index name
    pub(super) fn table_source(&mut self) -> PResult<TableSource> {
        if let Some(token) = self.stream.eat(TokenKind::IdDateSuffix) {
            return Ok(TableSource::DateSuffixed(token.text.to_string()));
        }
        let cluster = self
            .stream
            .eat(TokenKind::Cluster)
            .map(|token| token.text.trim_end_matches(':').to_string());
        let name = self.qualified_name()?;
        Ok(TableSource::Name { cluster, name })
    }

    pub(super) fn table_source_list(&mut self) -> PResult<Vec<TableSource>> {
        let mut tables = vec![self.table_source()?];
        while self.stream.eat(TokenKind::Comma).is_some() {
            tables.push(self.table_source()?);
        }
        Ok(tables)
    }
}

pub(super) fn is_ident_token(token: &Token<'_>) -> bool {
    match token.kind {
        TokenKind::Ident | TokenKind::BquotaString => true,
        TokenKind::Keyword(keyword) => grammar().can_be_ident(keyword),
        _ => false,
    }
}

/// Quoted wildcard text; quotes nested inside the string wrap again
fn quoted_wildcard(raw: &str) -> Wildcard {
    let inner = unquote(raw);
    let style = raw
        .chars()
        .next()
        .and_then(QuoteStyle::from_char)
        .unwrap_or(QuoteStyle::Single);
    let inner = match inner.chars().next().and_then(QuoteStyle::from_char) {
        Some(nested) if inner.len() >= 2 && inner.ends_with(nested.quote_char()) => {
            quoted_wildcard(&inner)
        }
        _ => Wildcard::Pattern(inner),
    };
    Wildcard::Quoted {
        style,
        inner: Box::new(inner),
    }
}
