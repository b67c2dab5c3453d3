//! Token cursor for the recursive descent parser

use crate::error::{Expected, ParseError, Position, SyntaxError};
use crate::keyword::Keyword;
use crate::token::{Token, TokenKind};

/// Saved cursor position for backtracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Mark(usize);

/// Token stream with lookahead, backtracking and expected-token tracking.
///
/// Every failed `at`/`eat` records what would have matched at the current
/// position, so an error raised there lists all the alternatives tried.
pub(crate) struct TokenStream<'t, 'src> {
    tokens: &'t [Token<'src>],
    pos: usize,
    expected: Vec<Expected>,
    expected_at: usize,
}

impl<'t, 'src> TokenStream<'t, 'src> {
    /// `tokens` must end with an `Eof` token
    pub fn new(tokens: &'t [Token<'src>]) -> Self {
        debug_assert!(matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof));
        Self {
            tokens,
            pos: 0,
            expected: Vec::new(),
            expected_at: 0,
        }
    }

    /// Current token; sticks at `Eof`
    pub fn peek(&self) -> &Token<'src> {
        self.peek_nth(0)
    }

    pub fn peek_nth(&self, n: usize) -> &Token<'src> {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + n).min(last)]
    }

    pub fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub fn advance(&mut self) -> Token<'src> {
        let token = *self.peek();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    /// Check the current token kind, recording it as expected on mismatch
    pub fn at(&mut self, kind: TokenKind) -> bool {
        if self.peek_kind() == kind {
            true
        } else {
            self.note(Expected::Token(kind));
            false
        }
    }

    pub fn at_keyword(&mut self, keyword: Keyword) -> bool {
        self.at(TokenKind::Keyword(keyword))
    }

    pub fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        self.at(kind).then(|| self.advance())
    }

    pub fn eat_keyword(&mut self, keyword: Keyword) -> Option<Token<'src>> {
        self.eat(TokenKind::Keyword(keyword))
    }

    pub fn expect(&mut self, kind: TokenKind) -> Result<Token<'src>, ParseError> {
        self.eat(kind).ok_or_else(|| self.error())
    }

    pub fn expect_keyword(&mut self, keyword: Keyword) -> Result<Token<'src>, ParseError> {
        self.expect(TokenKind::Keyword(keyword))
    }

    /// Record an expectation at the current position
    pub fn note(&mut self, expected: Expected) {
        if self.expected_at != self.pos {
            self.expected.clear();
            self.expected_at = self.pos;
        }
        if !self.expected.contains(&expected) {
            self.expected.push(expected);
        }
    }

    pub fn note_all(&mut self, kinds: impl IntoIterator<Item = TokenKind>) {
        for kind in kinds {
            self.note(Expected::Token(kind));
        }
    }

    pub fn mark(&self) -> Mark {
        Mark(self.pos)
    }

    pub fn reset(&mut self, mark: Mark) {
        self.pos = mark.0;
    }

    pub fn position(&self) -> Position {
        self.peek().span.into()
    }

    /// Error at the current token with everything expected here so far.
    /// An error token is reported as a lexical error.
    pub fn error(&self) -> ParseError {
        let found = self.peek();
        if found.kind == TokenKind::Error {
            return ParseError::Lexical {
                position: found.span.into(),
                text: found.text.to_string(),
            };
        }
        let expected = if self.expected_at == self.pos {
            self.expected.clone()
        } else {
            Vec::new()
        };
        SyntaxError::new(found, expected).into()
    }

    /// Error at the current token carrying a message instead of expectations
    pub fn error_with_message(&self, message: impl Into<String>) -> ParseError {
        SyntaxError::new(self.peek(), Vec::new())
            .with_message(message)
            .into()
    }

    /// Skip to the next `|` or end of input.
    ///
    /// Error tokens passed over are returned as lexical errors, except one at
    /// `reported`, whose error was already recorded.
    pub fn synchronize(&mut self, reported: Position) -> Vec<ParseError> {
        let mut skipped = Vec::new();
        while !matches!(self.peek_kind(), TokenKind::Pipe | TokenKind::Eof) {
            let token = self.advance();
            if token.kind == TokenKind::Error && token.span.start != reported.offset {
                skipped.push(ParseError::Lexical {
                    position: token.span.into(),
                    text: token.text.to_string(),
                });
            }
        }
        skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    #[test]
    fn peek_sticks_at_eof() {
        let tokens = tokenize("a");
        let mut stream = TokenStream::new(&tokens);
        assert_eq!(stream.advance().kind, TokenKind::Ident);
        assert_eq!(stream.advance().kind, TokenKind::Eof);
        assert_eq!(stream.peek_nth(5).kind, TokenKind::Eof);
    }

    #[test]
    fn expectations_accumulate_per_position() {
        let tokens = tokenize("a b");
        let mut stream = TokenStream::new(&tokens);
        assert!(!stream.at(TokenKind::Comma));
        assert!(!stream.at(TokenKind::Pipe));
        let err = stream.error();
        let syntax = err.as_syntax().cloned();
        assert_eq!(
            syntax.map(|s| s.expected),
            Some(vec![
                Expected::Token(TokenKind::Comma),
                Expected::Token(TokenKind::Pipe)
            ])
        );

        stream.advance();
        assert!(!stream.at(TokenKind::Dot));
        let err = stream.error();
        assert_eq!(
            err.as_syntax().map(|s| s.expected.clone()),
            Some(vec![Expected::Token(TokenKind::Dot)])
        );
    }

    #[test]
    fn mark_and_reset() {
        let tokens = tokenize("a , b");
        let mut stream = TokenStream::new(&tokens);
        let mark = stream.mark();
        stream.advance();
        stream.advance();
        assert_eq!(stream.peek().text, "b");
        stream.reset(mark);
        assert_eq!(stream.peek().text, "a");
    }

    #[test]
    fn synchronize_reports_skipped_error_tokens() {
        let tokens = tokenize("a # b ~ | c");
        let mut stream = TokenStream::new(&tokens);
        let first_error = tokens[1].span.into();
        let skipped = stream.synchronize(first_error);
        assert_eq!(skipped.len(), 1);
        assert_eq!(stream.peek_kind(), TokenKind::Pipe);
    }
}
