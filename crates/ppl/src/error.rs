//! Diagnostics produced while parsing a query

use std::fmt;

use thiserror::Error;

use crate::token::{Span, Token, TokenKind};

/// Location reported to users: byte offset plus 1-based line and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(offset: usize, line: usize, column: usize) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl From<Span> for Position {
    fn from(span: Span) -> Self {
        Self::new(span.start, span.line, span.column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column {}, offset {}",
            self.line, self.column, self.offset
        )
    }
}

/// One entry of the expected-token set of a syntax error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Expected {
    Token(TokenKind),
    /// Any reserved word that may double as an identifier
    KeywordAsIdentifier,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Token(kind) => write!(f, "{}", kind),
            Expected::KeywordAsIdentifier => f.write_str("keyword usable as identifier"),
        }
    }
}

/// No grammar alternative matched at `position`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub position: Position,
    pub expected: Vec<Expected>,
    pub found: TokenKind,
    pub found_text: String,
    /// Extra context for errors that are not a plain token mismatch
    pub message: Option<String>,
}

impl SyntaxError {
    pub fn new(found: &Token<'_>, expected: Vec<Expected>) -> Self {
        Self {
            position: found.span.into(),
            expected,
            found: found.kind,
            found_text: found.text.to_string(),
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn expects(&self, expected: Expected) -> bool {
        self.expected.contains(&expected)
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syntax error at {}: ", self.position)?;
        if let Some(message) = &self.message {
            write!(f, "{}, ", message)?;
        }
        match self.found {
            TokenKind::Eof => write!(f, "found end of input")?,
            kind => write!(f, "found {} `{}`", kind, self.found_text)?,
        }
        if !self.expected.is_empty() {
            let expected: Vec<String> = self.expected.iter().map(|e| e.to_string()).collect();
            write!(f, ", expected one of: {}", expected.join(", "))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("lexical error at {position}: unrecognized input `{text}`")]
    Lexical { position: Position, text: String },

    #[error("{0}")]
    Syntax(SyntaxError),

    #[error("expression nested deeper than {limit} levels at {position}")]
    StackLimitExceeded { position: Position, limit: usize },

    #[error("input too large at {position}: {size} {unit} exceeds the limit of {limit}")]
    InputTooLarge {
        position: Position,
        size: usize,
        limit: usize,
        unit: &'static str,
    },
}

impl ParseError {
    pub fn position(&self) -> Position {
        match self {
            ParseError::Lexical { position, .. }
            | ParseError::StackLimitExceeded { position, .. }
            | ParseError::InputTooLarge { position, .. } => *position,
            ParseError::Syntax(err) => err.position,
        }
    }

    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            ParseError::Syntax(err) => Some(err),
            _ => None,
        }
    }

    /// Resource-limit errors abort the whole parse, even in recovery mode
    pub fn is_resource_limit(&self) -> bool {
        matches!(
            self,
            ParseError::StackLimitExceeded { .. } | ParseError::InputTooLarge { .. }
        )
    }
}

impl From<SyntaxError> for ParseError {
    fn from(err: SyntaxError) -> Self {
        ParseError::Syntax(err)
    }
}

/// Ordered, never-empty list of parse errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    errors: Vec<ParseError>,
}

impl Diagnostics {
    /// Returns `None` when there is nothing to report
    pub fn from_errors(errors: Vec<ParseError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self { errors })
        }
    }

    pub fn first(&self) -> &ParseError {
        &self.errors[0]
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.errors.iter()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn into_vec(self) -> Vec<ParseError> {
        self.errors
    }
}

impl From<ParseError> for Diagnostics {
    fn from(err: ParseError) -> Self {
        Self { errors: vec![err] }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.errors.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}

impl std::error::Error for Diagnostics {}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a ParseError;
    type IntoIter = std::slice::Iter<'a, ParseError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
