//! Token model shared by the lexer and the parser

use std::fmt;

use crate::keyword::Keyword;

/// Source location of a token: byte range plus 1-based line/column of its start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Span {
    pub fn new(start: usize, end: usize, line: usize, column: usize) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword(Keyword),
    Ident,
    /// `logs-2021.01.11`
    IdDateSuffix,
    /// `remote:` prefix of a table name
    Cluster,
    Integer,
    Decimal,
    DquotaString,
    SquotaString,
    BquotaString,

    Pipe,
    Comma,
    Dot,
    Equal,
    NotEqual,
    Less,
    NotGreater,
    Greater,
    NotLess,
    Plus,
    Minus,
    Star,
    Divide,
    Modulo,
    Caret,
    Colon,
    LParen,
    RParen,
    LBracket,
    RBracket,
    SingleQuote,
    DoubleQuote,
    Backtick,

    /// Input the lexer could not classify
    Error,
    Eof,
}

impl TokenKind {
    pub fn keyword(self) -> Option<Keyword> {
        match self {
            TokenKind::Keyword(k) => Some(k),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Keyword(k) => return write!(f, "'{}'", k),
            TokenKind::Ident => "identifier",
            TokenKind::IdDateSuffix => "date-suffixed index name",
            TokenKind::Cluster => "cluster prefix",
            TokenKind::Integer => "integer",
            TokenKind::Decimal => "decimal",
            TokenKind::DquotaString => "double-quoted string",
            TokenKind::SquotaString => "single-quoted string",
            TokenKind::BquotaString => "backtick-quoted identifier",
            TokenKind::Pipe => "'|'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Equal => "'='",
            TokenKind::NotEqual => "'!='",
            TokenKind::Less => "'<'",
            TokenKind::NotGreater => "'<='",
            TokenKind::Greater => "'>'",
            TokenKind::NotLess => "'>='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Divide => "'/'",
            TokenKind::Modulo => "'%'",
            TokenKind::Caret => "'^'",
            TokenKind::Colon => "':'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBracket => "'['",
            TokenKind::RBracket => "']'",
            TokenKind::SingleQuote => "'''",
            TokenKind::DoubleQuote => "'\"'",
            TokenKind::Backtick => "'`'",
            TokenKind::Error => "unrecognized input",
            TokenKind::Eof => "end of input",
        };
        f.write_str(s)
    }
}

/// One lexed token; `text` borrows the query source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub text: &'src str,
    pub span: Span,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, span: Span) -> Self {
        Self { kind, text, span }
    }

    pub fn is_keyword(&self, keyword: Keyword) -> bool {
        self.kind == TokenKind::Keyword(keyword)
    }
}
