//! Lexer for PPL query text
//!
//! Never fails: characters that start no token become [`TokenKind::Error`]
//! tokens and are left for the parser to report.

use winnow::ascii::{digit0, digit1, multispace0};
use winnow::combinator::{alt, opt, preceded, repeat};
use winnow::prelude::*;
use winnow::token::{any, none_of, one_of, take_while};

use crate::keyword::grammar;
use crate::token::{Span, Token, TokenKind};

type PResult<T> = winnow::ModalResult<T>;

/// Split `source` into tokens, always terminated by a single `Eof` token
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    let lines = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut rest = source;

    loop {
        if ws(&mut rest).is_err() || rest.is_empty() {
            break;
        }
        let start = source.len() - rest.len();
        let kind = match next_kind.parse_next(&mut rest) {
            Ok(kind) => kind,
            Err(_) => break,
        };
        let end = source.len() - rest.len();
        tokens.push(Token::new(kind, &source[start..end], lines.span(source, start, end)));
    }

    let end = source.len();
    tokens.push(Token::new(TokenKind::Eof, "", lines.span(source, end, end)));
    log::trace!("lexed {} tokens from {} bytes", tokens.len(), source.len());
    tokens
}

/// Strip the enclosing quotes of a string token and undo quote escapes
///
/// Only the enclosing quote character is unescaped (`\"` and `""` inside a
/// double-quoted string); other backslash sequences are kept verbatim so
/// regular expressions and grok patterns survive untouched.
pub fn unquote(raw: &str) -> String {
    let mut chars = raw.chars();
    let quote = match chars.next() {
        Some(q @ ('"' | '\'' | '`')) if raw.len() >= 2 && raw.ends_with(q) => q,
        _ => return raw.to_string(),
    };
    let inner = &raw[1..raw.len() - 1];

    let mut out = String::with_capacity(inner.len());
    let mut it = inner.chars().peekable();
    while let Some(c) = it.next() {
        match c {
            '\\' => match it.next() {
                Some(next) if next == quote => out.push(quote),
                Some(next) => {
                    out.push('\\');
                    out.push(next);
                }
                None => out.push('\\'),
            },
            c if c == quote && it.peek() == Some(&quote) => {
                it.next();
                out.push(quote);
            }
            c => out.push(c),
        }
    }
    out
}

/// Whether `text` lexes back to exactly one plain identifier token
pub fn is_plain_identifier(text: &str) -> bool {
    let tokens = tokenize(text);
    tokens.len() == 2 && tokens[0].kind == TokenKind::Ident && tokens[0].text == text
}

// ============ Token alternatives ============

fn next_kind(input: &mut &str) -> PResult<TokenKind> {
    alt((quoted_string, number, word, punctuation, any.value(TokenKind::Error))).parse_next(input)
}

fn quoted_string(input: &mut &str) -> PResult<TokenKind> {
    alt((
        quoted('"').value(TokenKind::DquotaString),
        quoted('\'').value(TokenKind::SquotaString),
        quoted('`').value(TokenKind::BquotaString),
    ))
    .parse_next(input)
}

/// Quoted text where a backslash escapes any character and a doubled quote
/// stands for itself. Backtracks when the closing quote is missing.
fn quoted<'a>(quote: char) -> impl FnMut(&mut &'a str) -> PResult<()> {
    move |input: &mut &'a str| {
        let body = alt((
            preceded('\\', any).void(),
            (quote, quote).void(),
            none_of([quote, '\\']).void(),
        ));
        (quote, repeat::<_, _, (), _, _>(0.., body), quote)
            .void()
            .parse_next(input)
    }
}

fn number(input: &mut &str) -> PResult<TokenKind> {
    alt((
        (digit0, '.', digit1).value(TokenKind::Decimal),
        digit1.value(TokenKind::Integer),
    ))
    .parse_next(input)
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '@' || c == '*'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '*' || c == '-'
}

fn word(input: &mut &str) -> PResult<TokenKind> {
    let text = (one_of(is_ident_start), take_while(0.., is_ident_continue))
        .take()
        .parse_next(input)?;

    if text == "*" {
        return Ok(TokenKind::Star);
    }

    if has_date_stem(text) {
        let suffix: Option<()> =
            opt(repeat::<_, _, (), _, _>(1.., ('.', digit1)).void()).parse_next(input)?;
        if suffix.is_some() {
            return Ok(TokenKind::IdDateSuffix);
        }
    }

    if opt(':').parse_next(input)?.is_some() {
        return Ok(TokenKind::Cluster);
    }

    Ok(grammar()
        .lookup(text)
        .map(TokenKind::Keyword)
        .unwrap_or(TokenKind::Ident))
}

/// `name-2021` style stem that may carry a `.MM.DD` date suffix
fn has_date_stem(text: &str) -> bool {
    match text.rfind('-') {
        Some(dash) => {
            let digits = &text[dash + 1..];
            dash > 0 && !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

fn punctuation(input: &mut &str) -> PResult<TokenKind> {
    alt((
        alt((
            "!=".value(TokenKind::NotEqual),
            "<=".value(TokenKind::NotGreater),
            ">=".value(TokenKind::NotLess),
            '|'.value(TokenKind::Pipe),
            ','.value(TokenKind::Comma),
            '.'.value(TokenKind::Dot),
            '='.value(TokenKind::Equal),
            '<'.value(TokenKind::Less),
            '>'.value(TokenKind::Greater),
            '+'.value(TokenKind::Plus),
            '-'.value(TokenKind::Minus),
        )),
        alt((
            '/'.value(TokenKind::Divide),
            '%'.value(TokenKind::Modulo),
            '^'.value(TokenKind::Caret),
            ':'.value(TokenKind::Colon),
            '('.value(TokenKind::LParen),
            ')'.value(TokenKind::RParen),
            '['.value(TokenKind::LBracket),
            ']'.value(TokenKind::RBracket),
            '\''.value(TokenKind::SingleQuote),
            '"'.value(TokenKind::DoubleQuote),
            '`'.value(TokenKind::Backtick),
        )),
    ))
    .parse_next(input)
}

fn ws(input: &mut &str) -> PResult<()> {
    multispace0.void().parse_next(input)
}

// ============ Positions ============

/// Byte offsets of line starts, for offset to line/column conversion
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    fn span(&self, source: &str, start: usize, end: usize) -> Span {
        let line = self.starts.partition_point(|&s| s <= start);
        let line_start = self.starts[line - 1];
        let column = source[line_start..start].chars().count() + 1;
        Span::new(start, end, line, column)
    }
}

// ============ Sanity Tests ============
