//! Recursive descent parser for PPL
//!
//! Consumes the token stream produced by [`crate::lexer::tokenize`] (or any
//! token slice ending in `Eof`) and assembles a [`Query`].

mod command;
mod expr;
mod function;
mod literal;
mod name;
mod stream;

use std::borrow::Cow;

use crate::ast::{Command, Query};
use crate::config::ParserConfig;
use crate::error::{Diagnostics, Expected, ParseError, Position};
use crate::lexer::tokenize;
use crate::token::{Span, Token, TokenKind};

use stream::TokenStream;

type PResult<T> = Result<T, ParseError>;

/// Parse a query with default limits
pub fn parse(source: &str) -> Result<Query, Diagnostics> {
    parse_with(source, &ParserConfig::default())
}

/// Parse a query, failing fast on the first syntax or resource error
pub fn parse_with(source: &str, config: &ParserConfig) -> Result<Query, Diagnostics> {
    check_input_size(source, config)?;
    let tokens = tokenize(source);
    parse_tokens(&tokens, config)
}

/// Parse an already lexed token sequence; a missing trailing `Eof` is added
pub fn parse_tokens(tokens: &[Token<'_>], config: &ParserConfig) -> Result<Query, Diagnostics> {
    let tokens = with_eof(tokens);
    check_token_count(&tokens, config)?;

    let mut parser = Parser::new(&tokens, config);
    let assembly = parser.assemble(false);
    match Diagnostics::from_errors(assembly.errors) {
        Some(diagnostics) => {
            log::debug!("parse failed with {} error(s)", diagnostics.len());
            Err(diagnostics)
        }
        None => {
            log::debug!("parsed query with {} command(s)", assembly.commands.len());
            Ok(Query {
                commands: assembly.commands,
            })
        }
    }
}

/// Result of [`parse_with_recovery`]
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutput {
    /// Commands that parsed cleanly; `None` if the generating command failed
    pub query: Option<Query>,
    pub errors: Vec<ParseError>,
}

impl ParseOutput {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }

    /// The complete query, or all collected diagnostics
    pub fn into_result(self) -> Result<Query, Diagnostics> {
        match Diagnostics::from_errors(self.errors) {
            Some(diagnostics) => Err(diagnostics),
            None => self.query.ok_or_else(|| {
                Diagnostics::from(ParseError::Syntax(crate::error::SyntaxError {
                    position: Position::new(0, 1, 1),
                    expected: Vec::new(),
                    found: TokenKind::Eof,
                    found_text: String::new(),
                    message: Some("empty query".to_string()),
                }))
            }),
        }
    }
}

/// Parse for editor tooling: a failed stage is recorded and skipped up to the
/// next `|`, and parsing carries on with the following stage.
///
/// Resource-limit errors still abort immediately.
pub fn parse_with_recovery(source: &str, config: &ParserConfig) -> ParseOutput {
    if let Err(diagnostics) = check_input_size(source, config) {
        return ParseOutput {
            query: None,
            errors: diagnostics.into_vec(),
        };
    }
    let tokens = tokenize(source);
    if let Err(diagnostics) = check_token_count(&tokens, config) {
        return ParseOutput {
            query: None,
            errors: diagnostics.into_vec(),
        };
    }

    let mut parser = Parser::new(&tokens, config);
    let assembly = parser.assemble(true);
    log::debug!(
        "recovering parse: {} command(s), {} error(s)",
        assembly.commands.len(),
        assembly.errors.len()
    );
    ParseOutput {
        query: assembly.source_ok.then_some(Query {
            commands: assembly.commands,
        }),
        errors: assembly.errors,
    }
}

fn with_eof<'t, 'src>(tokens: &'t [Token<'src>]) -> Cow<'t, [Token<'src>]> {
    match tokens.last() {
        Some(last) if last.kind == TokenKind::Eof => Cow::Borrowed(tokens),
        last => {
            let end = last.map(|t| t.span).unwrap_or_default();
            let span = Span::new(end.end, end.end, end.line.max(1), end.column.max(1));
            let mut owned = tokens.to_vec();
            owned.push(Token::new(TokenKind::Eof, "", span));
            Cow::Owned(owned)
        }
    }
}

fn check_input_size(source: &str, config: &ParserConfig) -> Result<(), Diagnostics> {
    if source.len() > config.max_input_bytes {
        log::warn!(
            "rejecting {} byte query, limit is {}",
            source.len(),
            config.max_input_bytes
        );
        return Err(ParseError::InputTooLarge {
            position: Position::new(0, 1, 1),
            size: source.len(),
            limit: config.max_input_bytes,
            unit: "bytes",
        }
        .into());
    }
    Ok(())
}

fn check_token_count(tokens: &[Token<'_>], config: &ParserConfig) -> Result<(), Diagnostics> {
    if tokens.len() > config.max_tokens {
        log::warn!(
            "rejecting query of {} tokens, limit is {}",
            tokens.len(),
            config.max_tokens
        );
        let position = tokens
            .get(config.max_tokens)
            .map(|t| t.span.into())
            .unwrap_or_default();
        return Err(ParseError::InputTooLarge {
            position,
            size: tokens.len(),
            limit: config.max_tokens,
            unit: "tokens",
        }
        .into());
    }
    Ok(())
}

/// Keep whichever error got further into the input; expectations of
/// syntax errors at the same position are merged.
fn furthest(first: ParseError, second: ParseError) -> ParseError {
    let (a, b) = (first.position().offset, second.position().offset);
    if a > b {
        return first;
    }
    if b > a {
        return second;
    }
    match (first, second) {
        (ParseError::Syntax(mut x), ParseError::Syntax(y)) => {
            for expected in y.expected {
                if !x.expected.contains(&expected) {
                    x.expected.push(expected);
                }
            }
            ParseError::Syntax(x)
        }
        (first, _) => first,
    }
}

// ============ Parser state ============

#[derive(Debug, Default)]
struct Assembly {
    commands: Vec<Command>,
    errors: Vec<ParseError>,
    source_ok: bool,
}

pub(crate) struct Parser<'t, 'src> {
    stream: TokenStream<'t, 'src>,
    config: ParserConfig,
    depth: usize,
    /// Binary operators above the node being built
    links: usize,
    /// Set while parsing the filter of `search <filter> source=...`
    stop_at_from: bool,
}

impl<'t, 'src> Parser<'t, 'src> {
    fn new(tokens: &'t [Token<'src>], config: &ParserConfig) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            config: *config,
            depth: 0,
            links: 0,
            stop_at_from: false,
        }
    }

    /// Generating command followed by `|`-separated stages
    fn assemble(&mut self, recover: bool) -> Assembly {
        let mut out = Assembly::default();
        let mut first = true;

        loop {
            let result = if first {
                self.source_command()
            } else {
                self.pipe_command()
            };
            match result.and_then(|command| self.end_of_stage().map(|()| command)) {
                Ok(command) => {
                    log::trace!("parsed `{}` stage", command.name());
                    out.source_ok |= first;
                    out.commands.push(command);
                }
                Err(err) => {
                    let fatal = err.is_resource_limit()
                        || (!recover && !matches!(err, ParseError::Lexical { .. }));
                    let reported = err.position();
                    out.errors.push(err);
                    if fatal {
                        return out;
                    }
                    out.errors.extend(self.stream.synchronize(reported));
                }
            }
            first = false;
            if self.stream.eat(TokenKind::Pipe).is_none() {
                break;
            }
        }
        out
    }

    fn end_of_stage(&mut self) -> PResult<()> {
        if self.stream.at(TokenKind::Pipe) || self.stream.at(TokenKind::Eof) {
            Ok(())
        } else {
            Err(self.stream.error())
        }
    }

    /// Run `f` one nesting level deeper
    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        if self.depth >= self.config.max_depth {
            log::warn!("nesting limit of {} reached", self.config.max_depth);
            return Err(ParseError::StackLimitExceeded {
                position: self.stream.position(),
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        let result = f(self);
        self.depth -= 1;
        result
    }

    /// Charge one more binary operator to the current expression path
    fn link(&mut self) -> PResult<()> {
        if self.links >= self.config.max_chain {
            log::warn!("operator chain limit of {} reached", self.config.max_chain);
            return Err(ParseError::StackLimitExceeded {
                position: self.stream.position(),
                limit: self.config.max_chain,
            });
        }
        self.links += 1;
        Ok(())
    }

    /// Run an operator loop, releasing the links it charged when it ends
    fn chained<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let base = self.links;
        let result = f(self);
        self.links = base;
        result
    }

    fn note_keyword_as_ident(&mut self) {
        self.stream.note(Expected::KeywordAsIdentifier);
    }
}

// ============ Sanity Tests ============
// Most testing is done via integration tests in tests/integration.rs

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Command, SearchCommand};

    #[test]
    fn parse_minimal_search() {
        let query = parse("source=logs").unwrap();
        assert_eq!(query.commands.len(), 1);
        assert!(matches!(
            &query.commands[0],
            Command::Search(SearchCommand::From(_))
        ));
    }

    #[test]
    fn parse_tokens_adds_missing_eof() {
        let mut tokens = tokenize("source=logs | head 3");
        tokens.pop();
        let query = parse_tokens(&tokens, &ParserConfig::default()).unwrap();
        assert_eq!(query.commands.len(), 2);
    }

    #[test]
    fn furthest_error_wins() {
        let near = ParseError::Lexical {
            position: Position::new(1, 1, 2),
            text: "#".into(),
        };
        let far = ParseError::StackLimitExceeded {
            position: Position::new(9, 1, 10),
            limit: 1,
        };
        assert_eq!(furthest(near.clone(), far.clone()), far);
        assert_eq!(furthest(far.clone(), near), far);
    }

    #[test]
    fn recovery_skips_failed_stages() {
        let output = parse_with_recovery(
            "source=logs | where | head 5 | bogus | fields a",
            &ParserConfig::default(),
        );
        assert_eq!(output.errors.len(), 2);
        let query = output.query.unwrap();
        let names: Vec<&str> = query.commands.iter().map(Command::name).collect();
        assert_eq!(names, vec!["search", "head", "fields"]);
    }

    #[test]
    fn lexical_errors_are_collected_per_stage() {
        let diagnostics = parse("source=logs | where a = # | head 1 | eval b = ~").unwrap_err();
        assert_eq!(diagnostics.len(), 2);
        assert!(
            diagnostics
                .iter()
                .all(|e| matches!(e, ParseError::Lexical { .. }))
        );
    }
}
