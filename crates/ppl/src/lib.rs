//! PPL - Piped Processing Language parser
//!
//! Turns query text such as `source=logs | where status=500 | stats count() by host`
//! into a typed syntax tree, with positioned diagnostics on failure.
//!
//! ## Quick Start
//!
//! ```
//! use ppl::{Command, parse};
//!
//! let query = parse("source=logs | where status=500 | stats count() by host")?;
//! assert_eq!(query.commands.len(), 3);
//! assert!(matches!(query.commands[1], Command::Where(_)));
//!
//! // Printed text parses back to the same tree
//! assert_eq!(parse(&query.to_string())?, query);
//! # Ok::<(), ppl::Diagnostics>(())
//! ```
//!
//! ## Errors
//!
//! Syntax errors carry the position of the offending token and the set of
//! tokens that would have been accepted there:
//!
//! ```
//! use ppl::{Expected, TokenKind, parse};
//!
//! let err = parse("search source=").unwrap_err();
//! let syntax = err.first().as_syntax().unwrap();
//! assert_eq!(syntax.found, TokenKind::Eof);
//! assert!(syntax.expects(Expected::Token(TokenKind::Ident)));
//! ```
//!
//! ## Limits and recovery
//!
//! - [`ParserConfig`] bounds nesting depth, input bytes and token count
//! - [`parse_with_recovery`] skips a broken stage up to the next `|` and keeps going

pub mod ast;
mod config;
mod error;
mod keyword;
mod lexer;
mod parse;
mod pretty;
mod token;
mod visit;

// ============ Primary Public API ============

pub use ast::{Command, Expression, Query};
pub use config::{
    DEFAULT_MAX_CHAIN, DEFAULT_MAX_DEPTH, DEFAULT_MAX_INPUT_BYTES, DEFAULT_MAX_TOKENS, ParserConfig,
};
pub use parse::{ParseOutput, parse, parse_tokens, parse_with, parse_with_recovery};
pub use pretty::pretty;

// ============ Errors ============

pub use error::{Diagnostics, Expected, ParseError, Position, SyntaxError};

// ============ Tokens and grammar tables ============

pub use keyword::{FunctionFamily, GrammarTables, Keyword, grammar};
pub use lexer::{is_plain_identifier, tokenize, unquote};
pub use token::{Span, Token, TokenKind};

// ============ Tree walking ============

pub use visit::{
    Visitor, walk_command, walk_comparison_expr, walk_decimal_literal, walk_expression,
    walk_from_clause, walk_function_call, walk_integer_literal, walk_literal, walk_logical_expr,
    walk_qualified_name, walk_query, walk_relevance_expr, walk_table_source, walk_value_expr,
    walk_wildcard_name,
};
