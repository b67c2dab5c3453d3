//! PPL CLI - parse, check and format PPL queries from the command line
//!
//! A thin layer over the `ppl` crate: the binary reads a query, runs it
//! through [`check`], and prints either the formatted query, its syntax tree
//! or caret-annotated diagnostics.
//!
//! # Example
//!
//! ```
//! use ppl_cli::{Options, OutputFormat, check};
//!
//! let options = Options { format: OutputFormat::Pretty, width: 80, recover: false };
//! let out = check("source=logs | where status=500", &options)?;
//! assert_eq!(out, "search source=logs | where status = 500");
//! # Ok::<(), ppl_cli::CliError>(())
//! ```

pub mod error;

pub use error::CliError;

use std::fmt;

use ppl::{ParseError, ParserConfig, Query};

/// How a successfully parsed query is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Canonical PPL, one stage per line past the width
    #[default]
    Pretty,
    /// Rust debug dump of the syntax tree
    Debug,
    /// Syntax tree as JSON
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub format: OutputFormat,
    pub width: usize,
    /// Keep going past broken stages and report every error
    pub recover: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            format: OutputFormat::Pretty,
            width: 100,
            recover: false,
        }
    }
}

/// Parse `source` and render it per `options`
pub fn check(source: &str, options: &Options) -> Result<String, CliError> {
    if source.trim().is_empty() {
        return Err(CliError::EmptyInput);
    }

    let config = ParserConfig::default();
    if options.recover {
        let output = ppl::parse_with_recovery(source, &config);
        log::debug!("recovered {} error(s)", output.errors.len());
        let query = output.into_result()?;
        return render(&query, options);
    }

    let query = ppl::parse_with(source, &config)?;
    log::debug!("parsed {} command(s)", query.commands.len());
    render(&query, options)
}

pub fn render(query: &Query, options: &Options) -> Result<String, CliError> {
    Ok(match options.format {
        OutputFormat::Pretty => ppl::pretty(query, options.width),
        OutputFormat::Debug => format!("{query:#?}"),
        OutputFormat::Json => serde_json::to_string_pretty(query)?,
    })
}

// ============ Diagnostics ============

/// Render each error under the offending source line with a caret
pub fn annotate(source: &str, errors: &ppl::Diagnostics) -> String {
    Annotated { source, errors }.to_string()
}

struct Annotated<'a> {
    source: &'a str,
    errors: &'a ppl::Diagnostics,
}

impl fmt::Display for Annotated<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for err in self.errors {
            write_annotation(f, self.source, err)?;
        }
        Ok(())
    }
}

fn write_annotation(f: &mut fmt::Formatter<'_>, source: &str, err: &ParseError) -> fmt::Result {
    let position = err.position();
    writeln!(f, "error: {err}")?;
    let Some(line) = source.lines().nth(position.line.saturating_sub(1)) else {
        return Ok(());
    };
    let gutter = position.line.to_string();
    writeln!(f, "{gutter} | {line}")?;
    let pad = gutter.len() + 3 + position.column.saturating_sub(1);
    writeln!(f, "{:pad$}^", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_output_is_canonical() {
        let out = check("  source=logs|where a=1  ", &Options::default()).unwrap();
        assert_eq!(out, "search source=logs | where a = 1");
    }

    #[test]
    fn json_output_has_commands() {
        let options = Options {
            format: OutputFormat::Json,
            ..Options::default()
        };
        let out = check("source=logs | head 5", &options).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["commands"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn empty_input_is_rejected() {
        let err = check("   ", &Options::default()).unwrap_err();
        assert!(matches!(err, CliError::EmptyInput));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn recover_reports_every_error() {
        let options = Options {
            recover: true,
            ..Options::default()
        };
        let Err(CliError::Parse(diagnostics)) = check("source=t | where | bogus", &options) else {
            panic!("expected parse errors");
        };
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn caret_points_at_error() {
        let source = "source=logs\n| fields a b";
        let Err(CliError::Parse(diagnostics)) = check(source, &Options::default()) else {
            panic!("expected parse error");
        };
        let text = annotate(source, &diagnostics);
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("error: syntax error at line 2, column 12"));
        assert_eq!(lines[1], "2 | | fields a b");
        assert_eq!(lines[2], format!("{}^", " ".repeat(15)));
    }

    #[test]
    fn every_error_is_annotated() {
        let source = "source=t | where | bogus";
        let output = ppl::parse_with_recovery(source, &ParserConfig::default());
        let Err(diagnostics) = output.into_result() else {
            panic!("expected parse errors");
        };
        let text = annotate(source, &diagnostics);
        assert_eq!(text.matches("error: ").count(), 2);
        assert_eq!(text.lines().count(), 6);
        assert!(text.lines().all(|line| !line.is_empty()));
    }
}
