//! PPL CLI
//!
//! A thin wrapper around the ppl-cli library.

use std::io::Read;
use std::process::ExitCode;

use clap::Parser;
use ppl_cli::{CliError, Options, OutputFormat};

#[derive(Parser)]
#[command(name = "ppl")]
#[command(about = "Parse, check and format PPL queries")]
#[command(after_help = "\
EXAMPLES:
    # Format a query
    ppl 'source=logs | where status=500 | stats count() by host'

    # Read from stdin and dump the syntax tree as JSON
    echo 'source=logs | head 5' | ppl --format json

    # Report every broken stage instead of stopping at the first
    ppl --recover 'source=logs | where | bogus | head 5'
")]
struct Args {
    /// Query text; read from stdin when omitted
    query: Option<String>,

    /// Output format for a successfully parsed query
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,

    /// Shorthand for --format json
    #[arg(long, conflicts_with = "format")]
    json: bool,

    /// Line width before the pipeline is broken one stage per line
    #[arg(short, long, default_value = "100")]
    width: usize,

    /// Skip broken stages and report every error
    #[arg(long)]
    recover: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let source = match read_query(args.query) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(2);
        }
    };

    let options = Options {
        format: if args.json { OutputFormat::Json } else { args.format },
        width: args.width,
        recover: args.recover,
    };

    match ppl_cli::check(&source, &options) {
        Ok(out) => {
            println!("{out}");
            ExitCode::SUCCESS
        }
        Err(CliError::Parse(diagnostics)) => {
            log::debug!("query rejected with {} error(s)", diagnostics.len());
            eprint!("{}", ppl_cli::annotate(&source, &diagnostics));
            ExitCode::from(1)
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

fn read_query(arg: Option<String>) -> anyhow::Result<String> {
    if let Some(query) = arg {
        return Ok(query);
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .map_err(CliError::from)?;
    Ok(buf)
}
