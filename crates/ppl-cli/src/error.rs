//! Error type surfaced by the CLI.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Parse(#[from] ppl::Diagnostics),

    #[error("failed to read query: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no query given")]
    EmptyInput,
}

impl CliError {
    /// Process exit code: 1 for bad queries, 2 for everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Parse(_) | CliError::EmptyInput => 1,
            CliError::Io(_) | CliError::Json(_) => 2,
        }
    }
}
