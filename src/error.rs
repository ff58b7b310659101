use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop (or partially fail) an enrichment run.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} did not finish within {secs}s")]
    Timeout { program: String, secs: u64 },

    #[error("external tool failed (exit code {exit_code:?}): {stderr}")]
    ExternalTool { exit_code: Option<i32>, stderr: String },

    #[error("malformed tool output: {0}")]
    MalformedOutput(#[from] serde_json::Error),

    /// Raised after ingestion, so `hosts_ingested` hosts are already stored.
    #[error("could not save output to {}: {source}", path.display())]
    Persistence {
        path: PathBuf,
        hosts_ingested: usize,
        #[source]
        source: std::io::Error,
    },
}

impl EnrichmentError {
    /// Hosts that made it into storage before the error was raised.
    pub fn hosts_ingested(&self) -> usize {
        match self {
            EnrichmentError::Persistence { hosts_ingested, .. } => *hosts_ingested,
            _ => 0,
        }
    }
}
