use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RollupError {
    #[error("Failed to read hourly records from '{0}'")]
    InputRead(PathBuf, #[source] std::io::Error),

    #[error("Malformed record on line {line} of '{path}'")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid timestamp '{timestamp}' for {location}")]
    InvalidTimestamp {
        location: String,
        timestamp: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Failed to write output file '{0}'")]
    OutputWrite(PathBuf, #[source] std::io::Error),
}
