use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StationCsvError {
    #[error("Failed to list input directory '{0}'")]
    InputDirRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to read CSV file '{0}'")]
    FileRead(PathBuf, #[source] std::io::Error),

    #[error("None of the candidate encodings ({candidates}) could decode '{path}'")]
    Undecodable { path: PathBuf, candidates: String },

    #[error("Parsing error reading CSV file '{path}'")]
    CsvReadPolars {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Column {index} ({column}) not found in '{path}', which has {width} columns")]
    MissingColumn {
        path: PathBuf,
        column: &'static str,
        index: usize,
        width: usize,
    },

    #[error("Polars operation failed for '{path}': {source}")]
    PolarsError {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },

    #[error("Failed processing DataFrame: {0}")]
    DataFrameProcessing(#[from] PolarsError),

    #[error("Failed to write output file '{0}'")]
    OutputWrite(PathBuf, #[source] std::io::Error),
}
