use crate::types::data_source::HourlyVariable;
use crate::types::year_chunk::YearChunk;
use std::path::PathBuf;
use std::time::SystemTimeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to read metadata for cache file '{0}'")]
    CacheMetadataRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to calculate system time difference for {0:?}")]
    SystemTimeCalculation(PathBuf, #[source] SystemTimeError),

    #[error("Failed to read cache file '{0}'")]
    CacheRead(PathBuf, #[source] std::io::Error),

    #[error("Failed to write cache file '{0}'")]
    CacheWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {0}")]
    NetworkRequest(String, #[source] reqwest::Error),

    #[error("HTTP request failed for {url} with status {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to decode archive response for {location} {chunk}")]
    ResponseDecode {
        location: String,
        chunk: YearChunk,
        #[source]
        source: serde_json::Error,
    },

    #[error("No response from the archive API for {location} {chunk}")]
    EmptyResponse { location: String, chunk: YearChunk },

    #[error("Invalid time axis for {location} {chunk}: {message}")]
    InvalidTimeAxis {
        location: String,
        chunk: YearChunk,
        message: String,
    },

    #[error("Archive response for {location} {chunk} has no '{variable}' series")]
    MissingVariable {
        location: String,
        chunk: YearChunk,
        variable: HourlyVariable,
    },

    #[error(
        "Inconsistent series length for {location} {chunk}: {variable}: {values} vs time: {timestamps}"
    )]
    SeriesLengthMismatch {
        location: String,
        chunk: YearChunk,
        variable: HourlyVariable,
        values: usize,
        timestamps: usize,
    },

    #[error("Failed to write output file '{0}'")]
    OutputWrite(PathBuf, #[source] std::io::Error),

    #[error("Failed to serialize hourly records")]
    Serialize(#[from] serde_json::Error),
}

impl ArchiveError {
    /// Whether retrying the same request may succeed.
    pub(crate) fn is_transient(&self) -> bool {
        match self {
            ArchiveError::NetworkRequest(_, e) => e.is_connect() || e.is_timeout() || e.is_request(),
            ArchiveError::HttpStatus { status, .. } => {
                matches!(status.as_u16(), 429 | 500 | 502 | 503 | 504)
            }
            _ => false,
        }
    }
}
