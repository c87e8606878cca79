//! Downloads the hourly archive for every configured location, one calendar year at a
//! time, and appends it to an NDJSON file.
//!
//! Unlike the station aggregator this job is fail-fast: the first network, decoding or
//! validation error aborts the run. Records already appended stay in the file.

use crate::archive::client::CachedClient;
use crate::archive::error::ArchiveError;
use crate::archive::records::build_hourly_records;
use crate::archive::response::ArchiveResponse;
use crate::config::FetcherConfig;
use crate::types::data_source::HourlyVariable;
use crate::types::location::Location;
use crate::types::record::WeatherRecord;
use crate::types::year_chunk::{year_chunks, YearChunk};
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;

const TIMEZONE: &str = "UTC";

/// Query parameters of one archive call.
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveRequest<'a> {
    pub location: &'a Location,
    pub chunk: YearChunk,
    pub variables: &'a [HourlyVariable],
}

impl ArchiveRequest<'_> {
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let hourly = self
            .variables
            .iter()
            .map(HourlyVariable::api_name)
            .collect::<Vec<_>>()
            .join(",");
        vec![
            ("latitude", self.location.latitude.to_string()),
            ("longitude", self.location.longitude.to_string()),
            ("start_date", self.chunk.start.to_string()),
            ("end_date", self.chunk.end.to_string()),
            ("hourly", hourly),
            ("timezone", TIMEZONE.to_string()),
            ("timeformat", "unixtime".to_string()),
        ]
    }
}

/// Summary of a completed fetch run.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport {
    pub output: PathBuf,
    pub chunks: usize,
    pub records: usize,
}

pub struct ArchiveFetcher {
    client: CachedClient,
    config: FetcherConfig,
}

impl ArchiveFetcher {
    /// Creates a fetcher, making sure the response cache folder exists.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::CacheDirCreation`] if the cache folder cannot be created.
    pub async fn new(config: FetcherConfig) -> Result<Self, ArchiveError> {
        let client = CachedClient::new(&config.cache_dir, config.cache_expiry, config.retry).await?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    pub fn client(&self) -> &CachedClient {
        &self.client
    }

    pub fn request_for<'a>(&'a self, location: &'a Location, chunk: YearChunk) -> ArchiveRequest<'a> {
        ArchiveRequest {
            location,
            chunk,
            variables: &self.config.variables,
        }
    }

    /// Fetches and validates the hourly records of one location for one chunk.
    pub async fn fetch_chunk(
        &self,
        location: &Location,
        chunk: YearChunk,
    ) -> Result<Vec<WeatherRecord>, ArchiveError> {
        let request = self.request_for(location, chunk);
        let body = self
            .client
            .get(&self.config.base_url, &request.query())
            .await?;
        let response: ArchiveResponse =
            serde_json::from_slice(&body).map_err(|e| ArchiveError::ResponseDecode {
                location: location.name.clone(),
                chunk,
                source: e,
            })?;
        debug!(
            "{} served from grid cell {}, {}",
            location.name, response.latitude, response.longitude
        );
        if response.utc_offset_seconds != 0 {
            warn!(
                "{} {}: expected UTC times, got an offset of {}s",
                location.name, chunk, response.utc_offset_seconds
            );
        }
        build_hourly_records(location, chunk, &response, &self.config.variables)
    }

    /// Truncates the output file, then fetches every location/chunk pair in order
    /// (locations outer, years inner) and appends each chunk as soon as it is validated.
    pub async fn run(&self) -> Result<FetchReport, ArchiveError> {
        let output = &self.config.output_path;
        fs::write(output, b"")
            .await
            .map_err(|e| ArchiveError::OutputWrite(output.clone(), e))?;

        let variables: Vec<&str> = self.config.variables.iter().map(|v| v.api_name()).collect();
        info!("Output: {}", output.display());
        info!(
            "Range: {} .. {}",
            self.config.start_date, self.config.end_date
        );
        info!("Variables: {}", variables.join(", "));
        info!("Locations: {}", self.config.locations.len());

        let mut report = FetchReport {
            output: output.clone(),
            chunks: 0,
            records: 0,
        };
        for location in &self.config.locations {
            for chunk in year_chunks(self.config.start_date, self.config.end_date) {
                info!("-> {}: {} ({} days)", location.name, chunk, chunk.days());
                let records = self.fetch_chunk(location, chunk).await?;
                append_ndjson(output, &records).await?;
                info!("   {} hourly records", records.len());
                report.chunks += 1;
                report.records += records.len();
            }
        }

        info!("Done. Hourly records: {}", report.records);
        Ok(report)
    }
}

/// Appends `records` to `path`, one JSON object per line.
pub(crate) async fn append_ndjson(path: &Path, records: &[WeatherRecord]) -> Result<(), ArchiveError> {
    let mut buffer = Vec::with_capacity(records.len() * 256);
    for record in records {
        serde_json::to_writer(&mut buffer, record)?;
        buffer.push(b'\n');
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(|e| ArchiveError::OutputWrite(path.to_path_buf(), e))?;
    file.write_all(&buffer)
        .await
        .map_err(|e| ArchiveError::OutputWrite(path.to_path_buf(), e))?;
    file.flush()
        .await
        .map_err(|e| ArchiveError::OutputWrite(path.to_path_buf(), e))
}
