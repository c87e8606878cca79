//! Run configuration for the three pipelines.
//!
//! Each pipeline entry point takes one of these structs instead of reading global
//! constants, so tests can point it at temporary folders and alternate endpoints.
//! `Default` (or [`FetcherConfig::from_defaults`]) carries the production values.

use crate::error::EtlError;
use crate::types::data_source::HourlyVariable;
use crate::types::location::{strachowice_station, wroclaw_locations, Location};
use crate::utils::get_cache_dir;
use bon::Builder;
use chrono::{NaiveDate, Utc};
use encoding_rs::{Encoding, ISO_8859_2, WINDOWS_1250, WINDOWS_1252};
use std::path::PathBuf;
use std::time::Duration;

pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

/// First day requested from the archive.
pub const ARCHIVE_START: NaiveDate = date(2015, 1, 1);
/// Last day requested from the archive (the full November 2025).
pub const ARCHIVE_END: NaiveDate = date(2025, 11, 30);

/// Code of the Wroclaw-Strachowice station in the IMGW-PIB exports.
pub const STRACHOWICE_STATION_CODE: i64 = 351160424;

const CACHE_EXPIRY: Duration = Duration::from_secs(60 * 60 * 24 * 30);

const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => date,
        None => panic!("invalid calendar date"),
    }
}

/// Zero-based positions of the retained fields in an IMGW `s_d` daily synop row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationColumns {
    pub station: usize,
    pub year: usize,
    pub month: usize,
    pub temperature: usize,
    pub precipitation: usize,
    pub wind: usize,
}

impl Default for StationColumns {
    fn default() -> Self {
        Self {
            station: 0,
            year: 2,
            month: 3,
            temperature: 9,
            precipitation: 13,
            wind: 20,
        }
    }
}

/// Candidate encodings for the station exports, most likely first.
///
/// `latin1` resolves to windows-1252 under the WHATWG encoding standard.
pub fn default_encodings() -> Vec<&'static Encoding> {
    vec![ISO_8859_2, WINDOWS_1250, WINDOWS_1252]
}

/// Settings of the station-CSV aggregator.
#[derive(Debug, Clone, Builder)]
pub struct AggregatorConfig {
    /// Folder holding the `s_d_*.csv` exports.
    #[builder(into)]
    pub input_dir: PathBuf,
    #[builder(into, default = "s_d_".to_string())]
    pub file_prefix: String,
    #[builder(into, default = "csv".to_string())]
    pub file_extension: String,
    #[builder(into)]
    pub output_path: PathBuf,
    pub station_code: i64,
    /// Name and coordinates written into every monthly document.
    pub site: Location,
    #[builder(default = default_encodings())]
    pub encodings: Vec<&'static Encoding>,
    #[builder(default)]
    pub columns: StationColumns,
    /// Also write `year` and `month` fields, the shape of the hourly rollup output.
    #[builder(default)]
    pub calendar_fields: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        AggregatorConfig::builder()
            .input_dir("imgw_dane")
            .output_path("pogoda_wroclaw_2015_2025_FINAL.json")
            .station_code(STRACHOWICE_STATION_CODE)
            .site(strachowice_station())
            .build()
    }
}

/// Retry budget for archive requests.
///
/// The n-th retry waits `backoff_factor * 2^(n-1)` seconds, except the first retry which
/// goes out immediately. Waits are capped at `max_backoff`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub retries: u32,
    pub backoff_factor: f64,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retries: 5,
            backoff_factor: 0.4,
            max_backoff: Duration::from_secs(120),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `retry` (1-based).
    pub fn backoff(&self, retry: u32) -> Duration {
        if retry <= 1 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(retry - 1).unwrap_or(i32::MAX);
        let seconds = self.backoff_factor * 2f64.powi(exponent);
        Duration::try_from_secs_f64(seconds)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }
}

/// Settings of the archive fetcher.
#[derive(Debug, Clone, Builder)]
pub struct FetcherConfig {
    #[builder(default = wroclaw_locations())]
    pub locations: Vec<Location>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[builder(default = HourlyVariable::ALL.to_vec())]
    pub variables: Vec<HourlyVariable>,
    /// NDJSON output, truncated at the start of every run.
    #[builder(into)]
    pub output_path: PathBuf,
    #[builder(into, default = ARCHIVE_URL.to_string())]
    pub base_url: String,
    /// Folder of the on-disk HTTP response cache.
    #[builder(into)]
    pub cache_dir: PathBuf,
    #[builder(default = CACHE_EXPIRY)]
    pub cache_expiry: Duration,
    #[builder(default)]
    pub retry: RetryPolicy,
}

impl FetcherConfig {
    /// The production configuration: five Wroclaw points from 2015-01-01 up to
    /// 2025-11-30 (or today, whichever comes first), cached under the user cache folder.
    ///
    /// # Errors
    ///
    /// Returns [`EtlError::CacheDirResolution`] if the user cache folder cannot be found.
    pub fn from_defaults() -> Result<Self, EtlError> {
        let cache_dir = get_cache_dir().map_err(EtlError::CacheDirResolution)?;
        Ok(FetcherConfig::builder()
            .start_date(ARCHIVE_START)
            .end_date(ARCHIVE_END.min(Utc::now().date_naive()))
            .output_path("wroclaw_openmeteo_hourly_2015_2025_11_30.jsonl")
            .cache_dir(cache_dir.join("openmeteo"))
            .build())
    }
}

/// Settings of the hourly-to-monthly rollup.
#[derive(Debug, Clone, Builder)]
pub struct RollupConfig {
    #[builder(into)]
    pub input_path: PathBuf,
    #[builder(into)]
    pub output_path: PathBuf,
}

impl Default for RollupConfig {
    fn default() -> Self {
        RollupConfig::builder()
            .input_path("wroclaw_openmeteo_hourly_2015_2025_11_30.jsonl")
            .output_path("wroclaw_openmeteo_monthly.json")
            .build()
    }
}
