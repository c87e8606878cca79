mod archive;
mod config;
mod error;
mod rollup;
mod station_csv;
mod types;
mod utils;

pub use config::*;
pub use error::EtlError;
pub use utils::get_cache_dir;

pub use types::data_source::{DataSource, HourlyVariable};
pub use types::location::{strachowice_station, wroclaw_locations, Geometry, GeometryKind, Location};
pub use types::record::{MonthlyRecord, Readings, WeatherRecord};
pub use types::year_chunk::{year_chunks, YearChunk, YearChunks};

pub use station_csv::aggregate::{aggregate_monthly, build_monthly_documents, MonthlyDocument};
pub use station_csv::aggregator::*;
pub use station_csv::encoding::decode_with_fallback;
pub use station_csv::reader::{discover_csv_files, read_station_rows};

pub use archive::axis::{format_timestamp, HourlyAxis};
pub use archive::client::CachedClient;
pub use archive::fetcher::{ArchiveFetcher, ArchiveRequest, FetchReport};
pub use archive::records::build_hourly_records;
pub use archive::response::{ArchiveResponse, HourlyBlock};

pub use rollup::monthly::{read_hourly_records, rollup_monthly, run_rollup, write_rollup};

pub use archive::error::ArchiveError;
pub use rollup::error::RollupError;
pub use station_csv::error::StationCsvError;
