use crate::archive::error::ArchiveError;
use crate::rollup::error::RollupError;
use crate::station_csv::error::StationCsvError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EtlError {
    #[error(transparent)]
    StationCsv(#[from] StationCsvError),

    #[error(transparent)]
    Archive(#[from] ArchiveError),

    #[error(transparent)]
    Rollup(#[from] RollupError),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),
}
