use crate::config::{AggregatorConfig, StationColumns};
use crate::station_csv::encoding::{decode_with_fallback, encoding_names};
use crate::station_csv::error::StationCsvError;
use log::{debug, warn};
use polars::prelude::*;
use std::io::Cursor;
use std::path::{Path, PathBuf};

pub(crate) const COL_YEAR: &str = "year";
pub(crate) const COL_MONTH: &str = "month";
pub(crate) const COL_TEMP: &str = "temp"; // Daily mean temperature
pub(crate) const COL_PRECIP: &str = "precip"; // Daily precipitation sum
pub(crate) const COL_WIND: &str = "wind"; // Daily mean wind speed

/// Lists the station exports in `config.input_dir` named `<prefix>*.<extension>`, sorted by path.
///
/// A missing folder yields no files.
pub fn discover_csv_files(config: &AggregatorConfig) -> Result<Vec<PathBuf>, StationCsvError> {
    let entries = match std::fs::read_dir(&config.input_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Input folder {} does not exist", config.input_dir.display());
            return Ok(Vec::new());
        }
        Err(e) => return Err(StationCsvError::InputDirRead(config.input_dir.clone(), e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| StationCsvError::InputDirRead(config.input_dir.clone(), e))?
            .path();
        if !path.is_file() {
            continue;
        }
        let name_matches = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with(config.file_prefix.as_str()));
        let extension_matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == config.file_extension);
        if name_matches && extension_matches {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Reads one header-less station export and keeps the rows of `config.station_code`.
///
/// The result has the columns `year`, `month` (Int32) and `temp`, `precip`, `wind`
/// (Float64). Values that do not parse as numbers become null. Returns `Ok(None)` when
/// no row belongs to the station.
pub fn read_station_rows(
    path: &Path,
    config: &AggregatorConfig,
) -> Result<Option<DataFrame>, StationCsvError> {
    let bytes = std::fs::read(path).map_err(|e| StationCsvError::FileRead(path.to_path_buf(), e))?;
    let (text, encoding) = decode_with_fallback(&bytes, &config.encodings).ok_or_else(|| {
        StationCsvError::Undecodable {
            path: path.to_path_buf(),
            candidates: encoding_names(&config.encodings),
        }
    })?;
    debug!("Decoded {} as {}", path.display(), encoding.name());

    // Every column is read as text; numeric coercion happens in `select_station_columns`.
    let df = CsvReadOptions::default()
        .with_has_header(false)
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()
        .map_err(|e| StationCsvError::CsvReadPolars {
            path: path.to_path_buf(),
            source: e,
        })?;

    let rows = select_station_columns(df, path, &config.columns, config.station_code)?;
    Ok((rows.height() > 0).then_some(rows))
}

/// Filters `df` to one station and projects the retained fields under stable names.
pub(crate) fn select_station_columns(
    df: DataFrame,
    path: &Path,
    columns: &StationColumns,
    station_code: i64,
) -> Result<DataFrame, StationCsvError> {
    let names: Vec<PlSmallStr> = df.get_column_names().into_iter().cloned().collect();
    let name_at = |index: usize, column: &'static str| {
        names
            .get(index)
            .cloned()
            .ok_or_else(|| StationCsvError::MissingColumn {
                path: path.to_path_buf(),
                column,
                index,
                width: names.len(),
            })
    };

    let station = name_at(columns.station, "station")?;
    let year = name_at(columns.year, COL_YEAR)?;
    let month = name_at(columns.month, COL_MONTH)?;
    let temp = name_at(columns.temperature, COL_TEMP)?;
    let precip = name_at(columns.precipitation, COL_PRECIP)?;
    let wind = name_at(columns.wind, COL_WIND)?;

    df.lazy()
        .filter(col(station).cast(DataType::Int64).eq(lit(station_code)))
        .select([
            col(year).cast(DataType::Int32).alias(COL_YEAR),
            col(month).cast(DataType::Int32).alias(COL_MONTH),
            col(temp).cast(DataType::Float64).alias(COL_TEMP),
            col(precip).cast(DataType::Float64).alias(COL_PRECIP),
            col(wind).cast(DataType::Float64).alias(COL_WIND),
        ])
        .collect()
        .map_err(|e| StationCsvError::PolarsError {
            path: path.to_path_buf(),
            source: e,
        })
}
