//! Rolls the fetcher's hourly NDJSON output up into monthly documents per location.

use crate::config::RollupConfig;
use crate::rollup::error::RollupError;
use crate::types::record::{month_timestamp, MonthlyRecord, WeatherRecord};
use crate::utils::{round_to, write_pretty_json};
use chrono::{DateTime, Datelike};
use log::{info, warn};
use polars::prelude::*;
use std::fs;
use std::path::Path;

const COL_ROW: &str = "row";
const COL_LOCATION: &str = "location";
const COL_YEAR: &str = "year";
const COL_MONTH: &str = "month";
const COL_TEMP: &str = "temperature_2m";
const COL_PRECIP: &str = "precipitation";
const COL_WIND: &str = "wind_speed_10m";

/// Reads an NDJSON file of hourly records. Blank lines are ignored.
///
/// # Errors
///
/// Returns [`RollupError::MalformedLine`] with the 1-based line number of the first line
/// that is not a valid record.
pub fn read_hourly_records(path: &Path) -> Result<Vec<WeatherRecord>, RollupError> {
    let text =
        fs::read_to_string(path).map_err(|e| RollupError::InputRead(path.to_path_buf(), e))?;
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).map_err(|e| RollupError::MalformedLine {
                path: path.to_path_buf(),
                line: idx + 1,
                source: e,
            })
        })
        .collect()
}

/// Groups hourly records by (location, year, month).
///
/// Temperature and wind become the mean of the available hours, precipitation the sum.
/// Values are rounded to 2 decimals. Identity fields (source, geometry, lat, lon) come
/// from the first record of each group. The result is sorted by location, then month.
pub fn rollup_monthly(records: &[WeatherRecord]) -> Result<Vec<MonthlyRecord>, RollupError> {
    if records.is_empty() {
        return Ok(Vec::new());
    }

    let mut years = Vec::with_capacity(records.len());
    let mut months = Vec::with_capacity(records.len());
    for record in records {
        let instant = DateTime::parse_from_rfc3339(&record.timestamp).map_err(|e| {
            RollupError::InvalidTimestamp {
                location: record.location.clone(),
                timestamp: record.timestamp.clone(),
                source: e,
            }
        })?;
        years.push(instant.year());
        months.push(instant.month() as i32);
    }

    let rows: Vec<u64> = (0..).zip(records).map(|(row, _)| row).collect();
    let locations: Vec<&str> = records.iter().map(|r| r.location.as_str()).collect();
    let temps: Vec<Option<f64>> = records.iter().map(|r| r.temperature_2m).collect();
    let precips: Vec<Option<f64>> = records.iter().map(|r| r.precipitation).collect();
    let winds: Vec<Option<f64>> = records.iter().map(|r| r.wind_speed_10m).collect();

    let hourly = df!(
        COL_ROW => rows,
        COL_LOCATION => locations,
        COL_YEAR => years,
        COL_MONTH => months,
        COL_TEMP => temps,
        COL_PRECIP => precips,
        COL_WIND => winds
    )?;

    let monthly = hourly
        .lazy()
        .group_by([col(COL_LOCATION), col(COL_YEAR), col(COL_MONTH)])
        .agg([
            col(COL_ROW).first(),
            col(COL_TEMP).mean(),
            col(COL_PRECIP).sum(),
            col(COL_WIND).mean(),
        ])
        .sort(
            [COL_LOCATION, COL_YEAR, COL_MONTH],
            SortMultipleOptions::default(),
        )
        .collect()?;

    let first_rows = monthly.column(COL_ROW)?.u64()?;
    let years = monthly.column(COL_YEAR)?.i32()?;
    let months = monthly.column(COL_MONTH)?.i32()?;
    let temps = monthly.column(COL_TEMP)?.f64()?;
    let precips = monthly.column(COL_PRECIP)?.f64()?;
    let winds = monthly.column(COL_WIND)?.f64()?;

    let mut rollups = Vec::with_capacity(monthly.height());
    for idx in 0..monthly.height() {
        let (Some(row), Some(year), Some(month)) =
            (first_rows.get(idx), years.get(idx), months.get(idx))
        else {
            continue;
        };
        let Some(first) = usize::try_from(row).ok().and_then(|row| records.get(row)) else {
            continue;
        };
        let month = month.unsigned_abs();
        let mut record = first.clone();
        record.timestamp = month_timestamp(year, month);
        record.temperature_2m = temps.get(idx).map(|v| round_to(v, 2));
        record.precipitation = precips.get(idx).map(|v| round_to(v, 2));
        record.wind_speed_10m = winds.get(idx).map(|v| round_to(v, 2));
        rollups.push(MonthlyRecord {
            record,
            year,
            month,
        });
    }
    Ok(rollups)
}

/// Writes the monthly documents as a 4-space indented JSON array.
pub fn write_rollup(path: &Path, rollups: &[MonthlyRecord]) -> Result<(), RollupError> {
    write_pretty_json(path, rollups).map_err(|e| RollupError::OutputWrite(path.to_path_buf(), e))
}

/// Reads `config.input_path`, rolls it up and writes `config.output_path`.
///
/// An input without records writes an empty array.
pub fn run_rollup(config: &RollupConfig) -> Result<Vec<MonthlyRecord>, RollupError> {
    let records = read_hourly_records(&config.input_path)?;
    info!(
        "Read {} hourly records from {}",
        records.len(),
        config.input_path.display()
    );
    if records.is_empty() {
        warn!("No hourly records found in {}", config.input_path.display());
    }

    let rollups = rollup_monthly(&records)?;
    write_rollup(&config.output_path, &rollups)?;
    info!("Wrote {}", config.output_path.display());
    info!("Monthly records: {}", rollups.len());
    Ok(rollups)
}
