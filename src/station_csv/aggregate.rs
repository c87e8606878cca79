use crate::station_csv::error::StationCsvError;
use crate::station_csv::reader::{COL_MONTH, COL_PRECIP, COL_TEMP, COL_WIND, COL_YEAR};
use crate::types::data_source::DataSource;
use crate::types::location::Location;
use crate::types::record::{month_timestamp, MonthlyRecord, Readings, WeatherRecord};
use crate::utils::round_to;
use polars::prelude::*;

/// Count of daily precipitation values missing from a month.
pub(crate) const COL_PRECIP_MISSING: &str = "precip_missing";

/// Concatenates per-file station rows and reduces them to one row per (year, month).
///
/// `temp` and `wind` become the mean of the available values (null if none), `precip`
/// the sum with missing values counted as zero. `precip_missing` counts the days
/// that had no precipitation value. Rows are sorted by year and month.
pub fn aggregate_monthly(frames: Vec<DataFrame>) -> PolarsResult<DataFrame> {
    let lazy_frames: Vec<LazyFrame> = frames.into_iter().map(DataFrame::lazy).collect();

    concat(lazy_frames, UnionArgs::default())?
        .filter(col(COL_YEAR).is_not_null().and(col(COL_MONTH).is_not_null()))
        .group_by([col(COL_YEAR), col(COL_MONTH)])
        .agg([
            col(COL_TEMP).mean(),
            col(COL_PRECIP).sum(),
            col(COL_PRECIP)
                .null_count()
                .cast(DataType::UInt32)
                .alias(COL_PRECIP_MISSING),
            col(COL_WIND).mean(),
        ])
        .sort([COL_YEAR, COL_MONTH], SortMultipleOptions::default())
        .collect()
}

/// A monthly document plus the number of days its precipitation sum silently skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyDocument {
    pub record: WeatherRecord,
    pub year: i32,
    pub month: u32,
    pub missing_precipitation_days: u32,
}

impl MonthlyDocument {
    pub fn to_monthly_record(&self) -> MonthlyRecord {
        MonthlyRecord {
            record: self.record.clone(),
            year: self.year,
            month: self.month,
        }
    }
}

/// Builds one document per aggregated month, rounded to 2 decimals and sorted by timestamp.
pub fn build_monthly_documents(
    monthly: &DataFrame,
    site: &Location,
) -> Result<Vec<MonthlyDocument>, StationCsvError> {
    let years = monthly.column(COL_YEAR)?.i32()?;
    let months = monthly.column(COL_MONTH)?.i32()?;
    let temps = monthly.column(COL_TEMP)?.f64()?;
    let precips = monthly.column(COL_PRECIP)?.f64()?;
    let winds = monthly.column(COL_WIND)?.f64()?;
    let missing = monthly.column(COL_PRECIP_MISSING)?.u32()?;

    let mut documents = Vec::with_capacity(monthly.height());
    for idx in 0..monthly.height() {
        let (Some(year), Some(month)) = (years.get(idx), months.get(idx)) else {
            continue;
        };
        let month = month.unsigned_abs();
        let readings = Readings {
            temperature_2m: temps.get(idx).map(|v| round_to(v, 2)),
            precipitation: Some(round_to(precips.get(idx).unwrap_or(0.0), 2)),
            wind_speed_10m: winds.get(idx).map(|v| round_to(v, 2)),
        };
        documents.push(MonthlyDocument {
            record: WeatherRecord::new(
                month_timestamp(year, month),
                site,
                DataSource::Imgw,
                readings,
            ),
            year,
            month,
            missing_precipitation_days: missing.get(idx).unwrap_or(0),
        });
    }
    documents.sort_by(|a, b| a.record.timestamp.cmp(&b.record.timestamp));
    Ok(documents)
}
