use crate::archive::axis::{format_timestamp, HourlyAxis};
use crate::archive::error::ArchiveError;
use crate::archive::response::ArchiveResponse;
use crate::types::data_source::{DataSource, HourlyVariable};
use crate::types::location::Location;
use crate::types::record::{Readings, WeatherRecord};
use crate::types::year_chunk::YearChunk;

/// Turns one archive response into hourly records for `location`.
///
/// Every requested variable must provide exactly one value per axis timestamp.
/// Variables that were not requested stay `None` in the records.
///
/// # Errors
///
/// * [`ArchiveError::EmptyResponse`] if the response holds no hourly data.
/// * [`ArchiveError::InvalidTimeAxis`] if the reported times do not form an increasing axis.
/// * [`ArchiveError::MissingVariable`] if a requested series is absent.
/// * [`ArchiveError::SeriesLengthMismatch`] if a series and the axis differ in length.
pub fn build_hourly_records(
    location: &Location,
    chunk: YearChunk,
    response: &ArchiveResponse,
    variables: &[HourlyVariable],
) -> Result<Vec<WeatherRecord>, ArchiveError> {
    let hourly = response
        .hourly
        .as_ref()
        .filter(|block| !block.time.is_empty())
        .ok_or_else(|| ArchiveError::EmptyResponse {
            location: location.name.clone(),
            chunk,
        })?;

    let axis = HourlyAxis::from_unix_times(&hourly.time).ok_or_else(|| {
        ArchiveError::InvalidTimeAxis {
            location: location.name.clone(),
            chunk,
            message: format!(
                "{} reported times are not strictly increasing",
                hourly.time.len()
            ),
        }
    })?;
    let timestamps: Vec<String> = axis.timestamps().map(format_timestamp).collect();

    let mut columns = Vec::with_capacity(variables.len());
    for &variable in variables {
        let values = hourly
            .series(variable.api_name())
            .ok_or_else(|| ArchiveError::MissingVariable {
                location: location.name.clone(),
                chunk,
                variable,
            })?;
        if values.len() != timestamps.len() {
            return Err(ArchiveError::SeriesLengthMismatch {
                location: location.name.clone(),
                chunk,
                variable,
                values: values.len(),
                timestamps: timestamps.len(),
            });
        }
        columns.push((variable, values));
    }

    let records = timestamps
        .into_iter()
        .enumerate()
        .map(|(idx, timestamp)| {
            let mut readings = Readings::default();
            for (variable, values) in &columns {
                let value = values[idx];
                match variable {
                    HourlyVariable::Temperature2m => readings.temperature_2m = value,
                    HourlyVariable::Precipitation => readings.precipitation = value,
                    HourlyVariable::WindSpeed10m => readings.wind_speed_10m = value,
                }
            }
            WeatherRecord::new(timestamp, location, DataSource::OpenMeteo, readings)
        })
        .collect();
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::response::HourlyBlock;
    use chrono::NaiveDate;
    use std::collections::{HashMap, HashSet};

    const JAN_1_2020: i64 = 1_577_836_800;

    fn chunk() -> YearChunk {
        let day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        YearChunk {
            start: day,
            end: day,
        }
    }

    fn response(hours: i64, series: &[(&str, usize)]) -> ArchiveResponse {
        let series: HashMap<String, Vec<Option<f64>>> = series
            .iter()
            .map(|(name, len)| {
                let values = (0..*len).map(|i| Some(i as f64 / 10.0)).collect();
                (name.to_string(), values)
            })
            .collect();
        ArchiveResponse {
            latitude: 51.1,
            longitude: 17.0,
            utc_offset_seconds: 0,
            hourly: Some(HourlyBlock {
                time: (0..hours).map(|h| JAN_1_2020 + h * 3600).collect(),
                series,
            }),
        }
    }

    fn centrum() -> Location {
        Location::new("Wroclaw_Centrum", 51.1105, 17.0312)
    }

    #[test]
    fn test_one_record_per_hour() {
        let response = response(
            24,
            &[("temperature_2m", 24), ("precipitation", 24), ("wind_speed_10m", 24)],
        );
        let records =
            build_hourly_records(&centrum(), chunk(), &response, &HourlyVariable::ALL).unwrap();

        assert_eq!(records.len(), 24);
        let stamps: HashSet<&str> = records.iter().map(|r| r.timestamp.as_str()).collect();
        assert_eq!(stamps.len(), 24);
        assert!(records.iter().all(|r| r.location == "Wroclaw_Centrum"
            && r.lat == 51.1105
            && r.lon == 17.0312
            && r.geometry.coordinates == [17.0312, 51.1105]
            && r.source == DataSource::OpenMeteo));
        assert_eq!(records[5].timestamp, "2020-01-01T05:00:00Z");
        assert_eq!(records[5].temperature_2m, Some(0.5));
        assert_eq!(records[5].wind_speed_10m, Some(0.5));
    }

    #[test]
    fn test_length_mismatch_names_chunk_and_variable() {
        let response = response(
            24,
            &[("temperature_2m", 24), ("precipitation", 23), ("wind_speed_10m", 24)],
        );
        let err = build_hourly_records(&centrum(), chunk(), &response, &HourlyVariable::ALL)
            .unwrap_err();

        assert!(matches!(
            err,
            ArchiveError::SeriesLengthMismatch {
                variable: HourlyVariable::Precipitation,
                values: 23,
                timestamps: 24,
                ..
            }
        ));
        assert_eq!(
            err.to_string(),
            "Inconsistent series length for Wroclaw_Centrum 2020-01-01..2020-01-01: \
             precipitation: 23 vs time: 24"
        );
    }

    #[test]
    fn test_missing_hourly_block_is_empty_response() {
        let mut response = response(0, &[]);
        assert!(matches!(
            build_hourly_records(&centrum(), chunk(), &response, &HourlyVariable::ALL),
            Err(ArchiveError::EmptyResponse { .. })
        ));
        response.hourly = None;
        assert!(matches!(
            build_hourly_records(&centrum(), chunk(), &response, &HourlyVariable::ALL),
            Err(ArchiveError::EmptyResponse { .. })
        ));
    }

    #[test]
    fn test_missing_series_and_unrequested_variables() {
        let response = response(3, &[("temperature_2m", 3)]);
        assert!(matches!(
            build_hourly_records(&centrum(), chunk(), &response, &HourlyVariable::ALL),
            Err(ArchiveError::MissingVariable {
                variable: HourlyVariable::Precipitation,
                ..
            })
        ));

        let records = build_hourly_records(
            &centrum(),
            chunk(),
            &response,
            &[HourlyVariable::Temperature2m],
        )
        .unwrap();
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| r.precipitation.is_none()));
    }
}
