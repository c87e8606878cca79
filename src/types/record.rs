//! The document shape shared by the monthly station aggregates and the hourly
//! archive records.

use crate::types::data_source::DataSource;
use crate::types::location::{Geometry, Location};
use serde::{Deserialize, Serialize};

/// The three measured values carried by a document.
///
/// `None` serializes as JSON `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Readings {
    pub temperature_2m: Option<f64>,
    pub precipitation: Option<f64>,
    pub wind_speed_10m: Option<f64>,
}

/// One weather document, monthly or hourly.
///
/// Every document carries the same identifying fields (timestamp, location, source,
/// geometry, lat/lon), so downstream storage can index both pipelines by location and time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    /// UTC instant in ISO-8601 with a literal `Z`, e.g. `2020-01-01T00:00:00Z`.
    pub timestamp: String,
    pub location: String,
    pub source: DataSource,
    pub geometry: Geometry,
    pub lat: f64,
    pub lon: f64,
    pub temperature_2m: Option<f64>,
    pub precipitation: Option<f64>,
    pub wind_speed_10m: Option<f64>,
}

impl WeatherRecord {
    pub fn new(
        timestamp: String,
        location: &Location,
        source: DataSource,
        readings: Readings,
    ) -> Self {
        Self {
            timestamp,
            location: location.name.clone(),
            source,
            geometry: location.geometry(),
            lat: location.latitude,
            lon: location.longitude,
            temperature_2m: readings.temperature_2m,
            precipitation: readings.precipitation,
            wind_speed_10m: readings.wind_speed_10m,
        }
    }
}

/// A monthly document with the calendar month spelled out next to its timestamp.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRecord {
    #[serde(flatten)]
    pub record: WeatherRecord,
    pub year: i32,
    pub month: u32,
}

/// Formats the first instant of a month, `YYYY-MM-01T00:00:00Z`.
pub(crate) fn month_timestamp(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}-01T00:00:00Z")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::location::strachowice_station;
    use serde_json::json;

    #[test]
    fn test_record_json_shape() {
        let record = WeatherRecord::new(
            month_timestamp(2020, 1),
            &strachowice_station(),
            DataSource::Imgw,
            Readings {
                temperature_2m: Some(2.0),
                precipitation: Some(1.5),
                wind_speed_10m: None,
            },
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "timestamp": "2020-01-01T00:00:00Z",
                "location": "Wroclaw_Strachowice",
                "source": "imgw-pib",
                "geometry": {"type": "Point", "coordinates": [16.8858, 51.1025]},
                "lat": 51.1025,
                "lon": 16.8858,
                "temperature_2m": 2.0,
                "precipitation": 1.5,
                "wind_speed_10m": null
            })
        );
    }

    #[test]
    fn test_field_order_is_stable() {
        let record = WeatherRecord::new(
            month_timestamp(1999, 12),
            &strachowice_station(),
            DataSource::Imgw,
            Readings::default(),
        );
        let text = serde_json::to_string(&record).unwrap();
        let timestamp_at = text.find("\"timestamp\"").unwrap();
        let geometry_at = text.find("\"geometry\"").unwrap();
        let wind_at = text.find("\"wind_speed_10m\"").unwrap();
        assert!(timestamp_at < geometry_at && geometry_at < wind_at);
        assert!(text.starts_with("{\"timestamp\":\"1999-12-01T00:00:00Z\""));
    }

    #[test]
    fn test_monthly_record_appends_calendar_fields() {
        let monthly = MonthlyRecord {
            record: WeatherRecord::new(
                month_timestamp(2021, 7),
                &strachowice_station(),
                DataSource::Imgw,
                Readings::default(),
            ),
            year: 2021,
            month: 7,
        };
        let text = serde_json::to_string(&monthly).unwrap();
        assert!(text.starts_with("{\"timestamp\":\"2021-07-01T00:00:00Z\""));
        assert!(text.ends_with(",\"year\":2021,\"month\":7}"));
    }
}
