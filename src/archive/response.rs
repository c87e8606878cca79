//! Wire types of the Open-Meteo archive endpoint (`timeformat=unixtime`).

use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveResponse {
    /// Latitude of the grid cell the service snapped to.
    pub latitude: f64,
    /// Longitude of the grid cell the service snapped to.
    pub longitude: f64,
    #[serde(default)]
    pub utc_offset_seconds: i64,
    #[serde(default)]
    pub hourly: Option<HourlyBlock>,
}

/// The `hourly` object: a `time` axis in unix seconds and one array per requested variable.
#[derive(Debug, Clone, Deserialize)]
pub struct HourlyBlock {
    pub time: Vec<i64>,
    #[serde(flatten)]
    pub series: HashMap<String, Vec<Option<f64>>>,
}

impl HourlyBlock {
    pub fn series(&self, name: &str) -> Option<&[Option<f64>]> {
        self.series.get(name).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_archive_payload() {
        let body = r#"{
            "latitude": 51.1,
            "longitude": 17.02,
            "generationtime_ms": 0.5,
            "utc_offset_seconds": 0,
            "timezone": "GMT",
            "hourly_units": {"time": "unixtime", "temperature_2m": "°C"},
            "hourly": {
                "time": [1577836800, 1577840400],
                "temperature_2m": [1.5, null],
                "precipitation": [0.0, 0.1]
            }
        }"#;

        let response: ArchiveResponse = serde_json::from_str(body).unwrap();
        let hourly = response.hourly.unwrap();
        assert_eq!(hourly.time, [1577836800, 1577840400]);
        assert_eq!(hourly.series("temperature_2m"), Some(&[Some(1.5), None][..]));
        assert_eq!(hourly.series("precipitation").map(<[_]>::len), Some(2));
        assert!(hourly.series("wind_speed_10m").is_none());
    }

    #[test]
    fn test_missing_hourly_block() {
        let response: ArchiveResponse =
            serde_json::from_str(r#"{"latitude": 51.1, "longitude": 17.0}"#).unwrap();
        assert!(response.hourly.is_none());
    }
}
