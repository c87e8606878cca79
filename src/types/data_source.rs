//! Defines the source tags attached to every emitted document and the hourly
//! variables that can be requested from the archive service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies where a weather document originated.
///
/// Serialized as the `source` field of every [`crate::WeatherRecord`], which lets
/// downstream storage keep station aggregates and archive records in one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataSource {
    /// Daily synop exports of the Polish national meteorological institute (IMGW-PIB).
    #[serde(rename = "imgw-pib")]
    Imgw,
    /// The Open-Meteo historical weather archive.
    #[serde(rename = "open-meteo")]
    OpenMeteo,
}

impl DataSource {
    pub(crate) fn tag(&self) -> &'static str {
        match self {
            DataSource::Imgw => "imgw-pib",
            DataSource::OpenMeteo => "open-meteo",
        }
    }
}

/// Allows formatting a `DataSource` variant using its serialized tag.
///
/// # Examples
///
/// ```
/// use weather_etl::DataSource;
///
/// assert_eq!(DataSource::Imgw.to_string(), "imgw-pib");
/// assert_eq!(format!("{}", DataSource::OpenMeteo), "open-meteo");
/// ```
impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// An hourly series the archive service can return.
///
/// The API name doubles as the field name of the matching [`crate::WeatherRecord`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HourlyVariable {
    /// Air temperature at 2 meters above ground, in °C.
    Temperature2m,
    /// Total precipitation (rain, showers, snow) of the preceding hour, in mm.
    Precipitation,
    /// Wind speed at 10 meters above ground, in km/h.
    WindSpeed10m,
}

impl HourlyVariable {
    /// All variables, in the order they are requested by default.
    pub const ALL: [HourlyVariable; 3] = [
        HourlyVariable::Temperature2m,
        HourlyVariable::Precipitation,
        HourlyVariable::WindSpeed10m,
    ];

    pub fn api_name(&self) -> &'static str {
        match self {
            HourlyVariable::Temperature2m => "temperature_2m",
            HourlyVariable::Precipitation => "precipitation",
            HourlyVariable::WindSpeed10m => "wind_speed_10m",
        }
    }
}

impl fmt::Display for HourlyVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_name())
    }
}
