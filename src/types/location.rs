//! Defines the named geographic points the pipelines report on, and the GeoJSON
//! geometry attached to every document.

use serde::{Deserialize, Serialize};

/// A named point on the map: either a measuring station or a grid point requested
/// from the archive service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Identifier written into the `location` field of each document (e.g. "Wroclaw_Centrum").
    pub name: String,
    /// Latitude in decimal degrees (positive for North, negative for South).
    pub latitude: f64,
    /// Longitude in decimal degrees (positive for East, negative for West).
    pub longitude: f64,
}

impl Location {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
        }
    }

    /// The GeoJSON point for this location. Coordinates are `[lon, lat]`.
    pub fn geometry(&self) -> Geometry {
        Geometry::point(self.latitude, self.longitude)
    }
}

/// The five archive grid points across Wroclaw, in the order they are fetched.
pub fn wroclaw_locations() -> Vec<Location> {
    vec![
        Location::new("Wroclaw_Centrum", 51.1105, 17.0312),
        // Next to the Strachowice synop station.
        Location::new("Wroclaw_Lotnisko", 51.1025, 16.8858),
        Location::new("Wroclaw_Biskupin", 51.1000, 17.1000),
        Location::new("Wroclaw_Lesnica", 51.1480, 16.8670),
        Location::new("Wroclaw_PsiePole", 51.1450, 17.1150),
    ]
}

/// The Wroclaw-Strachowice synop station.
pub fn strachowice_station() -> Location {
    Location::new("Wroclaw_Strachowice", 51.1025, 16.8858)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeometryKind {
    Point,
}

/// A GeoJSON geometry, `{"type": "Point", "coordinates": [lon, lat]}`.
///
/// # Examples
///
/// ```
/// use weather_etl::Geometry;
///
/// let point = Geometry::point(51.1105, 17.0312);
/// assert_eq!(point.coordinates, [17.0312, 51.1105]);
/// assert_eq!(
///     serde_json::to_string(&point).unwrap(),
///     r#"{"type":"Point","coordinates":[17.0312,51.1105]}"#
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(rename = "type")]
    pub kind: GeometryKind,
    pub coordinates: [f64; 2],
}

impl Geometry {
    pub fn point(latitude: f64, longitude: f64) -> Self {
        Self {
            kind: GeometryKind::Point,
            coordinates: [longitude, latitude],
        }
    }
}
