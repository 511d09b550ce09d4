// Site record domain model
use super::geo::LatLon;
use std::collections::BTreeMap;

/// One normalized row of expedition metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct SiteRecord {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    /// Coordinates as written in the source table, for display.
    pub lat_text: String,
    pub lon_text: String,
    /// Every column that is not name or coordinate, keyed by normalized column name.
    pub fields: BTreeMap<String, String>,
}

impl SiteRecord {
    pub fn new(name: String, lat: f64, lon: f64, fields: BTreeMap<String, String>) -> Self {
        Self {
            name,
            lat,
            lon,
            lat_text: lat.to_string(),
            lon_text: lon.to_string(),
            fields,
        }
    }

    pub fn with_coordinate_text(mut self, lat: &str, lon: &str) -> Self {
        self.lat_text = lat.to_string();
        self.lon_text = lon.to_string();
        self
    }

    pub fn position(&self) -> LatLon {
        LatLon::new(self.lat, self.lon)
    }

    /// Trimmed value of an optional field, or `None` when absent or blank.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}
