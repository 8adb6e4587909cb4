//! Map markers for locatable strikes

use geo_types::Point;

use crate::record::Record;

const UNKNOWN: &str = "Unknown";

/// One strike location on the world map
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub name: String,
    pub recclass: String,
    /// Raw mass text in grams, or `Unknown`
    pub mass: String,
    /// Strike year, or `Unknown`
    pub year: String,
    /// x = longitude, y = latitude
    pub location: Point<f64>,
}

impl MapMarker {
    fn from_record(record: &Record) -> Option<Self> {
        let (lat, lon) = record.coordinates()?;

        Some(Self {
            name: record.name.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            recclass: record.recclass.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            mass: record.mass.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            year: record
                .strike_year()
                .map(|year| year.to_string())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            location: Point::new(lon, lat),
        })
    }

    pub fn longitude(&self) -> f64 {
        self.location.x()
    }

    pub fn latitude(&self) -> f64 {
        self.location.y()
    }

    /// Key for de-duplicating markers in a rendered layer
    pub fn key(&self) -> String {
        format!("{}-{}-{}", self.name, self.longitude(), self.latitude())
    }

    /// Tooltip lines for the marker
    pub fn tooltip(&self) -> String {
        format!(
            "Name: {}\nReclass: {}\nMass: {}\nYear: {}",
            self.name, self.recclass, self.mass, self.year
        )
    }
}

/// Markers for every record with both coordinates, in input order.
pub fn build_markers(collection: &[Record]) -> Vec<MapMarker> {
    collection.iter().filter_map(MapMarker::from_record).collect()
}
