use geo::{MultiPolygon, Rect};
use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Country {
    /// File stem under the countries directory, e.g. `kazakhstan`
    pub name: String,
    /// Two-letter code used as the document key, e.g. `KZ`
    pub code: String,
}

impl Country {
    pub fn new(name: &str, code: &str) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
        }
    }
}

/// Axis-aligned lon/lat rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct ClipBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl ClipBox {
    pub const fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self { min_lon, min_lat, max_lon, max_lat }
    }

    pub fn to_rect(&self) -> Rect<f64> {
        Rect::new(
            geo::coord! { x: self.min_lon, y: self.min_lat },
            geo::coord! { x: self.max_lon, y: self.max_lat },
        )
    }

    pub fn to_multi_polygon(&self) -> MultiPolygon<f64> {
        MultiPolygon::new(vec![self.to_rect().to_polygon()])
    }
}

/// Display metadata shared by every map entity: historical polities and the
/// modern-border entities of the later eras.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntityMeta {
    pub key: &'static str,
    pub name: &'static str,
    pub subtitle: &'static str,
    pub color: &'static str,
    /// Label anchor as `[lat, lng]`, the order Leaflet expects
    pub center: [f64; 2],
}

/// A polity of one era with its derived geometry.
#[derive(Debug, Clone)]
pub struct HistoricalEntity {
    pub meta: EntityMeta,
    pub geometry: MultiPolygon<f64>,
}
