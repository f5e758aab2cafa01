//! Boundary polygons and query points.

use geo::BoundingRect;
use geo_types::{MultiPolygon, Point};
use serde::{Deserialize, Serialize};

use super::Tier;
use crate::normalize::normalize;

/// Geographic point (lat/lon)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Planar point in GeoJSON axis order (x = lon, y = lat)
    pub fn to_point(&self) -> Point<f64> {
        Point::new(self.lon, self.lat)
    }
}

/// Bounding box of a boundary, for framing a map around it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBbox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

/// Why a feature's geometry cannot take part in containment tests
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("feature has no geometry")]
    Missing,
    #[error("unsupported geometry type {0}")]
    Unsupported(String),
    #[error("invalid geometry: {0}")]
    Invalid(String),
}

/// A single administrative unit of one tier.
///
/// Immutable once loaded. A malformed geometry is kept as an error rather than
/// dropping the unit, so the unit still takes part in coverage reporting while
/// point lookups skip it.
#[derive(Debug, Clone)]
pub struct Boundary {
    pub tier: Tier,
    /// Name as found in the source properties (empty when absent)
    pub raw_name: String,
    /// `normalize(raw_name)`, computed once at load
    pub normalized_name: String,
    pub geometry: Result<MultiPolygon<f64>, GeometryError>,
}

impl Boundary {
    pub fn new(
        tier: Tier,
        raw_name: impl Into<String>,
        geometry: Result<MultiPolygon<f64>, GeometryError>,
    ) -> Self {
        let raw_name = raw_name.into();
        let normalized_name = normalize(&raw_name);
        Self {
            tier,
            raw_name,
            normalized_name,
            geometry,
        }
    }

    /// Raw name, or `None` when the source carried no usable name
    pub fn display_name(&self) -> Option<&str> {
        let name = self.raw_name.trim();
        (!name.is_empty()).then_some(name)
    }

    /// Get the bounding box of this boundary
    pub fn bbox(&self) -> Option<GeoBbox> {
        let geometry = self.geometry.as_ref().ok()?;
        geometry.bounding_rect().map(|rect| GeoBbox {
            min_lon: rect.min().x,
            min_lat: rect.min().y,
            max_lon: rect.max().x,
            max_lat: rect.max().y,
        })
    }
}
