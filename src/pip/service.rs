//! Resolve a point across all tiers at once.

use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

use super::BoundaryIndex;
use crate::models::{Boundary, GeoBbox, GeoPoint, Tier};

/// The boundary a point fell into for one tier
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TierMatch {
    /// Raw name; `None` when the feature carries no name
    pub name: Option<String>,
    pub normalized_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<GeoBbox>,
}

impl TierMatch {
    pub fn from_boundary(boundary: &Boundary) -> Self {
        Self {
            name: boundary.display_name().map(str::to_string),
            normalized_name: boundary.normalized_name.clone(),
            bbox: boundary.bbox(),
        }
    }
}

/// Per-tier lookup results. Each tier resolves independently; `None` means
/// no boundary of that tier contains the point.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Resolution {
    pub sls: Option<TierMatch>,
    pub lingkungan: Option<TierMatch>,
    pub kelurahan: Option<TierMatch>,
}

impl Resolution {
    /// Set the match for a given tier
    pub fn set(&mut self, tier: Tier, found: TierMatch) {
        match tier {
            Tier::Sls => self.sls = Some(found),
            Tier::Lingkungan => self.lingkungan = Some(found),
            Tier::Kelurahan => self.kelurahan = Some(found),
        }
    }

    /// Get the match for a given tier
    pub fn get(&self, tier: Tier) -> Option<&TierMatch> {
        match tier {
            Tier::Sls => self.sls.as_ref(),
            Tier::Lingkungan => self.lingkungan.as_ref(),
            Tier::Kelurahan => self.kelurahan.as_ref(),
        }
    }
}

/// Point-in-Polygon lookup service
pub struct PipService {
    index: Arc<BoundaryIndex>,
}

impl PipService {
    /// Create a new PIP service over a loaded index
    pub fn new(index: Arc<BoundaryIndex>) -> Self {
        Self { index }
    }

    /// Resolve the point in every tier
    pub fn lookup(&self, point: &GeoPoint) -> Resolution {
        let mut resolution = Resolution::default();

        for tier in Tier::all() {
            if let Some(boundary) = self.index.locate(*tier, point) {
                resolution.set(*tier, TierMatch::from_boundary(boundary));
            }
        }

        debug!(
            "PIP lookup at ({}, {}): sls={:?} lingkungan={:?} kelurahan={:?}",
            point.lat,
            point.lon,
            resolution.sls.as_ref().and_then(|m| m.name.as_deref()),
            resolution.lingkungan.as_ref().and_then(|m| m.name.as_deref()),
            resolution.kelurahan.as_ref().and_then(|m| m.name.as_deref()),
        );

        resolution
    }

    /// Get the boundary index (for stats/coverage)
    pub fn index(&self) -> &Arc<BoundaryIndex> {
        &self.index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo_types::{polygon, MultiPolygon};

    fn cell(tier: Tier, name: &str, min: (f64, f64), max: (f64, f64)) -> Boundary {
        let poly = polygon![
            (x: min.0, y: min.1),
            (x: max.0, y: min.1),
            (x: max.0, y: max.1),
            (x: min.0, y: max.1),
        ];
        Boundary::new(tier, name, Ok(MultiPolygon::new(vec![poly])))
    }

    #[test]
    fn test_empty_resolution() {
        let service = PipService::new(Arc::new(BoundaryIndex::default()));
        let resolution = service.lookup(&GeoPoint::new(-8.58, 116.11));
        assert_eq!(resolution, Resolution::default());
    }

    #[test]
    fn test_tiers_resolve_independently() {
        let index = BoundaryIndex::from_tiers([
            (Tier::Sls, vec![cell(Tier::Sls, "RT 1 GATEP", (116.10, -8.59), (116.11, -8.58))]),
            (Tier::Lingkungan, vec![cell(Tier::Lingkungan, "GATEP", (116.0, -8.7), (116.2, -8.5))]),
            (Tier::Kelurahan, vec![cell(Tier::Kelurahan, "", (116.0, -8.7), (116.2, -8.5))]),
        ]);
        let service = PipService::new(Arc::new(index));

        let r = service.lookup(&GeoPoint::new(-8.6, 116.15));
        assert!(r.get(Tier::Sls).is_none());
        assert_eq!(r.get(Tier::Lingkungan).unwrap().name.as_deref(), Some("GATEP"));
        // found, but the feature has no name
        let kel = r.get(Tier::Kelurahan).unwrap();
        assert!(kel.name.is_none());

        let r = service.lookup(&GeoPoint::new(-8.585, 116.105));
        let sls = r.get(Tier::Sls).unwrap();
        assert_eq!(sls.normalized_name, "RT 001 GATEP");
        assert_eq!(sls.bbox.unwrap().max_lat, -8.58);
    }
}
