//! Linear point-in-polygon scan.

use geo::Contains;
use geo_types::Point;
use tracing::debug;

use crate::models::{Boundary, GeoPoint};

/// Return the first boundary, in collection order, whose geometry contains
/// the point.
///
/// Containment is strict: a point lying exactly on an edge or vertex is not
/// contained. Boundaries with unusable geometry are skipped. Overlapping
/// boundaries are not disambiguated beyond first match.
pub fn locate<'a>(point: &GeoPoint, boundaries: &'a [Boundary]) -> Option<&'a Boundary> {
    let point = point.to_point();
    boundaries.iter().find(|b| contains(b, &point))
}

/// Strict containment test; `false` for boundaries without usable geometry.
pub(crate) fn contains(boundary: &Boundary, point: &Point<f64>) -> bool {
    match &boundary.geometry {
        Ok(geometry) => geometry.contains(point),
        Err(e) => {
            debug!(
                "Skipping {} boundary '{}': {}",
                boundary.tier.label(),
                boundary.raw_name,
                e
            );
            false
        }
    }
}
