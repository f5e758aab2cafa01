//! GeoJSON polygon decoding with per-feature validation.

use geo_types::{Geometry, LineString, MultiPolygon};

use crate::models::GeometryError;

/// Convert a feature's geometry into a multipolygon.
///
/// Each feature is decoded on its own so one bad geometry never spoils the
/// rest of its collection.
pub fn decode_geometry(
    geometry: Option<geojson::Geometry>,
) -> Result<MultiPolygon<f64>, GeometryError> {
    let geometry = geometry.ok_or(GeometryError::Missing)?;

    match &geometry.value {
        geojson::Value::Polygon(_) | geojson::Value::MultiPolygon(_) => {}
        other => return Err(GeometryError::Unsupported(kind(other).to_string())),
    }

    let converted = Geometry::<f64>::try_from(geometry.value)
        .map_err(|e| GeometryError::Invalid(e.to_string()))?;

    let polygons = match converted {
        Geometry::Polygon(p) => MultiPolygon::new(vec![p]),
        Geometry::MultiPolygon(mp) => mp,
        _ => return Err(GeometryError::Invalid("unexpected conversion result".to_string())),
    };

    validate(&polygons)?;
    Ok(polygons)
}

fn kind(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        _ => "GeometryCollection",
    }
}

/// Rings arrive closed from the conversion; reject degenerate or non-finite ones
fn validate(polygons: &MultiPolygon<f64>) -> Result<(), GeometryError> {
    if polygons.0.is_empty() {
        return Err(GeometryError::Invalid("empty multipolygon".to_string()));
    }

    for polygon in polygons.iter() {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            check_ring(ring)?;
        }
    }
    Ok(())
}

fn check_ring(ring: &LineString<f64>) -> Result<(), GeometryError> {
    if ring.0.len() < 4 {
        return Err(GeometryError::Invalid(format!(
            "ring has {} positions, need at least 4",
            ring.0.len()
        )));
    }
    if let Some(c) = ring.coords().find(|c| !c.x.is_finite() || !c.y.is_finite()) {
        return Err(GeometryError::Invalid(format!("bad position {:?}", c)));
    }
    Ok(())
}
