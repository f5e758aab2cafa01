//! Coordinate extraction from map links.

use regex::Regex;
use std::sync::LazyLock;

use crate::models::GeoPoint;

/// `@lat,lon` as in `https://www.google.com/maps/@-8.58,116.11,18z`
static AT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@(-?[0-9]+\.[0-9]+),(-?[0-9]+\.[0-9]+)").expect("@ pattern is valid")
});

/// `q=lat,lon` as in `https://maps.google.com/?q=-8.58,116.11`
static QUERY_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"q=(-?[0-9]+\.[0-9]+),(-?[0-9]+\.[0-9]+)").expect("q= pattern is valid")
});

/// Pull a latitude/longitude pair out of free-form text.
///
/// Tries the `@lat,lon` form first and falls back to `q=lat,lon`. Values are
/// not range-checked. Returns `None` when neither form is present.
pub fn extract(text: &str) -> Option<GeoPoint> {
    [&*AT_PATTERN, &*QUERY_PATTERN]
        .into_iter()
        .find_map(|pattern| {
            let caps = pattern.captures(text)?;
            let lat = caps[1].parse::<f64>().ok()?;
            let lon = caps[2].parse::<f64>().ok()?;
            Some(GeoPoint::new(lat, lon))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_segment() {
        let p = extract("https://maps.google.com/maps/@-8.6229077,116.0834501,18z").unwrap();
        assert_eq!(p.lat, -8.6229077);
        assert_eq!(p.lon, 116.0834501);
    }

    #[test]
    fn test_query_param() {
        let p = extract("https://maps.google.com/maps?q=-8.58,116.11").unwrap();
        assert_eq!(p, GeoPoint::new(-8.58, 116.11));
    }

    #[test]
    fn test_at_wins_over_query() {
        let p = extract("https://www.google.com/maps/place/X/?q=1.5,2.5&x=@-8.5,116.1,17z").unwrap();
        assert_eq!(p, GeoPoint::new(-8.5, 116.1));
    }

    #[test]
    fn test_not_found() {
        assert!(extract("no coordinates here").is_none());
        assert!(extract("").is_none());
        // both components need a decimal point
        assert!(extract("https://maps.google.com/@-8,116,18z").is_none());
    }

    #[test]
    fn test_out_of_range_is_not_rejected() {
        let p = extract("@123.0,-456.75").unwrap();
        assert_eq!(p, GeoPoint::new(123.0, -456.75));
    }

    #[test]
    fn test_long_fractions() {
        let p = extract("?q=-8.583312345678901234,116.116700000000001").unwrap();
        assert!((p.lat + 8.583312345678901).abs() < 1e-12);
        assert!((p.lon - 116.1167).abs() < 1e-12);
    }
}
