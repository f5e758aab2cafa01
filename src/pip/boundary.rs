//! Boundary loading from GeoJSON feature collections.

use anyhow::{anyhow, Context, Result};
use flate2::read::GzDecoder;
use geojson::GeoJson;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::geometry::decode_geometry;
use crate::models::{Boundary, Tier};

/// Where each tier's boundary document lives. A tier without an entry is
/// simply unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BoundarySources {
    pub paths: BTreeMap<Tier, PathBuf>,
}

impl BoundarySources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, tier: Tier, path: impl Into<PathBuf>) -> Self {
        self.paths.insert(tier, path.into());
        self
    }

    pub fn get(&self, tier: Tier) -> Option<&Path> {
        self.paths.get(&tier).map(PathBuf::as_path)
    }
}

/// Build boundaries for one tier from a parsed GeoJSON document.
///
/// Fails only when the document is not a feature collection. Features with
/// unusable geometry are kept with the geometry error attached.
pub fn parse_boundaries(tier: Tier, document: GeoJson) -> Result<Vec<Boundary>> {
    let collection = match document {
        GeoJson::FeatureCollection(fc) => fc,
        _ => return Err(anyhow!("GeoJSON must be a FeatureCollection")),
    };

    let key = tier.name_key();
    let mut boundaries = Vec::with_capacity(collection.features.len());
    let mut malformed = 0;

    for (i, feature) in collection.features.into_iter().enumerate() {
        let raw_name = match feature.property(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => {
                debug!("{} feature {}: non-string '{}' = {}", tier.label(), i, key, other);
                String::new()
            }
            None => {
                debug!("{} feature {}: no '{}' property", tier.label(), i, key);
                String::new()
            }
        };

        let geometry = decode_geometry(feature.geometry);
        if let Err(e) = &geometry {
            malformed += 1;
            warn!("{} feature {} ('{}'): {}", tier.label(), i, raw_name, e);
        }

        boundaries.push(Boundary::new(tier, raw_name, geometry));
    }

    if malformed > 0 {
        warn!(
            "{}: {} of {} features have unusable geometry",
            tier.label(),
            malformed,
            boundaries.len()
        );
    }

    Ok(boundaries)
}

/// Read and parse a tier's boundary file. `.gz` files are decompressed.
pub fn read_boundaries(tier: Tier, path: &Path) -> Result<Vec<Boundary>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open boundary file {}", path.display()))?;
    let reader: Box<dyn Read> = if path.extension().map_or(false, |e| e == "gz") {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let document = GeoJson::from_reader(BufReader::new(reader))
        .with_context(|| format!("Failed to parse GeoJSON {}", path.display()))?;

    parse_boundaries(tier, document)
}

/// Load a tier, degrading to an empty collection when the source is missing
/// or unreadable.
pub fn load_tier(tier: Tier, path: &Path) -> Vec<Boundary> {
    match read_boundaries(tier, path) {
        Ok(boundaries) => {
            info!(
                "Loaded {} {} boundaries from {}",
                boundaries.len(),
                tier.label(),
                path.display()
            );
            boundaries
        }
        Err(e) => {
            warn!("{} boundaries unavailable: {:#}", tier.label(), e);
            Vec::new()
        }
    }
}
