//! Per-tier boundary collections with an R-tree prefilter.

use geo_types::Point;
use rstar::{RTree, RTreeObject, AABB};
use std::collections::BTreeMap;
use tracing::info;

use super::boundary::{load_tier, BoundarySources};
use super::locate::contains;
use crate::models::{Boundary, GeoPoint, Tier};

/// Envelope of one boundary, pointing back at its position in the tier
#[derive(Clone)]
struct IndexedBoundary {
    ordinal: usize,
    envelope: AABB<[f64; 2]>,
}

impl RTreeObject for IndexedBoundary {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        self.envelope
    }
}

/// All boundaries of one tier, in source order.
pub struct TierIndex {
    boundaries: Vec<Boundary>,
    tree: RTree<IndexedBoundary>,
}

impl TierIndex {
    pub fn build(boundaries: Vec<Boundary>) -> Self {
        // Boundaries without a usable geometry get no envelope
        let indexed: Vec<IndexedBoundary> = boundaries
            .iter()
            .enumerate()
            .filter_map(|(ordinal, b)| {
                let bbox = b.bbox()?;
                Some(IndexedBoundary {
                    ordinal,
                    envelope: AABB::from_corners(
                        [bbox.min_lon, bbox.min_lat],
                        [bbox.max_lon, bbox.max_lat],
                    ),
                })
            })
            .collect();

        Self {
            boundaries,
            tree: RTree::bulk_load(indexed),
        }
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    /// Same answer as the linear `locate` over [`Self::boundaries`]: among the
    /// envelope candidates, the containing boundary with the lowest ordinal.
    pub fn locate(&self, point: &GeoPoint) -> Option<&Boundary> {
        let query_envelope = AABB::from_point([point.lon, point.lat]);
        let point: Point<f64> = point.to_point();

        self.tree
            .locate_in_envelope_intersecting(&query_envelope)
            .map(|ib| ib.ordinal)
            .filter(|&ordinal| contains(&self.boundaries[ordinal], &point))
            .min()
            .map(|ordinal| &self.boundaries[ordinal])
    }

    pub fn len(&self) -> usize {
        self.boundaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.boundaries.is_empty()
    }
}

/// The three boundary collections, built once and read-only afterwards.
#[derive(Default)]
pub struct BoundaryIndex {
    tiers: BTreeMap<Tier, TierIndex>,
}

impl BoundaryIndex {
    /// Load every tier named in `sources`. Unavailable sources leave their
    /// tier empty.
    pub fn load(sources: &BoundarySources) -> Self {
        let mut index = Self::default();
        for (tier, path) in &sources.paths {
            index.insert(*tier, load_tier(*tier, path));
        }

        for tier in Tier::all() {
            info!("  {}: {} boundaries", tier.label(), index.boundaries_for(*tier).len());
        }

        index
    }

    /// Build from already-parsed boundaries
    pub fn from_tiers<I>(tiers: I) -> Self
    where
        I: IntoIterator<Item = (Tier, Vec<Boundary>)>,
    {
        let mut index = Self::default();
        for (tier, boundaries) in tiers {
            index.insert(tier, boundaries);
        }
        index
    }

    fn insert(&mut self, tier: Tier, boundaries: Vec<Boundary>) {
        self.tiers.insert(tier, TierIndex::build(boundaries));
    }

    /// Boundaries of a tier in enumeration order; empty when unknown
    pub fn boundaries_for(&self, tier: Tier) -> &[Boundary] {
        self.tiers
            .get(&tier)
            .map(TierIndex::boundaries)
            .unwrap_or(&[])
    }

    /// First boundary of `tier` containing the point
    pub fn locate(&self, tier: Tier, point: &GeoPoint) -> Option<&Boundary> {
        self.tiers.get(&tier)?.locate(point)
    }

    /// Whether a tier has at least one boundary
    pub fn has_tier(&self, tier: Tier) -> bool {
        self.tiers.get(&tier).map_or(false, |t| !t.is_empty())
    }

    /// Get total number of boundaries across tiers
    pub fn len(&self) -> usize {
        self.tiers.values().map(TierIndex::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
