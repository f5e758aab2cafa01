//! Point-in-Polygon (PIP) boundary lookup.
//!
//! Loads the per-tier GeoJSON boundary collections and answers "which unit
//! contains this point" with first-match-wins semantics.

mod boundary;
mod geometry;
mod index;
mod locate;
mod service;

pub use boundary::{load_tier, parse_boundaries, read_boundaries, BoundarySources};
pub use geometry::decode_geometry;
pub use index::{BoundaryIndex, TierIndex};
pub use locate::locate;
pub use service::{PipService, Resolution, TierMatch};
