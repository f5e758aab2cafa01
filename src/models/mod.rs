//! Core data models for boundary lookup and coverage analysis.

pub mod boundary;
pub mod tier;

pub use boundary::{Boundary, GeoBbox, GeoPoint, GeometryError};
pub use tier::{Tier, UnknownTier};
