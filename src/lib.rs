//! Batas - administrative boundary lookup and survey coverage analysis
//!
//! Resolves map links to the SLS, Lingkungan and Kelurahan containing them,
//! and reconciles surveyed SLS names against the full boundary set.
//! This library provides shared types and modules for the CLI and server binaries.

pub mod cache;
pub mod config;
pub mod coverage;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod pip;

pub use extract::extract;
pub use models::{Boundary, GeoPoint, Tier};
pub use normalize::normalize;
pub use pip::{locate, BoundaryIndex};
