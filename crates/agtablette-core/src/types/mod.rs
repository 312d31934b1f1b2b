//! Identifier and naming aliases shared across crates.
//!
//! Shapes, segments and points reference each other by id only. The
//! owning [`LayerKind`] collection is the single place those ids resolve.

pub mod ids;

pub use ids::*;
