//! Geometric model: coordinates, build steps, points, segments, shapes
//! and symmetry axes.

mod coordinates;
mod point;
mod segment;
mod shape;
mod shape_step;
mod symmetry;

pub use coordinates::{Coordinates, DEFAULT_PRECISION};
pub use point::Point;
pub use segment::Segment;
pub use shape::{Shape, ShapeData};
pub use shape_step::{validate_build_steps, ShapeStep};
pub use symmetry::{AxisKind, SymmetryAxis};
