//! Id aliases and the layer discriminant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a shape inside its layer.
pub type ShapeId = u64;

/// Identifier of a segment inside its layer.
pub type SegmentId = u64;

/// Identifier of a point inside its layer.
pub type PointId = u64;

/// A CSS-style color string such as `#aaa` or `#ff0000`.
pub type Color = String;

/// The logical collections composing a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// The user's drawing.
    #[default]
    Main,
    /// Background silhouettes (tangram puzzles).
    Tangram,
    /// Grid points used for magnetism.
    Grid,
}

impl LayerKind {
    /// All layers, back to front.
    pub const ALL: [LayerKind; 3] = [LayerKind::Grid, LayerKind::Tangram, LayerKind::Main];
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Main => write!(f, "main"),
            LayerKind::Tangram => write!(f, "tangram"),
            LayerKind::Grid => write!(f, "grid"),
        }
    }
}
