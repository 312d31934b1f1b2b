//! Error handling for AGtablette
//!
//! Provides the error types for every layer of the geometry core:
//! - Shape errors (construction invariants)
//! - Layer errors (referential integrity between shapes, segments and points)
//! - History errors (undo replay)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::types::{LayerKind, PointId, SegmentId, ShapeId};

/// Shape construction error type
///
/// Raised when a shape, a template or a build step violates its
/// construction invariants. Callers log these and abort the operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// A shape or template was given no build steps
    #[error("Shape '{name}' has no build steps")]
    EmptyBuildSteps {
        /// The shape or template name.
        name: String,
    },

    /// The first build step must be a line acting as the move-to point
    #[error("Shape '{name}' must start with a line step, found {kind}")]
    FirstStepNotLine {
        /// The shape or template name.
        name: String,
        /// The tag of the offending step.
        kind: String,
    },

    /// A build step carried a tag that is not line, arc or curve
    #[error("Unknown build step kind: {kind}")]
    UnknownStepKind {
        /// The unrecognized tag.
        kind: String,
    },

    /// A build step of a known kind carried malformed parameters
    #[error("Invalid {kind} step: {reason}")]
    InvalidStep {
        /// The step tag.
        kind: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A template name was not found in a family
    #[error("Template '{name}' not found in family '{family}'")]
    TemplateNotFound {
        /// The family searched.
        family: String,
        /// The requested template name.
        name: String,
    },

    /// A shape was built from neither build steps nor segments
    #[error("Shape '{name}' has no geometry")]
    NoGeometry {
        /// The shape name.
        name: String,
    },
}

/// Layer integrity error type
///
/// A shape referenced an id that does not resolve in its owning layer.
/// This means the layer is corrupted and is distinct from an ordinary
/// "nothing found" lookup, which is expressed with `Option`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayerError {
    /// Shape id missing from the layer
    #[error("Shape {id} not found in {layer} layer")]
    ShapeNotFound {
        /// The layer searched.
        layer: LayerKind,
        /// The missing shape id.
        id: ShapeId,
    },

    /// Segment id missing from the layer
    #[error("Segment {id} not found in {layer} layer")]
    SegmentNotFound {
        /// The layer searched.
        layer: LayerKind,
        /// The missing segment id.
        id: SegmentId,
    },

    /// Point id missing from the layer
    #[error("Point {id} not found in {layer} layer")]
    PointNotFound {
        /// The layer searched.
        layer: LayerKind,
        /// The missing point id.
        id: PointId,
    },

    /// Saved id too large for the layer to keep allocating after it
    #[error("Id {id} is out of range in {layer} layer")]
    IdOutOfRange {
        layer: LayerKind,
        id: u64,
    },
}

/// History replay error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HistoryError {
    /// No tool state is registered for the recorded action name
    #[error("Unknown history action: {name}")]
    UnknownAction {
        /// The recorded action name.
        name: String,
    },

    /// The recorded data does not decode for its action
    #[error("Invalid history data for '{action}': {reason}")]
    InvalidData {
        /// The recorded action name.
        action: String,
        /// Why decoding failed.
        reason: String,
    },
}

/// Main error type for AGtablette
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Shape construction error
    #[error(transparent)]
    Shape(#[from] ShapeError),

    /// Layer integrity error
    #[error(transparent)]
    Layer(#[from] LayerError),

    /// History replay error
    #[error(transparent)]
    History(#[from] HistoryError),

    /// Serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this error means a layer is corrupted
    pub fn is_integrity_error(&self) -> bool {
        matches!(self, Error::Layer(_))
    }

    /// Check if this is a shape construction error
    pub fn is_shape_error(&self) -> bool {
        matches!(self, Error::Shape(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_error_display() {
        let err = ShapeError::EmptyBuildSteps {
            name: "Carré".to_string(),
        };
        assert_eq!(err.to_string(), "Shape 'Carré' has no build steps");

        let err = ShapeError::UnknownStepKind {
            kind: "spline".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown build step kind: spline");
    }

    #[test]
    fn test_layer_error_display() {
        let err = LayerError::SegmentNotFound {
            layer: LayerKind::Tangram,
            id: 7,
        };
        assert_eq!(err.to_string(), "Segment 7 not found in tangram layer");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = LayerError::PointNotFound {
            layer: LayerKind::Main,
            id: 3,
        }
        .into();
        assert!(err.is_integrity_error());
        assert!(!err.is_shape_error());

        let err: Error = ShapeError::NoGeometry {
            name: "x".to_string(),
        }
        .into();
        assert!(err.is_shape_error());
    }

    #[test]
    fn test_other_error() {
        let err = Error::other("boom");
        assert_eq!(err.to_string(), "boom");
    }
}
