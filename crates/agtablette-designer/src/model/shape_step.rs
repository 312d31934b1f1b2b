//! Build steps: the drawing primitives composing a shape outline.
//!
//! Coordinates carried by a step are relative to the owning shape's anchor.

use agtablette_core::ShapeError;
use serde::{Deserialize, Serialize};

use super::Coordinates;

/// One outline primitive. The first step of a shape is always a `Line`
/// acting as the move-to point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ShapeStep {
    /// Straight line to the endpoint.
    Line { x: f64, y: f64 },
    /// Circular arc to the endpoint sweeping `angle` degrees.
    /// `direction` is true for clockwise on the canvas.
    Arc {
        x: f64,
        y: f64,
        angle: f64,
        direction: bool,
    },
    /// Quadratic Bézier curve to the endpoint.
    QuadraticCurve { x: f64, y: f64, cp: Coordinates },
    /// Cubic Bézier curve to the endpoint.
    CubicCurve {
        x: f64,
        y: f64,
        cp1: Coordinates,
        cp2: Coordinates,
    },
}

const KNOWN_KINDS: [&str; 4] = ["line", "arc", "quadraticCurve", "cubicCurve"];

impl ShapeStep {
    pub fn line(x: f64, y: f64) -> Self {
        ShapeStep::Line { x, y }
    }

    pub fn arc(x: f64, y: f64, angle: f64, direction: bool) -> Self {
        ShapeStep::Arc {
            x,
            y,
            angle,
            direction,
        }
    }

    pub fn quadratic_curve(x: f64, y: f64, cp: Coordinates) -> Self {
        ShapeStep::QuadraticCurve { x, y, cp }
    }

    pub fn cubic_curve(x: f64, y: f64, cp1: Coordinates, cp2: Coordinates) -> Self {
        ShapeStep::CubicCurve { x, y, cp1, cp2 }
    }

    /// Decodes a serialized step, reporting unrecognized tags as
    /// [`ShapeError::UnknownStepKind`].
    pub fn from_value(value: &serde_json::Value) -> Result<Self, ShapeError> {
        let kind = value
            .get("type")
            .and_then(|t| t.as_str())
            .unwrap_or("<missing>");
        if !KNOWN_KINDS.contains(&kind) {
            return Err(ShapeError::UnknownStepKind {
                kind: kind.to_string(),
            });
        }
        serde_json::from_value(value.clone()).map_err(|e| ShapeError::InvalidStep {
            kind: kind.to_string(),
            reason: e.to_string(),
        })
    }

    /// Independent copy carrying the full parameter set.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ShapeStep::Line { .. } => "line",
            ShapeStep::Arc { .. } => "arc",
            ShapeStep::QuadraticCurve { .. } => "quadraticCurve",
            ShapeStep::CubicCurve { .. } => "cubicCurve",
        }
    }

    pub fn is_line(&self) -> bool {
        matches!(self, ShapeStep::Line { .. })
    }

    pub fn endpoint(&self) -> Coordinates {
        match *self {
            ShapeStep::Line { x, y }
            | ShapeStep::Arc { x, y, .. }
            | ShapeStep::QuadraticCurve { x, y, .. }
            | ShapeStep::CubicCurve { x, y, .. } => Coordinates::new(x, y),
        }
    }

    /// Applies `f` to the endpoint and every control point.
    pub fn map_points(&self, f: impl Fn(Coordinates) -> Coordinates) -> Self {
        let end = f(self.endpoint());
        match self {
            ShapeStep::Line { .. } => ShapeStep::line(end.x, end.y),
            ShapeStep::Arc {
                angle, direction, ..
            } => ShapeStep::arc(end.x, end.y, *angle, *direction),
            ShapeStep::QuadraticCurve { cp, .. } => ShapeStep::quadratic_curve(end.x, end.y, f(*cp)),
            ShapeStep::CubicCurve { cp1, cp2, .. } => {
                ShapeStep::cubic_curve(end.x, end.y, f(*cp1), f(*cp2))
            }
        }
    }

    /// Flips the sweep direction of arcs. Other steps are unchanged.
    pub fn flip_direction(&mut self) {
        if let ShapeStep::Arc { direction, .. } = self {
            *direction = !*direction;
        }
    }
}

/// Checks the invariants of a build-step list: non-empty and starting with a line.
pub fn validate_build_steps(name: &str, steps: &[ShapeStep]) -> Result<(), ShapeError> {
    match steps.first() {
        None => Err(ShapeError::EmptyBuildSteps {
            name: name.to_string(),
        }),
        Some(first) if !first.is_line() => Err(ShapeError::FirstStepNotLine {
            name: name.to_string(),
            kind: first.kind().to_string(),
        }),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_copy_is_independent() {
        let original = ShapeStep::cubic_curve(
            10.0,
            0.0,
            Coordinates::new(2.0, 5.0),
            Coordinates::new(8.0, 5.0),
        );
        let mut copy = original.copy();
        if let ShapeStep::CubicCurve { cp1, .. } = &mut copy {
            cp1.x = 99.0;
        }
        assert_ne!(copy, original);
        assert_eq!(
            original,
            ShapeStep::cubic_curve(
                10.0,
                0.0,
                Coordinates::new(2.0, 5.0),
                Coordinates::new(8.0, 5.0)
            )
        );
    }

    #[test]
    fn test_serialized_tag() {
        let value = serde_json::to_value(ShapeStep::arc(1.0, 2.0, 90.0, true)).unwrap();
        assert_eq!(value["type"], "arc");
        assert_eq!(value["angle"], 90.0);
        assert_eq!(ShapeStep::from_value(&value).unwrap(), ShapeStep::arc(1.0, 2.0, 90.0, true));
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let err = ShapeStep::from_value(&json!({"type": "spline", "x": 0, "y": 0})).unwrap_err();
        assert_eq!(
            err,
            ShapeError::UnknownStepKind {
                kind: "spline".to_string()
            }
        );
    }

    #[test]
    fn test_map_points_reaches_control_points() {
        let step = ShapeStep::quadratic_curve(4.0, 0.0, Coordinates::new(2.0, 2.0));
        let moved = step.map_points(|p| p + Coordinates::new(1.0, 1.0));
        assert_eq!(
            moved,
            ShapeStep::quadratic_curve(5.0, 1.0, Coordinates::new(3.0, 3.0))
        );
    }

    #[test]
    fn test_validate_build_steps() {
        assert!(validate_build_steps("a", &[]).is_err());
        assert!(validate_build_steps("a", &[ShapeStep::arc(0.0, 0.0, 90.0, false)]).is_err());
        assert!(validate_build_steps("a", &[ShapeStep::line(0.0, 0.0)]).is_ok());
    }

    #[test]
    fn test_flip_direction() {
        let mut arc = ShapeStep::arc(1.0, 1.0, 45.0, false);
        arc.flip_direction();
        assert_eq!(arc, ShapeStep::arc(1.0, 1.0, 45.0, true));
        let mut line = ShapeStep::line(1.0, 1.0);
        line.flip_direction();
        assert_eq!(line, ShapeStep::line(1.0, 1.0));
    }
}
