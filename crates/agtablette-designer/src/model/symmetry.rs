//! Symmetry axes used by the reverse tool.
//!
//! The axis always passes through a shape's anchor and is one of four
//! fixed orientations. Which one is chosen depends on the 45° sector the
//! cursor falls in, seen from the anchor.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use super::Coordinates;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AxisKind {
    /// `|`
    #[serde(rename = "V")]
    Vertical,
    /// `\` on the canvas (y grows downwards)
    #[serde(rename = "NW")]
    NorthWest,
    /// `-`
    #[serde(rename = "H")]
    Horizontal,
    /// `/` on the canvas (y grows downwards)
    #[serde(rename = "SW")]
    SouthWest,
}

impl AxisKind {
    /// Two points on the axis, relative to its center.
    pub fn offsets(self) -> (Coordinates, Coordinates) {
        match self {
            AxisKind::Vertical => (Coordinates::new(0.0, -1.0), Coordinates::new(0.0, 1.0)),
            AxisKind::NorthWest => (Coordinates::new(-1.0, -1.0), Coordinates::new(1.0, 1.0)),
            AxisKind::Horizontal => (Coordinates::new(-1.0, 0.0), Coordinates::new(1.0, 0.0)),
            AxisKind::SouthWest => (Coordinates::new(-1.0, 1.0), Coordinates::new(1.0, -1.0)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SymmetryAxis {
    pub kind: AxisKind,
    pub center: Coordinates,
}

impl SymmetryAxis {
    pub fn new(kind: AxisKind, center: Coordinates) -> Self {
        Self { kind, center }
    }

    /// Picks the axis from the direction of `click` seen from `center`,
    /// snapped to 45° sectors. The angle is measured from the +y axis
    /// (downwards on the canvas) towards +x, so a click straight below or
    /// above the center gives a vertical axis.
    pub fn for_click(center: Coordinates, click: Coordinates) -> Self {
        let delta = click - center;
        let mut angle = delta.x.atan2(delta.y);
        if angle < 0.0 {
            angle += 2.0 * PI;
        }
        if angle > PI {
            angle -= PI;
        }
        let kind = if angle <= PI / 8.0 || angle > 7.0 * PI / 8.0 {
            AxisKind::Vertical
        } else if angle <= 3.0 * PI / 8.0 {
            AxisKind::NorthWest
        } else if angle <= 5.0 * PI / 8.0 {
            AxisKind::Horizontal
        } else {
            AxisKind::SouthWest
        };
        Self::new(kind, center)
    }

    /// Same orientation, passing through the origin. Used for coordinates
    /// that are relative to a shape anchor.
    pub fn through_origin(&self) -> Self {
        Self::new(self.kind, Coordinates::ORIGIN)
    }

    /// Absolute endpoints of a segment of the axis of length `2 * half_length`.
    pub fn endpoints(&self, half_length: f64) -> (Coordinates, Coordinates) {
        let (p1, p2) = self.kind.offsets();
        let unit = 1.0 / p1.dist(Coordinates::ORIGIN);
        (
            self.center + p1 * (unit * half_length),
            self.center + p2 * (unit * half_length),
        )
    }

    /// Orthogonal projection of `point` on the axis.
    pub fn project(&self, point: Coordinates) -> Coordinates {
        let (p1, p2) = self.kind.offsets();
        let origin = self.center + p1;
        let direction = p2 - p1;
        let t = (point - origin).dot(direction) / direction.dot(direction);
        origin + direction * t
    }

    /// Position of `point` after `progress` (0 to 1) of the reflection.
    pub fn interpolate(&self, point: Coordinates, progress: f64) -> Coordinates {
        let projection = self.project(point);
        point + (projection - point) * (2.0 * progress)
    }

    pub fn reflect(&self, point: Coordinates) -> Coordinates {
        self.interpolate(point, 1.0)
    }
}
