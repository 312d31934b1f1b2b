//! 2D coordinates used for positions, vectors and build-step parameters.
//!
//! `Coordinates` is a plain value: every operation returns a new value and
//! never mutates its operands.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use crate::viewport::Viewport;

/// Default tolerance used by [`Coordinates::equal`].
pub const DEFAULT_PRECISION: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: f64,
    pub y: f64,
}

impl Coordinates {
    pub const ORIGIN: Coordinates = Coordinates { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(self, other: Coordinates) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    pub fn substract(self, other: Coordinates) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Uniform multiplication of both components.
    pub fn multiply(self, factor: f64) -> Self {
        self.multiply_xy(factor, factor)
    }

    pub fn multiply_xy(self, fx: f64, fy: f64) -> Self {
        Self::new(self.x * fx, self.y * fy)
    }

    /// Tolerant equality with [`DEFAULT_PRECISION`].
    pub fn equal(self, other: Coordinates) -> bool {
        self.equal_within(other, DEFAULT_PRECISION)
    }

    /// Tolerant equality: true when the distance is at most `precision`.
    pub fn equal_within(self, other: Coordinates, precision: f64) -> bool {
        self.dist(other) <= precision
    }

    pub fn dist(self, other: Coordinates) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Angle of the vector from `self` to `other`, in radians within `[0, 2π)`.
    ///
    /// Measured from the positive x axis towards the positive y axis, which
    /// points down on the canvas.
    pub fn angle_with(self, other: Coordinates) -> f64 {
        let mut angle = (other.y - self.y).atan2(other.x - self.x);
        if angle < 0.0 {
            angle += 2.0 * PI;
        }
        if 2.0 * PI - angle < 1e-5 {
            angle = 0.0;
        }
        angle
    }

    pub fn middle_with(self, other: Coordinates) -> Self {
        Self::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Rotates around `center`. A positive angle increases [`angle_with`](Self::angle_with)
    /// measured from the center.
    pub fn rotate(self, angle: f64, center: Coordinates) -> Self {
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Self::new(
            center.x + dx * cos - dy * sin,
            center.y + dx * sin + dy * cos,
        )
    }

    pub fn dot(self, other: Coordinates) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// World to canvas: `world * zoom + offset`.
    pub fn to_canvas_coordinates(self, viewport: &Viewport) -> Self {
        viewport.world_to_canvas(self)
    }

    /// Canvas to world: `(canvas - offset) / zoom`.
    pub fn from_canvas_coordinates(self, viewport: &Viewport) -> Self {
        viewport.canvas_to_world(self)
    }
}

impl Add for Coordinates {
    type Output = Coordinates;

    fn add(self, rhs: Coordinates) -> Coordinates {
        Coordinates::add(self, rhs)
    }
}

impl Sub for Coordinates {
    type Output = Coordinates;

    fn sub(self, rhs: Coordinates) -> Coordinates {
        self.substract(rhs)
    }
}

impl Mul<f64> for Coordinates {
    type Output = Coordinates;

    fn mul(self, rhs: f64) -> Coordinates {
        self.multiply(rhs)
    }
}

impl Neg for Coordinates {
    type Output = Coordinates;

    fn neg(self) -> Coordinates {
        Coordinates::new(-self.x, -self.y)
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}
