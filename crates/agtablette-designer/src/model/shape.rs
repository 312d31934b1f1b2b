//! Shapes: named, colored outlines placed in a layer.
//!
//! A shape is built either from build steps relative to its anchor
//! `(x, y)`, or from segments and points owned by its layer. Geometry
//! that lives in the layer is passed in explicitly, so a shape never holds
//! references to other entities, only their ids.

use agtablette_core::{Color, LayerError, PointId, SegmentId, ShapeError, ShapeId};
use serde::{Deserialize, Deserializer, Serialize};

use super::shape_step::validate_build_steps;
use super::{Coordinates, ShapeStep, SymmetryAxis};
use crate::layer::{Layer, PointStore};

#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub name: String,
    pub family_name: String,
    pub color: Color,
    pub x: f64,
    pub y: f64,
    pub build_steps: Vec<ShapeStep>,
    pub segment_ids: Vec<SegmentId>,
    pub point_ids: Vec<PointId>,
    /// Accumulated rotation in degrees, within `[0, 360)`.
    pub rotate_angle: f64,
    pub is_reversed: bool,
    pub zoom_rate: f64,
    pub linked_shapes: Vec<ShapeId>,
    pub source_shape: Option<ShapeId>,
}

impl Shape {
    /// Builds a shape from build steps relative to `position`.
    pub fn from_build_steps(
        name: impl Into<String>,
        family_name: impl Into<String>,
        color: impl Into<Color>,
        position: Coordinates,
        build_steps: Vec<ShapeStep>,
    ) -> Result<Self, ShapeError> {
        let name = name.into();
        validate_build_steps(&name, &build_steps)?;
        let mut shape = Self::empty(name, family_name.into(), color.into(), position);
        shape.build_steps = build_steps;
        Ok(shape)
    }

    /// Builds a shape over segments and points already owned by a layer.
    /// `anchor` is usually the first vertex.
    pub fn from_segments(
        name: impl Into<String>,
        family_name: impl Into<String>,
        color: impl Into<Color>,
        anchor: Coordinates,
        segment_ids: Vec<SegmentId>,
        point_ids: Vec<PointId>,
    ) -> Result<Self, ShapeError> {
        let name = name.into();
        if segment_ids.is_empty() {
            return Err(ShapeError::NoGeometry { name });
        }
        let mut shape = Self::empty(name, family_name.into(), color.into(), anchor);
        shape.segment_ids = segment_ids;
        shape.point_ids = point_ids;
        Ok(shape)
    }

    fn empty(name: String, family_name: String, color: Color, position: Coordinates) -> Self {
        Self {
            id: 0,
            name,
            family_name,
            color,
            x: position.x,
            y: position.y,
            build_steps: Vec::new(),
            segment_ids: Vec::new(),
            point_ids: Vec::new(),
            rotate_angle: 0.0,
            is_reversed: false,
            zoom_rate: 1.0,
            linked_shapes: Vec::new(),
            source_shape: None,
        }
    }

    pub fn position(&self) -> Coordinates {
        Coordinates::new(self.x, self.y)
    }

    /// The anchor, used as the center of rotations and reversals.
    pub fn center(&self) -> Coordinates {
        self.position()
    }

    pub fn is_segment_based(&self) -> bool {
        self.build_steps.is_empty()
    }

    /// Outline vertices relative to the anchor.
    ///
    /// Arcs and curves contribute their endpoint only, so hit-testing near a
    /// curved edge follows the chord rather than the curve.
    pub fn local_vertices(&self, layer: &Layer) -> Result<Vec<Coordinates>, LayerError> {
        if !self.is_segment_based() {
            return Ok(self.build_steps.iter().map(ShapeStep::endpoint).collect());
        }

        let origin = self.position();
        let mut vertices: Vec<Coordinates> = Vec::with_capacity(self.segment_ids.len() + 1);
        for id in &self.segment_ids {
            let [a, b] = layer.segments().require(*id)?.vertices(layer.points())?;
            let (a, b) = (a - origin, b - origin);
            if vertices.last().is_none_or(|last| !last.equal(a)) {
                vertices.push(a);
            }
            vertices.push(b);
        }
        if vertices.len() > 2 && vertices[0].equal(vertices[vertices.len() - 1]) {
            vertices.pop();
        }
        Ok(vertices)
    }

    pub fn absolute_vertices(&self, layer: &Layer) -> Result<Vec<Coordinates>, LayerError> {
        let origin = self.position();
        Ok(self
            .local_vertices(layer)?
            .into_iter()
            .map(|v| v + origin)
            .collect())
    }

    /// Crossing-number test over the approximated outline, in the local frame.
    pub fn contains_point(&self, point: Coordinates, layer: &Layer) -> Result<bool, LayerError> {
        let vertices = self.local_vertices(layer)?;
        if vertices.len() < 3 {
            return Ok(false);
        }
        let p = point - self.position();

        let mut inside = false;
        let mut j = vertices.len() - 1;
        for i in 0..vertices.len() {
            let (vi, vj) = (vertices[i], vertices[j]);
            if ((vi.y > p.y) != (vj.y > p.y))
                && (p.x < (vj.x - vi.x) * (p.y - vi.y) / (vj.y - vi.y) + vi.x)
            {
                inside = !inside;
            }
            j = i;
        }
        Ok(inside)
    }

    /// Bounding box as `(min_x, min_y, max_x, max_y)`.
    pub fn bounds(&self, layer: &Layer) -> Result<(f64, f64, f64, f64), LayerError> {
        let init = (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);
        Ok(self
            .absolute_vertices(layer)?
            .into_iter()
            .fold(init, |(x0, y0, x1, y1), v| {
                (x0.min(v.x), y0.min(v.y), x1.max(v.x), y1.max(v.y))
            }))
    }

    /// Applies `f` to every owned point, after checking they all resolve.
    fn map_owned_points(
        &self,
        points: &mut PointStore,
        f: impl Fn(Coordinates) -> Coordinates,
    ) -> Result<(), LayerError> {
        for id in &self.point_ids {
            points.require(*id)?;
        }
        for id in &self.point_ids {
            let point = points.require_mut(*id)?;
            point.coordinates = f(point.coordinates);
        }
        Ok(())
    }

    fn set_position(&mut self, position: Coordinates) {
        self.x = position.x;
        self.y = position.y;
    }

    pub fn translate(&mut self, points: &mut PointStore, delta: Coordinates) -> Result<(), LayerError> {
        self.map_owned_points(points, |p| p + delta)?;
        self.set_position(self.position() + delta);
        Ok(())
    }

    /// Moves the anchor exactly onto `target`, carrying owned points along.
    pub fn move_to(&mut self, points: &mut PointStore, target: Coordinates) -> Result<(), LayerError> {
        let delta = target - self.position();
        self.map_owned_points(points, |p| p + delta)?;
        self.set_position(target);
        Ok(())
    }

    pub fn rotate(
        &mut self,
        points: &mut PointStore,
        angle: f64,
        center: Coordinates,
    ) -> Result<(), LayerError> {
        self.map_owned_points(points, |p| p.rotate(angle, center))?;
        self.set_position(self.position().rotate(angle, center));
        self.build_steps = self
            .build_steps
            .iter()
            .map(|s| s.map_points(|p| p.rotate(angle, Coordinates::ORIGIN)))
            .collect();
        self.rotate_angle = (self.rotate_angle + angle.to_degrees()).rem_euclid(360.0);
        Ok(())
    }

    /// Multiplies raw coordinates by `factor`, anchor included.
    pub fn scale(&mut self, points: &mut PointStore, factor: f64) -> Result<(), LayerError> {
        self.map_owned_points(points, |p| p * factor)?;
        self.set_position(self.position() * factor);
        self.build_steps = self
            .build_steps
            .iter()
            .map(|s| s.map_points(|p| p * factor))
            .collect();
        self.zoom_rate *= factor.abs();
        Ok(())
    }

    /// Scales distances from `center` by `factor`. A negative factor is a
    /// point reflection through `center`.
    pub fn homothety(
        &mut self,
        points: &mut PointStore,
        factor: f64,
        center: Coordinates,
    ) -> Result<(), LayerError> {
        self.scale(points, factor)?;
        self.translate(points, center - center * factor)
    }

    /// Toggles the reversed flag and flips arc directions.
    pub fn reverse(&mut self) {
        self.is_reversed = !self.is_reversed;
        for step in &mut self.build_steps {
            step.flip_direction();
        }
    }

    /// Mirrors the shape across `axis` and marks it reversed.
    pub fn reflect(&mut self, points: &mut PointStore, axis: &SymmetryAxis) -> Result<(), LayerError> {
        self.map_owned_points(points, |p| axis.reflect(p))?;
        self.set_position(axis.reflect(self.position()));
        let relative = axis.through_origin();
        self.build_steps = self
            .build_steps
            .iter()
            .map(|s| s.map_points(|p| relative.reflect(p)))
            .collect();
        self.reverse();
        Ok(())
    }

    /// SVG path of the outline in absolute coordinates.
    pub fn path(&self, layer: &Layer) -> Result<String, LayerError> {
        if self.is_segment_based() {
            return self.segments_path(layer);
        }

        let origin = self.position();
        let mut current = origin + self.build_steps[0].endpoint();
        let mut d = format!("M {} {}", num(current.x), num(current.y));
        for step in &self.build_steps[1..] {
            let end = origin + step.endpoint();
            match step {
                ShapeStep::Line { .. } => d.push_str(&format!(" L {} {}", num(end.x), num(end.y))),
                ShapeStep::Arc {
                    angle, direction, ..
                } => {
                    let chord = current.dist(end);
                    let half_sin = (angle.to_radians() / 2.0).sin().abs();
                    if chord < 1e-9 || half_sin < 1e-9 {
                        tracing::warn!(
                            "Shape {}: degenerate arc step to {}, drawn as a line",
                            self.id,
                            end
                        );
                        d.push_str(&format!(" L {} {}", num(end.x), num(end.y)));
                    } else {
                        let radius = chord / (2.0 * half_sin);
                        let large_arc = u8::from(angle.abs().rem_euclid(360.0) > 180.0);
                        let sweep = u8::from(*direction);
                        d.push_str(&format!(
                            " A {r} {r} 0 {} {} {} {}",
                            large_arc,
                            sweep,
                            num(end.x),
                            num(end.y),
                            r = num(radius)
                        ));
                    }
                }
                ShapeStep::QuadraticCurve { cp, .. } => {
                    let cp = origin + *cp;
                    d.push_str(&format!(
                        " Q {} {} {} {}",
                        num(cp.x),
                        num(cp.y),
                        num(end.x),
                        num(end.y)
                    ));
                }
                ShapeStep::CubicCurve { cp1, cp2, .. } => {
                    let (cp1, cp2) = (origin + *cp1, origin + *cp2);
                    d.push_str(&format!(
                        " C {} {} {} {} {} {}",
                        num(cp1.x),
                        num(cp1.y),
                        num(cp2.x),
                        num(cp2.y),
                        num(end.x),
                        num(end.y)
                    ));
                }
            }
            current = end;
        }
        d.push_str(" Z");
        Ok(d)
    }

    fn segments_path(&self, layer: &Layer) -> Result<String, LayerError> {
        let mut parts = Vec::with_capacity(self.segment_ids.len() * 2);
        let mut first: Option<Coordinates> = None;
        let mut last: Option<Coordinates> = None;
        for id in &self.segment_ids {
            let [a, b] = layer.segments().require(*id)?.vertices(layer.points())?;
            if last.is_none_or(|l| !l.equal(a)) {
                parts.push(format!("M {} {}", num(a.x), num(a.y)));
            }
            parts.push(format!("L {} {}", num(b.x), num(b.y)));
            first.get_or_insert(a);
            last = Some(b);
        }
        if let (Some(f), Some(l)) = (first, last) {
            if parts.len() > 2 && f.equal(l) {
                parts.push("Z".to_string());
            }
        }
        Ok(parts.join(" "))
    }

    /// Serializable snapshot, including the rendered path.
    pub fn save_data(&self, layer: &Layer) -> Result<ShapeData, LayerError> {
        Ok(ShapeData {
            id: self.id,
            name: self.name.clone(),
            family_name: self.family_name.clone(),
            color: self.color.clone(),
            x: self.x,
            y: self.y,
            build_steps: self.build_steps.clone(),
            segment_ids: self.segment_ids.clone(),
            point_ids: self.point_ids.clone(),
            rotate_angle: self.rotate_angle,
            is_reversed: self.is_reversed,
            zoom_rate: self.zoom_rate,
            linked_shapes: self.linked_shapes.clone(),
            source_shape: self.source_shape,
            path: self.path(layer)?,
        })
    }
}

fn num(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

/// Persisted form of a shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeData {
    pub id: ShapeId,
    pub name: String,
    pub family_name: String,
    pub color: Color,
    pub x: f64,
    pub y: f64,
    #[serde(default, deserialize_with = "deserialize_steps")]
    pub build_steps: Vec<ShapeStep>,
    #[serde(default)]
    pub segment_ids: Vec<SegmentId>,
    #[serde(default)]
    pub point_ids: Vec<PointId>,
    #[serde(default)]
    pub rotate_angle: f64,
    #[serde(default)]
    pub is_reversed: bool,
    #[serde(default = "default_zoom_rate")]
    pub zoom_rate: f64,
    #[serde(default)]
    pub linked_shapes: Vec<ShapeId>,
    #[serde(default)]
    pub source_shape: Option<ShapeId>,
    #[serde(default)]
    pub path: String,
}

fn default_zoom_rate() -> f64 {
    1.0
}

fn deserialize_steps<'de, D>(deserializer: D) -> Result<Vec<ShapeStep>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<serde_json::Value>::deserialize(deserializer)?;
    raw.iter()
        .map(|v| ShapeStep::from_value(v).map_err(serde::de::Error::custom))
        .collect()
}

impl TryFrom<ShapeData> for Shape {
    type Error = ShapeError;

    fn try_from(data: ShapeData) -> Result<Self, Self::Error> {
        let position = Coordinates::new(data.x, data.y);
        let mut shape = if data.build_steps.is_empty() {
            Shape::from_segments(
                data.name,
                data.family_name,
                data.color,
                position,
                data.segment_ids,
                data.point_ids,
            )?
        } else {
            let mut shape = Shape::from_build_steps(
                data.name,
                data.family_name,
                data.color,
                position,
                data.build_steps,
            )?;
            shape.segment_ids = data.segment_ids;
            shape.point_ids = data.point_ids;
            shape
        };
        shape.id = data.id;
        shape.rotate_angle = data.rotate_angle;
        shape.is_reversed = data.is_reversed;
        shape.zoom_rate = data.zoom_rate;
        shape.linked_shapes = data.linked_shapes;
        shape.source_shape = data.source_shape;
        Ok(shape)
    }
}
