//! Layers own shapes, segments and points.
//!
//! Entities refer to each other by id only. A [`Store`] resolves ids inside
//! one layer and reports a dangling id as a [`LayerError`], which callers
//! treat as corruption rather than an ordinary miss.

use std::collections::BTreeMap;

use agtablette_core::{Color, LayerError, LayerKind, PointId, SegmentId, ShapeError, ShapeId};
use serde::{Deserialize, Serialize};

use crate::model::{Coordinates, Point, Segment, Shape, ShapeData};

/// An id-addressed entity stored in a layer.
pub trait Entity {
    fn id(&self) -> u64;
    /// The integrity error raised when `id` does not resolve in `layer`.
    fn missing(layer: LayerKind, id: u64) -> LayerError;
}

/// Id arena for one kind of entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Store<T: Entity> {
    layer: LayerKind,
    items: BTreeMap<u64, T>,
}

impl<T: Entity> Store<T> {
    pub fn new(layer: LayerKind) -> Self {
        Self {
            layer,
            items: BTreeMap::new(),
        }
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.items.get(&id)
    }

    /// Like [`get`](Self::get), for ids that must exist.
    pub fn require(&self, id: u64) -> Result<&T, LayerError> {
        self.items.get(&id).ok_or_else(|| T::missing(self.layer, id))
    }

    pub fn require_mut(&mut self, id: u64) -> Result<&mut T, LayerError> {
        let layer = self.layer;
        self.items.get_mut(&id).ok_or_else(|| T::missing(layer, id))
    }

    /// Inserts or replaces the entity under its own id.
    pub fn insert(&mut self, item: T) {
        self.items.insert(item.id(), item);
    }

    pub fn remove(&mut self, id: u64) -> Option<T> {
        self.items.remove(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.items.values_mut()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

/// Largest id a saved layer may use. Saved files come from a JavaScript
/// front end, whose integers are exact up to 2^53 - 1.
pub const MAX_ENTITY_ID: u64 = (1 << 53) - 1;

/// The id to allocate after `id`, if `id` is in range.
fn id_after(layer: LayerKind, id: u64) -> Result<u64, LayerError> {
    id.checked_add(1)
        .filter(|_| id <= MAX_ENTITY_ID)
        .ok_or(LayerError::IdOutOfRange { layer, id })
}

pub type PointStore = Store<Point>;
pub type SegmentStore = Store<Segment>;

/// A drawing layer. Shapes are kept in z-order, the last one on top.
#[derive(Debug, Clone)]
pub struct Layer {
    kind: LayerKind,
    shapes: Vec<Shape>,
    segments: SegmentStore,
    points: PointStore,
    next_id: u64,
}

impl Layer {
    pub fn new(kind: LayerKind) -> Self {
        Self {
            kind,
            shapes: Vec::new(),
            segments: SegmentStore::new(kind),
            points: PointStore::new(kind),
            next_id: 1,
        }
    }

    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn segments(&self) -> &SegmentStore {
        &self.segments
    }

    pub fn points(&self) -> &PointStore {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut PointStore {
        &mut self.points
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Adds a shape on top, assigning it a fresh id.
    pub fn add_shape(&mut self, mut shape: Shape) -> ShapeId {
        shape.id = self.allocate_id();
        let id = shape.id;
        self.shapes.push(shape);
        id
    }

    /// Adds a shape on top, keeping its id. Used when restoring saved data.
    pub fn insert_shape(&mut self, shape: Shape) -> Result<(), LayerError> {
        self.next_id = self.next_id.max(id_after(self.kind, shape.id)?);
        self.shapes.retain(|s| s.id != shape.id);
        self.shapes.push(shape);
        Ok(())
    }

    /// Creates a closed polygon from `vertices`, with one point per vertex
    /// and one segment per edge, all owned by the new shape.
    pub fn add_polygon(
        &mut self,
        name: impl Into<String>,
        family_name: impl Into<String>,
        color: impl Into<Color>,
        vertices: &[Coordinates],
    ) -> Result<ShapeId, ShapeError> {
        let name = name.into();
        if vertices.len() < 2 {
            return Err(ShapeError::NoGeometry { name });
        }

        let shape_id = self.allocate_id();
        let point_ids: Vec<PointId> = vertices
            .iter()
            .map(|v| {
                let mut point = Point::new(self.allocate_id(), *v);
                point.shape_id = Some(shape_id);
                let id = point.id;
                self.points.insert(point);
                id
            })
            .collect();
        let segment_ids: Vec<SegmentId> = (0..point_ids.len())
            .map(|i| {
                let to = point_ids[(i + 1) % point_ids.len()];
                let mut segment = Segment::new(self.allocate_id(), point_ids[i], to);
                segment.shape_id = Some(shape_id);
                let id = segment.id;
                self.segments.insert(segment);
                id
            })
            .collect();

        let mut shape = Shape::from_segments(
            name,
            family_name,
            color,
            vertices[0],
            segment_ids,
            point_ids,
        )?;
        shape.id = shape_id;
        self.shapes.push(shape);
        Ok(shape_id)
    }

    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    pub fn shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id == id)
    }

    pub fn require_shape(&self, id: ShapeId) -> Result<&Shape, LayerError> {
        self.shape(id).ok_or(LayerError::ShapeNotFound {
            layer: self.kind,
            id,
        })
    }

    /// A shape and the point store it mutates, borrowed together.
    pub fn shape_and_points(&mut self, id: ShapeId) -> Result<(&mut Shape, &mut PointStore), LayerError> {
        let kind = self.kind;
        let shape = self
            .shapes
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(LayerError::ShapeNotFound { layer: kind, id })?;
        Ok((shape, &mut self.points))
    }

    /// Removes a shape together with the segments and points it owns.
    pub fn remove_shape(&mut self, id: ShapeId) -> Option<Shape> {
        let index = self.shapes.iter().position(|s| s.id == id)?;
        let shape = self.shapes.remove(index);
        for segment_id in &shape.segment_ids {
            self.segments.remove(*segment_id);
        }
        for point_id in &shape.point_ids {
            self.points.remove(*point_id);
        }
        Some(shape)
    }

    /// Ids of the shapes containing `point`, in z-order: the topmost hit is last.
    pub fn shapes_on_point(&self, point: Coordinates) -> Result<Vec<ShapeId>, LayerError> {
        let mut hits = Vec::new();
        for shape in &self.shapes {
            if shape.contains_point(point, self)? {
                hits.push(shape.id);
            }
        }
        Ok(hits)
    }

    /// Multiplies every position in the layer by `ratio`, used when a saved
    /// workspace was drawn on a canvas of another size.
    pub fn rescale(&mut self, ratio: f64) -> Result<(), LayerError> {
        for shape in &mut self.shapes {
            shape.scale(&mut self.points, ratio)?;
        }
        for point in self.points.iter_mut().filter(|p| p.shape_id.is_none()) {
            point.coordinates = point.coordinates * ratio;
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.shapes.clear();
        self.segments.clear();
        self.points.clear();
        self.next_id = 1;
    }

    pub fn to_data(&self) -> Result<LayerData, LayerError> {
        Ok(LayerData {
            shapes: self
                .shapes
                .iter()
                .map(|s| s.save_data(self))
                .collect::<Result<_, _>>()?,
            segments: self.segments.iter().cloned().collect(),
            points: self.points.iter().cloned().collect(),
        })
    }

    /// Rebuilds a layer from saved data, checking that every id a shape or
    /// segment refers to resolves.
    pub fn from_data(kind: LayerKind, data: LayerData) -> agtablette_core::Result<Self> {
        let mut layer = Layer::new(kind);
        for point in data.points {
            layer.next_id = layer.next_id.max(id_after(kind, point.id)?);
            layer.points.insert(point);
        }
        for segment in data.segments {
            for vertex in segment.vertex_ids {
                layer.points.require(vertex)?;
            }
            layer.next_id = layer.next_id.max(id_after(kind, segment.id)?);
            layer.segments.insert(segment);
        }
        for shape_data in data.shapes {
            let shape = Shape::try_from(shape_data)?;
            for segment_id in &shape.segment_ids {
                layer.segments.require(*segment_id)?;
            }
            for point_id in &shape.point_ids {
                layer.points.require(*point_id)?;
            }
            layer.insert_shape(shape)?;
        }
        Ok(layer)
    }
}

/// Persisted form of a layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerData {
    #[serde(default)]
    pub shapes: Vec<ShapeData>,
    #[serde(default)]
    pub segments: Vec<Segment>,
    #[serde(default)]
    pub points: Vec<Point>,
}
