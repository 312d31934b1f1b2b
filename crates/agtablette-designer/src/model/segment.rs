//! Edges between two layer-owned points.

use agtablette_core::{LayerError, LayerKind, PointId, SegmentId, ShapeId};
use serde::{Deserialize, Serialize};

use super::Coordinates;
use crate::layer::{Entity, PointStore};

/// An edge connecting exactly two points, resolved by id in the owning layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub id: SegmentId,
    pub vertex_ids: [PointId; 2],
    #[serde(default)]
    pub shape_id: Option<ShapeId>,
}

impl Segment {
    pub fn new(id: SegmentId, from: PointId, to: PointId) -> Self {
        Self {
            id,
            vertex_ids: [from, to],
            shape_id: None,
        }
    }

    /// Resolves both vertices. A missing point means the layer is corrupted.
    pub fn vertices(&self, points: &PointStore) -> Result<[Coordinates; 2], LayerError> {
        let a = points.require(self.vertex_ids[0])?.coordinates;
        let b = points.require(self.vertex_ids[1])?.coordinates;
        Ok([a, b])
    }

    pub fn length(&self, points: &PointStore) -> Result<f64, LayerError> {
        let [a, b] = self.vertices(points)?;
        Ok(a.dist(b))
    }

    pub fn middle(&self, points: &PointStore) -> Result<Coordinates, LayerError> {
        let [a, b] = self.vertices(points)?;
        Ok(a.middle_with(b))
    }

    /// Angle of the segment from its first to its second vertex.
    pub fn direction_angle(&self, points: &PointStore) -> Result<f64, LayerError> {
        let [a, b] = self.vertices(points)?;
        Ok(a.angle_with(b))
    }
}

impl Entity for Segment {
    fn id(&self) -> u64 {
        self.id
    }

    fn missing(layer: LayerKind, id: u64) -> LayerError {
        LayerError::SegmentNotFound { layer, id }
    }
}
