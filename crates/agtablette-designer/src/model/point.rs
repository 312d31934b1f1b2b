use agtablette_core::{LayerError, LayerKind, PointId, ShapeId};
use serde::{Deserialize, Serialize};

use super::Coordinates;
use crate::layer::Entity;

/// A layer-owned point. Segments and shapes refer to it by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Point {
    pub id: PointId,
    pub coordinates: Coordinates,
    #[serde(default)]
    pub shape_id: Option<ShapeId>,
}

impl Point {
    pub fn new(id: PointId, coordinates: Coordinates) -> Self {
        Self {
            id,
            coordinates,
            shape_id: None,
        }
    }
}

impl Entity for Point {
    fn id(&self) -> u64 {
        self.id
    }

    fn missing(layer: LayerKind, id: u64) -> LayerError {
        LayerError::PointNotFound { layer, id }
    }
}
