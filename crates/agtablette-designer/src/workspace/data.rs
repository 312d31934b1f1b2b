//! Persisted form of a workspace.

use agtablette_core::{Color, ShapeId};
use agtablette_settings::CanvasSize;
use serde::{Deserialize, Serialize};

use crate::layer::LayerData;
use crate::model::Coordinates;

/// Snapshot produced by [`Workspace::data`](super::Workspace::data) and
/// accepted by [`Workspace::init_from_object`](super::Workspace::init_from_object).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceData {
    pub objects: LayerData,
    pub canvas_size: CanvasSize,
    #[serde(default)]
    pub back_objects: LayerData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom_level: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate_offset: Option<Coordinates>,
    #[serde(default)]
    pub user_shape_groups: Vec<Vec<ShapeId>>,
    #[serde(default)]
    pub previous_selected_colors: Vec<Color>,
}

impl WorkspaceData {
    /// Factor applied to saved positions when loading onto a canvas of
    /// another size: the smaller of the width and height ratios.
    pub fn scale_ratio(&self, current: CanvasSize) -> f64 {
        if self.canvas_size == current
            || self.canvas_size.width <= 0.0
            || self.canvas_size.height <= 0.0
        {
            return 1.0;
        }
        (current.width / self.canvas_size.width).min(current.height / self.canvas_size.height)
    }
}
