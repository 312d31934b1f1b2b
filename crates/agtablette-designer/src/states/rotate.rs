//! Rotates a shape's group around the shape's center by dragging.

use agtablette_core::ShapeId;
use serde::{Deserialize, Serialize};

use super::{decode, encode, pick, ToolContext, ToolKind, ToolState};
use crate::canvas::{CanvasView, Highlight, Selection};
use crate::history::{AppHistory, Completion};
use crate::model::{Coordinates, Shape};
use crate::workspace::Workspace;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RotateData {
    shape_ids: Vec<ShapeId>,
    /// Radians.
    angle: f64,
    center: Coordinates,
}

#[derive(Debug, Clone)]
struct Drag {
    members: Vec<ShapeId>,
    center: Coordinates,
    start_angle: f64,
}

#[derive(Debug, Default)]
pub struct RotateState {
    current: Option<Drag>,
    recorded: Option<RotateData>,
}

impl ToolState for RotateState {
    fn kind(&self) -> ToolKind {
        ToolKind::Rotate
    }

    fn reset(&mut self) {
        self.current = None;
        self.recorded = None;
    }

    fn mousedown(&mut self, at: Coordinates, selection: Selection, ctx: &mut ToolContext<'_>) {
        let Some(id) = pick(at, selection, ctx.workspace) else {
            return;
        };
        let Some(shape) = ctx.workspace.shape(id) else {
            return;
        };
        let center = shape.center();
        self.current = Some(Drag {
            members: ctx.workspace.shape_group_members(id),
            center,
            start_angle: center.angle_with(at),
        });
    }

    fn mouseup(&mut self, at: Coordinates, _selection: Selection, ctx: &mut ToolContext<'_>) {
        let Some(drag) = self.current.take() else {
            return;
        };
        let angle = drag.center.angle_with(at) - drag.start_angle;
        if angle.abs() < 1e-9 {
            return;
        }
        match ctx.workspace.rotate_shapes(&drag.members, angle, drag.center) {
            Ok(()) => {
                self.recorded = Some(RotateData {
                    shape_ids: drag.members,
                    angle,
                    center: drag.center,
                });
                self.make_history(ctx.history);
            }
            Err(e) => tracing::error!("Rotation failed: {}", e),
        }
        ctx.view.refresh(Some(at));
    }

    fn draw(&self, view: &mut dyn CanvasView, _workspace: &Workspace, mouse: Coordinates) {
        if let Some(drag) = &self.current {
            view.draw_line(drag.center, mouse, None);
        }
    }

    fn make_history(&mut self, history: &mut AppHistory) {
        if let Some(data) = self.recorded.take() {
            history.add_step(self.kind(), encode(self.kind(), &data));
        }
    }

    fn cancel_action(&mut self, data: &serde_json::Value, workspace: &mut Workspace, completion: Completion) {
        match decode::<RotateData>(self.kind(), data) {
            Ok(data) => {
                if let Err(e) = workspace.rotate_shapes(&data.shape_ids, -data.angle, data.center) {
                    tracing::error!("Cannot undo rotation: {}", e);
                }
            }
            Err(e) => tracing::error!("{}", e),
        }
        completion.complete();
    }

    fn elements_to_highlight(&self, shape: &Shape, workspace: &Workspace) -> Highlight {
        Highlight::shapes(workspace.shape_group_members(shape.id))
    }
}
