//! Pans the workspace by dragging.
//!
//! The pointer arrives in world coordinates, which themselves depend on the
//! offset being changed. Positions are compared in canvas space so the drag
//! stays consistent while the offset moves under it.

use serde::{Deserialize, Serialize};

use super::{decode, encode, ToolContext, ToolKind, ToolState};
use crate::canvas::Selection;
use crate::history::{AppHistory, Completion};
use crate::model::Coordinates;
use crate::workspace::Workspace;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovePlaneData {
    original_offset: Coordinates,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    anchor_canvas: Coordinates,
    original_offset: Coordinates,
}

#[derive(Debug, Default)]
pub struct MovePlaneState {
    current: Option<Drag>,
    recorded: Option<MovePlaneData>,
}

impl MovePlaneState {
    fn follow(drag: &Drag, at: Coordinates, workspace: &mut Workspace) {
        let pointer = at.to_canvas_coordinates(workspace.viewport());
        workspace.set_translate_offset(drag.original_offset + (pointer - drag.anchor_canvas));
    }
}

impl ToolState for MovePlaneState {
    fn kind(&self) -> ToolKind {
        ToolKind::MovePlane
    }

    fn reset(&mut self) {
        self.current = None;
        self.recorded = None;
    }

    fn mousedown(&mut self, at: Coordinates, _selection: Selection, ctx: &mut ToolContext<'_>) {
        self.current = Some(Drag {
            anchor_canvas: at.to_canvas_coordinates(ctx.workspace.viewport()),
            original_offset: ctx.workspace.translate_offset(),
        });
    }

    fn mousemove(&mut self, at: Coordinates, ctx: &mut ToolContext<'_>) {
        if let Some(drag) = &self.current {
            Self::follow(drag, at, ctx.workspace);
            ctx.view.refresh(Some(at));
        }
    }

    fn mouseup(&mut self, at: Coordinates, _selection: Selection, ctx: &mut ToolContext<'_>) {
        let Some(drag) = self.current.take() else {
            return;
        };
        Self::follow(&drag, at, ctx.workspace);
        if ctx.workspace.translate_offset() != drag.original_offset {
            self.recorded = Some(MovePlaneData {
                original_offset: drag.original_offset,
            });
            self.make_history(ctx.history);
        }
        ctx.view.refresh_background();
        ctx.view.refresh(Some(at));
    }

    fn make_history(&mut self, history: &mut AppHistory) {
        if let Some(data) = self.recorded.take() {
            history.add_step(self.kind(), encode(self.kind(), &data));
        }
    }

    fn cancel_action(&mut self, data: &serde_json::Value, workspace: &mut Workspace, completion: Completion) {
        match decode::<MovePlaneData>(self.kind(), data) {
            Ok(data) => workspace.set_translate_offset(data.original_offset),
            Err(e) => tracing::error!("{}", e),
        }
        completion.complete();
    }
}
