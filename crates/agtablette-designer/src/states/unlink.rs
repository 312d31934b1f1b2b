//! Dissolves the user group of the clicked shape.

use agtablette_core::ShapeId;
use serde::{Deserialize, Serialize};

use super::{decode, draw_group_labels, encode, pick, ToolContext, ToolKind, ToolState};
use crate::canvas::{CanvasView, Highlight, Selection};
use crate::history::{AppHistory, Completion};
use crate::model::{Coordinates, Shape};
use crate::workspace::Workspace;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UnlinkData {
    shape_ids: Vec<ShapeId>,
}

#[derive(Debug, Default)]
pub struct UnlinkerState {
    recorded: Option<UnlinkData>,
}

impl ToolState for UnlinkerState {
    fn kind(&self) -> ToolKind {
        ToolKind::Unlink
    }

    fn reset(&mut self) {
        self.recorded = None;
    }

    fn click(&mut self, at: Coordinates, selection: Selection, ctx: &mut ToolContext<'_>) {
        let Some(id) = pick(at, selection, ctx.workspace) else {
            return;
        };
        let Some(index) = ctx.workspace.get_shape_group_index(id) else {
            return;
        };
        let Some(members) = ctx.workspace.remove_user_group(index) else {
            return;
        };
        tracing::debug!("Unlinked group of {} shape(s)", members.len());
        self.recorded = Some(UnlinkData { shape_ids: members });
        self.make_history(ctx.history);
        ctx.view.refresh(Some(at));
    }

    fn draw(&self, view: &mut dyn CanvasView, workspace: &Workspace, _mouse: Coordinates) {
        draw_group_labels(view, workspace);
    }

    fn make_history(&mut self, history: &mut AppHistory) {
        if let Some(data) = self.recorded.take() {
            history.add_step(self.kind(), encode(self.kind(), &data));
        }
    }

    /// Re-creates the group. If a member no longer exists the group is not
    /// restored, though the undo still completes and the step stays consumed.
    fn cancel_action(&mut self, data: &serde_json::Value, workspace: &mut Workspace, completion: Completion) {
        match decode::<UnlinkData>(self.kind(), data) {
            Ok(data) => {
                if let Some(missing) = data.shape_ids.iter().find(|id| workspace.shape(**id).is_none()) {
                    tracing::error!("Cannot restore group: shape {} not found", missing);
                } else {
                    workspace.add_user_group(data.shape_ids);
                }
            }
            Err(e) => tracing::error!("{}", e),
        }
        completion.complete();
    }

    fn elements_to_highlight(&self, shape: &Shape, workspace: &Workspace) -> Highlight {
        match workspace.get_shape_group(shape.id) {
            Some(group) => Highlight::shapes(group.to_vec()),
            None => Highlight::default(),
        }
    }
}
