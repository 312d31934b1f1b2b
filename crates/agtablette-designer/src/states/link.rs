//! Builds user groups: the first click picks a shape, each following click
//! joins another shape (and its group) to it.

use agtablette_core::ShapeId;
use serde::{Deserialize, Serialize};

use super::{decode, draw_group_labels, encode, pick, ToolContext, ToolKind, ToolState};
use crate::canvas::{CanvasView, Highlight, Selection};
use crate::history::{AppHistory, Completion};
use crate::model::{Coordinates, Shape};
use crate::workspace::Workspace;

/// Every user group as it was before the link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LinkData {
    groups: Vec<Vec<ShapeId>>,
}

#[derive(Debug, Default)]
pub struct LinkerState {
    first_shape: Option<ShapeId>,
    recorded: Option<LinkData>,
}

impl LinkerState {
    pub fn first_shape(&self) -> Option<ShapeId> {
        self.first_shape
    }
}

impl ToolState for LinkerState {
    fn kind(&self) -> ToolKind {
        ToolKind::Link
    }

    fn reset(&mut self) {
        self.first_shape = None;
        self.recorded = None;
    }

    fn click(&mut self, at: Coordinates, selection: Selection, ctx: &mut ToolContext<'_>) {
        let Some(id) = pick(at, selection, ctx.workspace) else {
            return;
        };
        let first = match self.first_shape {
            None => {
                self.first_shape = Some(id);
                return;
            }
            Some(first) if first == id => return,
            Some(first) => first,
        };

        let workspace = &mut *ctx.workspace;
        let before = workspace.user_shape_groups().to_vec();
        let linked = match (
            workspace.get_shape_group_index(first),
            workspace.get_shape_group_index(id),
        ) {
            (None, None) => workspace.add_user_group(vec![first, id]),
            (Some(group), None) => workspace.add_to_user_group(group, id),
            (None, Some(group)) => workspace.add_to_user_group(group, first),
            (Some(a), Some(b)) if a == b => return,
            (Some(a), Some(b)) => workspace.merge_user_groups(a, b),
        };
        if linked.is_none() {
            tracing::warn!("Could not link shapes {} and {}", first, id);
            return;
        }
        self.recorded = Some(LinkData { groups: before });
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

    fn cancel_action(&mut self, data: &serde_json::Value, workspace: &mut Workspace, completion: Completion) {
        match decode::<LinkData>(self.kind(), data) {
            Ok(data) => workspace.set_user_groups(data.groups),
            Err(e) => tracing::error!("{}", e),
        }
        completion.complete();
    }

    fn elements_to_highlight(&self, shape: &Shape, workspace: &Workspace) -> Highlight {
        Highlight::shapes(workspace.shape_group_members(shape.id))
    }
}
