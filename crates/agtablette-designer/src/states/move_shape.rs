//! Moves a shape, with its group, in two clicks: one to grab, one to drop.

use agtablette_core::ShapeId;
use serde::{Deserialize, Serialize};

use super::{decode, encode, pick, ToolContext, ToolKind, ToolParams, ToolState};
use crate::canvas::{CanvasView, Highlight, Selection};
use crate::history::{AppHistory, Completion};
use crate::model::{Coordinates, Shape};
use crate::workspace::Workspace;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Origin {
    shape_id: ShapeId,
    position: Coordinates,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveData {
    origins: Vec<Origin>,
}

#[derive(Debug, Clone)]
struct Grab {
    shape: ShapeId,
    members: Vec<ShapeId>,
    /// Pointer position relative to the grabbed shape's anchor.
    grab_offset: Coordinates,
    origins: Vec<Origin>,
}

#[derive(Debug, Default)]
pub struct MoveState {
    current: Option<Grab>,
    recorded: Option<MoveData>,
}

impl MoveState {
    /// The shape being moved, if any.
    pub fn moving_shape(&self) -> Option<ShapeId> {
        self.current.as_ref().map(|g| g.shape)
    }

    fn begin(&mut self, id: ShapeId, at: Option<Coordinates>, workspace: &Workspace) {
        let Some(shape) = workspace.shape(id) else {
            tracing::warn!("Cannot move shape {}: not in the workspace", id);
            return;
        };
        let members = workspace.shape_group_members(id);
        let origins = members
            .iter()
            .filter_map(|m| workspace.shape(*m))
            .map(|s| Origin {
                shape_id: s.id,
                position: s.position(),
            })
            .collect();
        self.current = Some(Grab {
            shape: id,
            grab_offset: at.map_or(Coordinates::ORIGIN, |at| at - shape.position()),
            members,
            origins,
        });
    }

    /// Drops the moving shape so the pointer keeps its grab offset.
    pub fn end(&mut self, at: Coordinates, ctx: &mut ToolContext<'_>) {
        let Some(grab) = self.current.take() else {
            return;
        };
        let Some(shape) = ctx.workspace.shape(grab.shape) else {
            tracing::warn!("Moving shape {} disappeared", grab.shape);
            return;
        };
        let delta = at - grab.grab_offset - shape.position();
        match ctx.workspace.translate_shapes(&grab.members, delta) {
            Ok(()) => {
                self.recorded = Some(MoveData {
                    origins: grab.origins,
                });
                self.make_history(ctx.history);
            }
            Err(e) => tracing::error!("Move failed: {}", e),
        }
        ctx.view.refresh(Some(at));
    }
}

impl ToolState for MoveState {
    fn kind(&self) -> ToolKind {
        ToolKind::Move
    }

    fn start(&mut self, params: ToolParams, ctx: &mut ToolContext<'_>) {
        if let ToolParams::Shape(id) = params {
            self.begin(id, None, ctx.workspace);
        }
    }

    fn reset(&mut self) {
        self.current = None;
        self.recorded = None;
    }

    fn click(&mut self, at: Coordinates, selection: Selection, ctx: &mut ToolContext<'_>) {
        if self.current.is_some() {
            self.end(at, ctx);
            return;
        }
        if let Some(id) = pick(at, selection, ctx.workspace) {
            self.begin(id, Some(at), ctx.workspace);
        }
    }

    /// Ghost outline of the moving group under the pointer.
    fn draw(&self, view: &mut dyn CanvasView, workspace: &Workspace, mouse: Coordinates) {
        let Some(grab) = &self.current else {
            return;
        };
        let Some(anchor) = workspace.shape(grab.shape).map(Shape::position) else {
            return;
        };
        let delta = mouse - grab.grab_offset - anchor;
        for id in &grab.members {
            let Some(shape) = workspace.shape(*id) else {
                continue;
            };
            match shape.absolute_vertices(workspace.main()) {
                Ok(vertices) => {
                    for (i, v) in vertices.iter().enumerate() {
                        let next = vertices[(i + 1) % vertices.len()];
                        view.draw_line(*v + delta, next + delta, Some(shape.color.as_str()));
                    }
                }
                Err(e) => tracing::error!("Cannot draw shape {}: {}", id, e),
            }
        }
    }

    fn make_history(&mut self, history: &mut AppHistory) {
        if let Some(data) = self.recorded.take() {
            history.add_step(self.kind(), encode(self.kind(), &data));
        }
    }

    fn cancel_action(&mut self, data: &serde_json::Value, workspace: &mut Workspace, completion: Completion) {
        match decode::<MoveData>(self.kind(), data) {
            Ok(data) => {
                for origin in data.origins {
                    if let Err(e) = workspace.move_shape_to(origin.shape_id, origin.position) {
                        tracing::error!("Cannot restore position: {}", e);
                    }
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
