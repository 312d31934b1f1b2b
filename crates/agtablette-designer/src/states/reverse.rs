//! Mirrors a shape's group across a symmetry axis, with an animation.
//!
//! The axis passes through the clicked shape's center. Its orientation
//! depends on where the pointer is relative to that center. The workspace
//! only changes when the animation ends; until then the view draws the
//! shapes part way through the reflection.

use std::time::Duration;

use agtablette_core::ShapeId;
use serde::{Deserialize, Serialize};

use super::{decode, encode, pick, ToolContext, ToolKind, ToolState};
use crate::animation::AnimationDriver;
use crate::canvas::{CanvasView, Highlight, Selection};
use crate::history::{AppHistory, Completion};
use crate::model::{Coordinates, Shape, SymmetryAxis};
use crate::workspace::Workspace;

/// Half length of the axis preview.
const AXIS_PREVIEW_HALF_LENGTH: f64 = 100.0;
const AXIS_COLOR: &str = "#080";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReverseData {
    shape_ids: Vec<ShapeId>,
    axis: SymmetryAxis,
}

#[derive(Debug)]
struct Reversal {
    shape_ids: Vec<ShapeId>,
    axis: SymmetryAxis,
    /// Set when the reversal replays an undo.
    undo: Option<Completion>,
}

#[derive(Debug)]
pub struct ReverseState {
    driver: AnimationDriver,
    current: Option<Reversal>,
    recorded: Option<ReverseData>,
}

impl ReverseState {
    pub fn new(duration: Duration) -> Self {
        Self {
            driver: AnimationDriver::new(duration),
            current: None,
            recorded: None,
        }
    }

    fn begin(&mut self, reversal: Reversal) {
        tracing::debug!(
            "Reversing {} shape(s) across {:?} axis",
            reversal.shape_ids.len(),
            reversal.axis.kind
        );
        self.current = Some(reversal);
        self.driver.start();
    }

    fn finish(&mut self, reversal: Reversal, ctx: &mut ToolContext<'_>) {
        if let Err(e) = ctx.workspace.reflect_shapes(&reversal.shape_ids, &reversal.axis) {
            tracing::error!("Reversal failed: {}", e);
        }
        match reversal.undo {
            Some(completion) => completion.complete(),
            None => {
                self.recorded = Some(ReverseData {
                    shape_ids: reversal.shape_ids,
                    axis: reversal.axis,
                });
                self.make_history(ctx.history);
            }
        }
        ctx.view.refresh(None);
    }
}

impl ToolState for ReverseState {
    fn kind(&self) -> ToolKind {
        ToolKind::Reverse
    }

    fn reset(&mut self) {
        self.recorded = None;
    }

    /// Stops a running reversal without applying it. A pending undo is
    /// completed so the history does not wait forever.
    fn abort(&mut self) {
        self.driver.cancel();
        if let Some(Reversal {
            undo: Some(completion),
            ..
        }) = self.current.take()
        {
            completion.complete();
        }
        self.reset();
    }

    fn click(&mut self, at: Coordinates, selection: Selection, ctx: &mut ToolContext<'_>) {
        if self.is_animating() {
            return;
        }
        let Some(id) = pick(at, selection, ctx.workspace) else {
            return;
        };
        let Some(shape) = ctx.workspace.shape(id) else {
            return;
        };
        let axis = SymmetryAxis::for_click(shape.center(), at);
        self.begin(Reversal {
            shape_ids: ctx.workspace.shape_group_members(id),
            axis,
            undo: None,
        });
    }

    fn tick(&mut self, ctx: &mut ToolContext<'_>) {
        let Some(frame) = self.driver.tick(ctx.now) else {
            return;
        };
        let Some(reversal) = &self.current else {
            return;
        };
        if !frame.finished {
            for id in &reversal.shape_ids {
                if let Some(shape) = ctx.workspace.shape(*id) {
                    ctx.view
                        .draw_reversing_shape(shape, &reversal.axis, frame.progress);
                }
            }
            return;
        }
        if let Some(reversal) = self.current.take() {
            self.finish(reversal, ctx);
        }
    }

    fn is_animating(&self) -> bool {
        self.current.is_some()
    }

    /// Previews the axis a click at the pointer would use.
    fn draw(&self, view: &mut dyn CanvasView, workspace: &Workspace, mouse: Coordinates) {
        if self.is_animating() {
            return;
        }
        let Some(shape) = workspace
            .select_shape_at(mouse)
            .and_then(|id| workspace.shape(id))
        else {
            return;
        };
        let axis = SymmetryAxis::for_click(shape.center(), mouse);
        let (from, to) = axis.endpoints(AXIS_PREVIEW_HALF_LENGTH);
        view.draw_line(from, to, Some(AXIS_COLOR));
    }

    fn make_history(&mut self, history: &mut AppHistory) {
        if let Some(data) = self.recorded.take() {
            history.add_step(self.kind(), encode(self.kind(), &data));
        }
    }

    /// Replays the same reflection, which is its own inverse. Completes
    /// when the animation ends.
    fn cancel_action(&mut self, data: &serde_json::Value, _workspace: &mut Workspace, completion: Completion) {
        match decode::<ReverseData>(self.kind(), data) {
            Ok(data) => self.begin(Reversal {
                shape_ids: data.shape_ids,
                axis: data.axis,
                undo: Some(completion),
            }),
            Err(e) => {
                tracing::error!("{}", e);
                completion.complete();
            }
        }
    }

    fn elements_to_highlight(&self, shape: &Shape, workspace: &Workspace) -> Highlight {
        Highlight::shapes(workspace.shape_group_members(shape.id))
    }
}
