//! Paints the clicked shape, and its user group, with the selected color.

use agtablette_core::{Color, ShapeId};
use serde::{Deserialize, Serialize};

use super::{decode, encode, pick, ToolContext, ToolKind, ToolParams, ToolState};
use crate::canvas::Selection;
use crate::history::{AppHistory, Completion};
use crate::model::Coordinates;
use crate::workspace::Workspace;

const DEFAULT_COLOR: &str = "#000";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OldColor {
    shape_id: ShapeId,
    old_color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BackgroundColorData {
    shapes: Vec<OldColor>,
}

#[derive(Debug)]
pub struct BackgroundColorState {
    selected_color: Color,
    recorded: Option<BackgroundColorData>,
}

impl Default for BackgroundColorState {
    fn default() -> Self {
        Self {
            selected_color: DEFAULT_COLOR.to_string(),
            recorded: None,
        }
    }
}

impl BackgroundColorState {
    pub fn selected_color(&self) -> &str {
        &self.selected_color
    }
}

impl ToolState for BackgroundColorState {
    fn kind(&self) -> ToolKind {
        ToolKind::BackgroundColor
    }

    fn start(&mut self, params: ToolParams, _ctx: &mut ToolContext<'_>) {
        if let ToolParams::Color(color) = params {
            self.selected_color = color;
        }
    }

    fn reset(&mut self) {
        self.recorded = None;
    }

    fn click(&mut self, at: Coordinates, selection: Selection, ctx: &mut ToolContext<'_>) {
        let Some(id) = pick(at, selection, ctx.workspace) else {
            return;
        };
        let members = match ctx.workspace.get_shape_group(id) {
            Some(group) => group.to_vec(),
            None => vec![id],
        };
        let mut old = Vec::with_capacity(members.len());
        for member in members {
            let Some(shape) = ctx.workspace.shape(member) else {
                continue;
            };
            old.push(OldColor {
                shape_id: member,
                old_color: shape.color.clone(),
            });
            if let Err(e) = ctx
                .workspace
                .set_shape_color(member, self.selected_color.clone())
            {
                tracing::error!("{}", e);
            }
        }
        ctx.workspace.push_selected_color(self.selected_color.clone());
        self.recorded = Some(BackgroundColorData { shapes: old });
        self.make_history(ctx.history);
        ctx.view.refresh(Some(at));
    }

    fn make_history(&mut self, history: &mut AppHistory) {
        if let Some(data) = self.recorded.take() {
            history.add_step(self.kind(), encode(self.kind(), &data));
        }
    }

    fn cancel_action(&mut self, data: &serde_json::Value, workspace: &mut Workspace, completion: Completion) {
        match decode::<BackgroundColorData>(self.kind(), data) {
            Ok(data) => {
                for entry in data.shapes {
                    if let Err(e) = workspace.set_shape_color(entry.shape_id, entry.old_color) {
                        tracing::error!("Cannot restore color: {}", e);
                    }
                }
            }
            Err(e) => tracing::error!("{}", e),
        }
        completion.complete();
    }
}
