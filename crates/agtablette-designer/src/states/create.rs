//! Instantiates the selected template at the click position.

use agtablette_core::ShapeId;
use serde::{Deserialize, Serialize};

use super::{decode, encode, ToolContext, ToolKind, ToolParams, ToolState};
use crate::canvas::Selection;
use crate::family::ShapeTemplate;
use crate::history::{AppHistory, Completion};
use crate::model::Coordinates;
use crate::workspace::Workspace;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateData {
    shape_id: ShapeId,
}

#[derive(Debug, Default)]
pub struct CreateState {
    family_name: String,
    template: Option<ShapeTemplate>,
    created: Option<ShapeId>,
}

impl CreateState {
    pub fn template(&self) -> Option<&ShapeTemplate> {
        self.template.as_ref()
    }
}

impl ToolState for CreateState {
    fn kind(&self) -> ToolKind {
        ToolKind::Create
    }

    fn start(&mut self, params: ToolParams, _ctx: &mut ToolContext<'_>) {
        match params {
            ToolParams::Template {
                family_name,
                template,
            } => {
                self.family_name = family_name;
                self.template = Some(template);
            }
            other => tracing::warn!("Create tool started without a template: {:?}", other),
        }
    }

    /// The selected template stays selected across clicks.
    fn reset(&mut self) {
        self.created = None;
    }

    fn abort(&mut self) {
        self.reset();
        self.template = None;
        self.family_name.clear();
    }

    fn click(&mut self, at: Coordinates, _selection: Selection, ctx: &mut ToolContext<'_>) {
        let Some(template) = &self.template else {
            return;
        };
        match template.instantiate(&self.family_name, at) {
            Ok(shape) => {
                let id = ctx.workspace.add_shape(shape);
                tracing::debug!("Created '{}' as shape {}", template.name, id);
                self.created = Some(id);
                self.make_history(ctx.history);
                self.reset();
                ctx.view.refresh(Some(at));
            }
            Err(e) => tracing::warn!("Cannot create shape: {}", e),
        }
    }

    fn make_history(&mut self, history: &mut AppHistory) {
        if let Some(shape_id) = self.created {
            history.add_step(self.kind(), encode(self.kind(), &CreateData { shape_id }));
        }
    }

    fn cancel_action(&mut self, data: &serde_json::Value, workspace: &mut Workspace, completion: Completion) {
        match decode::<CreateData>(self.kind(), data) {
            Ok(data) => {
                if workspace.remove_shape(data.shape_id).is_none() {
                    tracing::warn!("Created shape {} is already gone", data.shape_id);
                }
            }
            Err(e) => tracing::error!("{}", e),
        }
        completion.complete();
    }
}
