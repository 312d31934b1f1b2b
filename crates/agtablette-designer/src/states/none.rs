use super::{ToolKind, ToolState};
use crate::history::Completion;
use crate::workspace::Workspace;

/// Idle state: pointer events do nothing.
#[derive(Debug, Default)]
pub struct NoState;

impl ToolState for NoState {
    fn kind(&self) -> ToolKind {
        ToolKind::None
    }

    fn reset(&mut self) {}

    fn cancel_action(&mut self, _data: &serde_json::Value, _workspace: &mut Workspace, completion: Completion) {
        tracing::warn!("Nothing to undo for {}", self.kind());
        completion.complete();
    }
}
