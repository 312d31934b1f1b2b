//! # Undo history
//!
//! A stack of `(action, data)` steps. Undoing hands the data back to the
//! tool state that recorded it, together with a [`Completion`] the state
//! must fire once the workspace is restored. Some restorations are
//! animated, so completion may arrive several ticks later.

use std::sync::Arc;

use agtablette_core::{AppEvent, EventBus, HistoryEvent};
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

use crate::states::{ToolKind, ToolSet};
use crate::workspace::Workspace;

/// One undoable action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStep {
    pub action_name: ToolKind,
    pub data: serde_json::Value,
}

/// Completion signal of an undo. Consuming it is the only way to fire it,
/// so it fires at most once. Dropping it unfired also ends the undo.
#[derive(Debug)]
pub struct Completion {
    sender: oneshot::Sender<()>,
}

impl Completion {
    pub fn channel() -> (Completion, oneshot::Receiver<()>) {
        let (sender, receiver) = oneshot::channel();
        (Completion { sender }, receiver)
    }

    pub fn complete(self) {
        // The history may have been cleared meanwhile.
        let _ = self.sender.send(());
    }
}

#[derive(Debug)]
struct RunningCancel {
    action: ToolKind,
    receiver: oneshot::Receiver<()>,
}

pub struct AppHistory {
    steps: Vec<HistoryStep>,
    running: Option<RunningCancel>,
    events: Arc<EventBus>,
}

impl AppHistory {
    pub fn new(events: Arc<EventBus>) -> Self {
        Self {
            steps: Vec::new(),
            running: None,
            events,
        }
    }

    fn emit(&self, event: HistoryEvent) {
        self.events.publish(AppEvent::History(event));
    }

    pub fn steps(&self) -> &[HistoryStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// True while an undo waits for its completion.
    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }

    /// Records a step. Steps recorded while an undo runs are dropped.
    pub fn add_step(&mut self, action: ToolKind, data: serde_json::Value) -> bool {
        if let Some(running) = &self.running {
            tracing::warn!(
                "Dropping history step '{}' recorded while undoing '{}'",
                action,
                running.action
            );
            self.emit(HistoryEvent::StepDropped {
                action: action.to_string(),
            });
            return false;
        }
        tracing::debug!("History step added: {}", action);
        self.steps.push(HistoryStep {
            action_name: action,
            data,
        });
        self.emit(HistoryEvent::StepAdded {
            action: action.to_string(),
        });
        true
    }

    /// Undoes the most recent step.
    ///
    /// Does nothing when the history is empty, when an undo is already
    /// running or while a tool animates. Returns whether an undo started;
    /// synchronous undos are already finished on return.
    pub fn cancel_last_step(&mut self, tools: &mut ToolSet, workspace: &mut Workspace) -> bool {
        if self.running.is_some() || tools.is_animating() {
            tracing::debug!("Undo ignored: another action is in progress");
            return false;
        }
        let Some(step) = self.steps.pop() else {
            return false;
        };

        let (completion, receiver) = Completion::channel();
        self.running = Some(RunningCancel {
            action: step.action_name,
            receiver,
        });
        self.emit(HistoryEvent::CancelStarted {
            action: step.action_name.to_string(),
        });
        tracing::info!("Undoing {}", step.action_name);
        tools.cancel_action(step.action_name, &step.data, workspace, completion);
        self.poll_completion();
        true
    }

    /// Checks whether the running undo has completed. Returns true exactly
    /// once per undo, when it finishes.
    pub fn poll_completion(&mut self) -> bool {
        let Some(running) = self.running.as_mut() else {
            return false;
        };
        match running.receiver.try_recv() {
            Ok(()) => {}
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => {
                tracing::warn!("Undo of '{}' dropped its completion", running.action);
            }
        }
        self.finish();
        true
    }

    /// Waits for the running undo, if any, to complete.
    pub async fn wait(&mut self) {
        if let Some(running) = self.running.as_mut() {
            if (&mut running.receiver).await.is_err() {
                tracing::warn!("Undo of '{}' dropped its completion", running.action);
            }
            self.finish();
        }
    }

    fn finish(&mut self) {
        self.running = None;
        self.emit(HistoryEvent::CancelFinished);
    }

    /// Forgets every step and any running undo.
    pub fn clear(&mut self) {
        self.steps.clear();
        self.running = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completion_fires_once() {
        let (completion, mut receiver) = Completion::channel();
        completion.complete();
        assert_eq!(receiver.try_recv(), Ok(()));
        assert!(receiver.try_recv().is_err());
    }

    #[test]
    fn test_add_step_records_in_order() {
        let mut history = AppHistory::new(Arc::new(EventBus::new()));
        history.add_step(ToolKind::Create, json!({"shapeId": 1}));
        history.add_step(ToolKind::Move, json!({}));
        assert_eq!(history.len(), 2);
        assert_eq!(history.steps()[1].action_name, ToolKind::Move);
    }

    #[test]
    fn test_step_serializes_with_action_name() {
        let step = HistoryStep {
            action_name: ToolKind::MovePlane,
            data: json!({"originalOffset": {"x": 0.0, "y": 0.0}}),
        };
        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(value["actionName"], "move_plane");
    }
}
