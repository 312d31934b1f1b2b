//! Event type definitions for the event bus.
//!
//! Events are grouped by the component that emits them. They are
//! cloneable and serializable so they can be logged or replayed.

use serde::{Deserialize, Serialize};

use crate::types::LayerKind;

/// Root event enum for all application events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Workspace content, zoom and pan
    Workspace(WorkspaceEvent),
    /// Undo history
    History(HistoryEvent),
    /// Tool state machine
    Tool(ToolEvent),
}

impl AppEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            AppEvent::Workspace(_) => EventCategory::Workspace,
            AppEvent::History(_) => EventCategory::History,
            AppEvent::Tool(_) => EventCategory::Tool,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            AppEvent::Workspace(e) => e.description(),
            AppEvent::History(e) => e.description(),
            AppEvent::Tool(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Workspace events.
    Workspace,
    /// History events.
    History,
    /// Tool state events.
    Tool,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Workspace => write!(f, "Workspace"),
            EventCategory::History => write!(f, "History"),
            EventCategory::Tool => write!(f, "Tool"),
        }
    }
}

/// Workspace-related events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkspaceEvent {
    /// Zoom level changed (already clamped).
    ZoomChanged {
        /// The stored zoom level.
        zoom: f64,
    },
    /// Pan offset changed.
    OffsetChanged {
        /// Horizontal offset in canvas units.
        x: f64,
        /// Vertical offset in canvas units.
        y: f64,
    },
    /// Main and background content finished loading.
    CanvasReady,
    /// The workspace was emptied.
    Reset,
    /// Layers need to be redrawn.
    Refresh {
        /// Layers to redraw.
        layers: Vec<LayerKind>,
    },
}

impl WorkspaceEvent {
    fn description(&self) -> String {
        match self {
            WorkspaceEvent::ZoomChanged { zoom } => format!("Zoom set to {:.2}", zoom),
            WorkspaceEvent::OffsetChanged { x, y } => format!("Offset set to ({:.1}, {:.1})", x, y),
            WorkspaceEvent::CanvasReady => "Canvas ready".to_string(),
            WorkspaceEvent::Reset => "Workspace reset".to_string(),
            WorkspaceEvent::Refresh { layers } => format!("Refresh {} layer(s)", layers.len()),
        }
    }
}

/// History-related events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HistoryEvent {
    /// A step was recorded.
    StepAdded {
        /// The tool that recorded it.
        action: String,
    },
    /// A step was dropped because an undo was running.
    StepDropped {
        /// The tool that tried to record it.
        action: String,
    },
    /// An undo started.
    CancelStarted {
        /// The action being undone.
        action: String,
    },
    /// The running undo completed.
    CancelFinished,
}

impl HistoryEvent {
    fn description(&self) -> String {
        match self {
            HistoryEvent::StepAdded { action } => format!("History step added: {}", action),
            HistoryEvent::StepDropped { action } => format!("History step dropped: {}", action),
            HistoryEvent::CancelStarted { action } => format!("Undo started: {}", action),
            HistoryEvent::CancelFinished => "Undo finished".to_string(),
        }
    }
}

/// Tool state machine events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ToolEvent {
    /// The active tool changed.
    StateChanged {
        /// Name of the new tool.
        name: String,
    },
}

impl ToolEvent {
    fn description(&self) -> String {
        match self {
            ToolEvent::StateChanged { name } => format!("Tool changed to {}", name),
        }
    }
}
