//! Tool states.
//!
//! One state per interaction mode. The active state receives pointer
//! events, mutates the workspace, and records an inverse step in the
//! history. Undo hands that step back to the state that recorded it
//! through [`ToolState::cancel_action`], which restores the workspace from
//! the recorded data alone.

mod background_color;
mod create;
mod link;
mod move_plane;
mod move_shape;
mod none;
mod reverse;
mod rotate;
mod unlink;

pub use background_color::BackgroundColorState;
pub use create::CreateState;
pub use link::LinkerState;
pub use move_plane::MovePlaneState;
pub use move_shape::MoveState;
pub use none::NoState;
pub use reverse::ReverseState;
pub use rotate::RotateState;
pub use unlink::UnlinkerState;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use agtablette_core::{Color, HistoryError, ShapeId};
use agtablette_settings::ToolSettings;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::canvas::{CanvasView, Highlight, Selection};
use crate::family::ShapeTemplate;
use crate::history::{AppHistory, Completion};
use crate::model::{Coordinates, Shape};
use crate::workspace::Workspace;

/// Name of a tool state, as recorded in history steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolKind {
    #[serde(rename = "no_state")]
    None,
    #[serde(rename = "create_shape")]
    Create,
    #[serde(rename = "move_shape")]
    Move,
    #[serde(rename = "rotate_shape")]
    Rotate,
    #[serde(rename = "reverse_shape")]
    Reverse,
    #[serde(rename = "unlink_shapes")]
    Unlink,
    #[serde(rename = "link_shapes")]
    Link,
    #[serde(rename = "background_color")]
    BackgroundColor,
    #[serde(rename = "move_plane")]
    MovePlane,
}

impl ToolKind {
    pub const ALL: [ToolKind; 9] = [
        ToolKind::None,
        ToolKind::Create,
        ToolKind::Move,
        ToolKind::Rotate,
        ToolKind::Reverse,
        ToolKind::Unlink,
        ToolKind::Link,
        ToolKind::BackgroundColor,
        ToolKind::MovePlane,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::None => "no_state",
            ToolKind::Create => "create_shape",
            ToolKind::Move => "move_shape",
            ToolKind::Rotate => "rotate_shape",
            ToolKind::Reverse => "reverse_shape",
            ToolKind::Unlink => "unlink_shapes",
            ToolKind::Link => "link_shapes",
            ToolKind::BackgroundColor => "background_color",
            ToolKind::MovePlane => "move_plane",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolKind {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ToolKind::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| HistoryError::UnknownAction {
                name: s.to_string(),
            })
    }
}

/// Argument of [`ToolState::start`].
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ToolParams {
    #[default]
    None,
    /// Template to instantiate with the create tool.
    Template {
        family_name: String,
        template: ShapeTemplate,
    },
    /// Shape to act on immediately.
    Shape(ShapeId),
    Color(Color),
}

/// What a state may touch while handling an event.
pub struct ToolContext<'a> {
    pub workspace: &'a mut Workspace,
    pub history: &'a mut AppHistory,
    pub view: &'a mut dyn CanvasView,
    pub now: Duration,
}

/// Capabilities shared by every tool state. Pointer coordinates are in
/// world space.
pub trait ToolState {
    fn kind(&self) -> ToolKind;

    fn start(&mut self, _params: ToolParams, _ctx: &mut ToolContext<'_>) {}

    /// Clears transient fields.
    fn reset(&mut self);

    /// Leaves the state. Idempotent, and valid on a state never started.
    fn abort(&mut self) {
        self.reset();
    }

    fn click(&mut self, _at: Coordinates, _selection: Selection, _ctx: &mut ToolContext<'_>) {}

    fn mousedown(&mut self, _at: Coordinates, _selection: Selection, _ctx: &mut ToolContext<'_>) {}

    fn mouseup(&mut self, _at: Coordinates, _selection: Selection, _ctx: &mut ToolContext<'_>) {}

    fn mousemove(&mut self, _at: Coordinates, _ctx: &mut ToolContext<'_>) {}

    /// Draws transient feedback on top of the layers.
    fn draw(&self, _view: &mut dyn CanvasView, _workspace: &Workspace, _mouse: Coordinates) {}

    /// Advances animations.
    fn tick(&mut self, _ctx: &mut ToolContext<'_>) {}

    fn is_animating(&self) -> bool {
        false
    }

    /// Pushes the step for the action that just completed.
    fn make_history(&mut self, _history: &mut AppHistory) {}

    /// Restores the workspace from `data` and fires `completion` once done.
    fn cancel_action(&mut self, data: &serde_json::Value, workspace: &mut Workspace, completion: Completion);

    fn elements_to_highlight(&self, _shape: &Shape, _workspace: &Workspace) -> Highlight {
        Highlight::default()
    }
}

/// Decodes recorded history data for `kind`.
pub(crate) fn decode<T: DeserializeOwned>(kind: ToolKind, data: &serde_json::Value) -> Result<T, HistoryError> {
    serde_json::from_value(data.clone()).map_err(|e| HistoryError::InvalidData {
        action: kind.to_string(),
        reason: e.to_string(),
    })
}

/// Encodes history data. The data types only hold plain values, so this
/// cannot fail in practice; a failure is logged and yields `null`.
pub(crate) fn encode<T: Serialize>(kind: ToolKind, data: &T) -> serde_json::Value {
    serde_json::to_value(data).unwrap_or_else(|e| {
        tracing::error!("Cannot encode history data for {}: {}", kind, e);
        serde_json::Value::Null
    })
}

/// Shape picked by a pointer event: the view's selection, else a hit-test.
pub(crate) fn pick(at: Coordinates, selection: Selection, workspace: &Workspace) -> Option<ShapeId> {
    selection.shape.or_else(|| workspace.select_shape_at(at))
}

/// Labels every grouped shape with "Groupe N".
pub(crate) fn draw_group_labels(view: &mut dyn CanvasView, workspace: &Workspace) {
    for (index, group) in workspace.user_shape_groups().iter().enumerate() {
        for id in group {
            if let Some(shape) = workspace.shape(*id) {
                let position = shape.center() + Coordinates::new(-25.0, 0.0);
                view.draw_text(&format!("Groupe {}", index + 1), position, "#000");
            }
        }
    }
}

/// Every tool state, with the active one selected by kind.
pub struct ToolSet {
    current: ToolKind,
    none: NoState,
    create: CreateState,
    move_shape: MoveState,
    rotate: RotateState,
    reverse: ReverseState,
    unlink: UnlinkerState,
    link: LinkerState,
    background_color: BackgroundColorState,
    move_plane: MovePlaneState,
}

impl ToolSet {
    /// Invalid settings are logged and replaced by the defaults.
    pub fn new(settings: &ToolSettings) -> Self {
        let defaults;
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                tracing::error!("Invalid tool settings, using defaults: {}", e);
                defaults = ToolSettings::default();
                &defaults
            }
        };
        Self {
            current: ToolKind::None,
            none: NoState,
            create: CreateState::default(),
            move_shape: MoveState::default(),
            rotate: RotateState::default(),
            reverse: ReverseState::new(Duration::from_secs_f64(settings.reverse_duration_secs)),
            unlink: UnlinkerState::default(),
            link: LinkerState::default(),
            background_color: BackgroundColorState::default(),
            move_plane: MovePlaneState::default(),
        }
    }

    pub fn current(&self) -> ToolKind {
        self.current
    }

    pub fn state(&self, kind: ToolKind) -> &dyn ToolState {
        match kind {
            ToolKind::None => &self.none,
            ToolKind::Create => &self.create,
            ToolKind::Move => &self.move_shape,
            ToolKind::Rotate => &self.rotate,
            ToolKind::Reverse => &self.reverse,
            ToolKind::Unlink => &self.unlink,
            ToolKind::Link => &self.link,
            ToolKind::BackgroundColor => &self.background_color,
            ToolKind::MovePlane => &self.move_plane,
        }
    }

    pub fn state_mut(&mut self, kind: ToolKind) -> &mut dyn ToolState {
        match kind {
            ToolKind::None => &mut self.none,
            ToolKind::Create => &mut self.create,
            ToolKind::Move => &mut self.move_shape,
            ToolKind::Rotate => &mut self.rotate,
            ToolKind::Reverse => &mut self.reverse,
            ToolKind::Unlink => &mut self.unlink,
            ToolKind::Link => &mut self.link,
            ToolKind::BackgroundColor => &mut self.background_color,
            ToolKind::MovePlane => &mut self.move_plane,
        }
    }

    fn active_mut(&mut self) -> &mut dyn ToolState {
        self.state_mut(self.current)
    }

    pub fn is_animating(&self) -> bool {
        ToolKind::ALL.iter().any(|k| self.state(*k).is_animating())
    }

    /// Switches to `kind`, aborting the active state first. Refused while
    /// an animation runs.
    pub fn set_state(&mut self, kind: ToolKind, params: ToolParams, ctx: &mut ToolContext<'_>) -> bool {
        if self.is_animating() {
            tracing::warn!("Cannot switch to {} while an animation runs", kind);
            return false;
        }
        self.active_mut().abort();
        self.current = kind;
        tracing::debug!("Tool state: {}", kind);
        self.active_mut().start(params, ctx);
        true
    }

    /// Aborts every state and returns to [`ToolKind::None`].
    pub fn reset_all(&mut self) {
        for kind in ToolKind::ALL {
            self.state_mut(kind).abort();
        }
        self.current = ToolKind::None;
    }

    pub fn click(&mut self, at: Coordinates, selection: Selection, ctx: &mut ToolContext<'_>) {
        self.active_mut().click(at, selection, ctx);
    }

    pub fn mousedown(&mut self, at: Coordinates, selection: Selection, ctx: &mut ToolContext<'_>) {
        self.active_mut().mousedown(at, selection, ctx);
    }

    pub fn mouseup(&mut self, at: Coordinates, selection: Selection, ctx: &mut ToolContext<'_>) {
        self.active_mut().mouseup(at, selection, ctx);
    }

    pub fn mousemove(&mut self, at: Coordinates, ctx: &mut ToolContext<'_>) {
        self.active_mut().mousemove(at, ctx);
    }

    /// Ticks every animating state, active or not, since an undo may
    /// animate a state other than the active one.
    pub fn tick(&mut self, ctx: &mut ToolContext<'_>) {
        for kind in ToolKind::ALL {
            let state = self.state_mut(kind);
            if state.is_animating() {
                state.tick(ctx);
            }
        }
    }

    pub fn draw(&self, view: &mut dyn CanvasView, workspace: &Workspace, mouse: Coordinates) {
        self.state(self.current).draw(view, workspace, mouse);
    }

    pub fn elements_to_highlight(&self, shape: &Shape, workspace: &Workspace) -> Highlight {
        self.state(self.current).elements_to_highlight(shape, workspace)
    }

    pub fn cancel_action(
        &mut self,
        kind: ToolKind,
        data: &serde_json::Value,
        workspace: &mut Workspace,
        completion: Completion,
    ) {
        self.state_mut(kind).cancel_action(data, workspace, completion);
    }
}
