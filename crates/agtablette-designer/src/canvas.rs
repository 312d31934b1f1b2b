//! Drawing contract between the interaction core and whatever renders it.
//!
//! The core never draws pixels itself. It asks a [`CanvasView`] to refresh
//! and to draw a few transient primitives (lines, labels, a shape part way
//! through a reversal).

use agtablette_core::{PointId, SegmentId, ShapeId};

use crate::model::{Coordinates, Shape, SymmetryAxis};

/// A rendering surface, in world coordinates.
pub trait CanvasView {
    /// Redraws the main layer. `mouse` is the last known pointer position.
    fn refresh(&mut self, mouse: Option<Coordinates>);

    /// Redraws the tangram and grid layers.
    fn refresh_background(&mut self) {}

    fn draw_line(&mut self, from: Coordinates, to: Coordinates, color: Option<&str>);

    fn draw_text(&mut self, text: &str, position: Coordinates, color: &str);

    /// Draws `shape` reflected across `axis` by `progress` (0 to 1).
    fn draw_reversing_shape(&mut self, shape: &Shape, axis: &SymmetryAxis, progress: f64);
}

/// Result of the view's hit-test, passed along with pointer events.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Selection {
    pub shape: Option<ShapeId>,
}

impl Selection {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn shape(id: ShapeId) -> Self {
        Self { shape: Some(id) }
    }
}

/// Elements a tool wants emphasized when the pointer hovers a shape.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Highlight {
    pub shapes: Vec<ShapeId>,
    pub segments: Vec<SegmentId>,
    pub points: Vec<PointId>,
}

impl Highlight {
    pub fn shapes(shapes: Vec<ShapeId>) -> Self {
        Self {
            shapes,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty() && self.segments.is_empty() && self.points.is_empty()
    }
}

/// One call received by a [`RecordingCanvas`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Refresh(Option<Coordinates>),
    RefreshBackground,
    Line {
        from: Coordinates,
        to: Coordinates,
        color: Option<String>,
    },
    Text {
        text: String,
        position: Coordinates,
        color: String,
    },
    ReversingShape {
        shape: ShapeId,
        axis: SymmetryAxis,
        progress: f64,
    },
}

/// Headless view that records every call. Used by the command-line
/// runner and by tests.
#[derive(Debug, Default)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Returns and forgets the recorded calls.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn count(&self, predicate: impl Fn(&DrawCommand) -> bool) -> usize {
        self.commands.iter().filter(|c| predicate(c)).count()
    }
}

impl CanvasView for RecordingCanvas {
    fn refresh(&mut self, mouse: Option<Coordinates>) {
        self.commands.push(DrawCommand::Refresh(mouse));
    }

    fn refresh_background(&mut self) {
        self.commands.push(DrawCommand::RefreshBackground);
    }

    fn draw_line(&mut self, from: Coordinates, to: Coordinates, color: Option<&str>) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color: color.map(str::to_string),
        });
    }

    fn draw_text(&mut self, text: &str, position: Coordinates, color: &str) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            color: color.to_string(),
        });
    }

    fn draw_reversing_shape(&mut self, shape: &Shape, axis: &SymmetryAxis, progress: f64) {
        self.commands.push(DrawCommand::ReversingShape {
            shape: shape.id,
            axis: *axis,
            progress,
        });
    }
}
