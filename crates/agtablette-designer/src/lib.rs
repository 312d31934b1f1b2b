//! # AGtablette Designer
//!
//! The geometry and interaction core of AGtablette: shapes built from
//! drawing steps, layers that own them, the workspace with its zoom and
//! pan, the tool states that turn pointer events into edits, and the undo
//! history.
//!
//! ## Architecture
//!
//! ```text
//! App
//!   ├── Workspace
//!   │     ├── Layers (main, tangram, grid)
//!   │     │     └── Shapes, Segments, Points (by id)
//!   │     └── Viewport (zoom, offset)
//!   ├── ToolSet (one state per tool)
//!   ├── AppHistory (undo stack)
//!   └── CanvasView (rendering, provided by the caller)
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agtablette_designer::{App, Coordinates, RecordingCanvas, Selection, ToolKind};
//!
//! let mut app = App::new(Config::default(), RecordingCanvas::new());
//! app.select_template("Formes standard", "Carré")?;
//! app.click(Coordinates::new(100.0, 100.0), Selection::none());
//! app.undo();
//! ```

pub mod animation;
pub mod app;
pub mod canvas;
pub mod family;
pub mod history;
pub mod layer;
pub mod model;
pub mod states;
pub mod viewport;
pub mod workspace;

pub use animation::{AnimationDriver, Clock, Frame, SystemClock, VirtualClock};
pub use app::App;
pub use canvas::{CanvasView, DrawCommand, Highlight, RecordingCanvas, Selection};
pub use family::{Family, ShapeTemplate};
pub use history::{AppHistory, Completion, HistoryStep};
pub use layer::{Entity, Layer, LayerData, PointStore, SegmentStore, Store};
pub use model::{
    validate_build_steps, AxisKind, Coordinates, Point, Segment, Shape, ShapeData, ShapeStep,
    SymmetryAxis, DEFAULT_PRECISION,
};
pub use states::{ToolContext, ToolKind, ToolParams, ToolSet, ToolState};
pub use viewport::Viewport;
pub use workspace::{SelectionConstraints, Workspace, WorkspaceData};
