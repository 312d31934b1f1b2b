//! # AGtablette Core
//!
//! Core types shared by every AGtablette crate: the error taxonomy,
//! the application event bus and the identifier aliases used to refer
//! to shapes, segments and points across layers.

pub mod error;
pub mod event_bus;
pub mod types;

pub use error::{Error, HistoryError, LayerError, Result, ShapeError};

pub use event_bus::{
    AppEvent, EventBus, EventCategory, EventFilter, HistoryEvent, ToolEvent, WorkspaceEvent,
};

pub use types::{Color, LayerKind, PointId, SegmentId, ShapeId};
