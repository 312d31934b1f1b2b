//! Viewport and coordinate transformation for canvas rendering.
//!
//! Converts between world coordinates (where shapes live) and canvas
//! coordinates (what the view draws). Both spaces have y growing
//! downwards; the mapping is `canvas = world * zoom + offset`.

use std::fmt;

use agtablette_settings::{CanvasSize, WorkspaceSettings};

use crate::model::Coordinates;

/// Zoom and pan state of the workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    zoom: f64,
    offset: Coordinates,
    canvas_size: CanvasSize,
    settings: WorkspaceSettings,
}

impl Viewport {
    /// Creates a viewport at zoom 1 with no offset.
    pub fn new(settings: &WorkspaceSettings) -> Self {
        Self {
            zoom: 1.0,
            offset: Coordinates::ORIGIN,
            canvas_size: settings.default_canvas_size,
            settings: settings.clone(),
        }
    }

    /// Gets the current zoom level (1.0 = 100%).
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Sets the zoom level, clamped to the configured bounds. NaN is
    /// ignored. Returns the stored value.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        match self.settings.clamp_zoom(zoom) {
            Some(clamped) => self.zoom = clamped,
            None => tracing::warn!("Ignoring invalid zoom level {}", zoom),
        }
        self.zoom
    }

    pub fn offset(&self) -> Coordinates {
        self.offset
    }

    pub fn set_offset(&mut self, offset: Coordinates) {
        self.offset = offset;
    }

    /// Pans by a delta in canvas units.
    pub fn translate_offset(&mut self, delta: Coordinates) {
        self.offset = self.offset + delta;
    }

    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas_size
    }

    /// Sets the canvas dimensions (typically called when the view resizes).
    pub fn set_canvas_size(&mut self, size: CanvasSize) {
        self.canvas_size = size;
    }

    /// Converts world coordinates to canvas coordinates.
    ///
    /// ```text
    /// canvas = world * zoom + offset
    /// ```
    pub fn world_to_canvas(&self, world: Coordinates) -> Coordinates {
        world * self.zoom + self.offset
    }

    /// Converts canvas coordinates to world coordinates.
    ///
    /// ```text
    /// world = (canvas - offset) / zoom
    /// ```
    pub fn canvas_to_world(&self, canvas: Coordinates) -> Coordinates {
        (canvas - self.offset) * (1.0 / self.zoom)
    }

    /// Resets to 1:1 zoom and no offset.
    pub fn reset(&mut self) {
        self.zoom = 1.0;
        self.offset = Coordinates::ORIGIN;
    }
}

impl fmt::Display for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Zoom: {:.2}x | Offset: ({:.1}, {:.1})",
            self.zoom, self.offset.x, self.offset.y
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(&WorkspaceSettings::default())
    }
}
