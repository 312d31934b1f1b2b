//! # AGtablette
//!
//! Geometry and interaction core of an interactive geometry workspace:
//! shapes built from drawing steps, a pannable and zoomable workspace,
//! tool states driven by pointer events, and an undo history whose steps
//! may complete asynchronously.
//!
//! ## Architecture
//!
//! AGtablette is organized as a workspace with multiple crates:
//!
//! 1. **agtablette-core** - Error types, event bus, shared identifiers
//! 2. **agtablette-settings** - Zoom bounds, tool timings, config files
//! 3. **agtablette-designer** - Shapes, layers, workspace, tools, history
//! 4. **agtablette** - Logging setup and the headless runner

use std::path::Path;

use anyhow::Context;

pub use agtablette_designer as designer;
pub use agtablette_settings as settings;

pub use agtablette_core::{AppEvent, Error, EventBus, EventFilter, Result};
pub use agtablette_designer::{
    App, CanvasView, Coordinates, RecordingCanvas, Selection, Shape, ToolKind, ToolParams,
    Workspace, WorkspaceData,
};
pub use agtablette_settings::Config;

/// Build timestamp, set by the build script.
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging to stdout.
///
/// The filter defaults to `info` and can be overridden with `RUST_LOG`.
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stdout)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("logging already initialized")?;

    Ok(())
}

/// Counts describing a loaded workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceSummary {
    pub shapes: usize,
    pub background_shapes: usize,
    pub groups: usize,
    pub zoom_level: f64,
    pub translate_offset: Coordinates,
}

impl WorkspaceSummary {
    pub fn of(workspace: &Workspace) -> Self {
        Self {
            shapes: workspace.main().shapes().len(),
            background_shapes: workspace
                .layer(agtablette_core::LayerKind::Tangram)
                .shapes()
                .len(),
            groups: workspace.user_shape_groups().len(),
            zoom_level: workspace.zoom_level(),
            translate_offset: workspace.translate_offset(),
        }
    }
}

/// Builds a headless app and loads the workspace file at `path`, if any.
pub async fn open_workspace(
    config: Config,
    path: Option<&Path>,
) -> anyhow::Result<App<RecordingCanvas>> {
    let mut app = App::new(config, RecordingCanvas::new());
    let data = match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read {}", path.display()))?;
            let value: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("{} is not valid JSON", path.display()))?;
            Some(value)
        }
        None => None,
    };
    app.load(data.as_ref())
        .await
        .context("cannot load workspace")?;
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_open_without_file_is_empty() {
        let app = open_workspace(Config::new(), None).await.unwrap();
        let summary = WorkspaceSummary::of(&app.workspace);
        assert_eq!(summary.shapes, 0);
        assert_eq!(summary.zoom_level, 1.0);
    }

    #[tokio::test]
    async fn test_open_saved_workspace() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("workspace.json");
        std::fs::write(
            &path,
            r##"{
                "objects": {
                    "shapes": [{
                        "id": 3,
                        "name": "Triangle",
                        "familyName": "Test",
                        "color": "#FF0",
                        "x": 10.0,
                        "y": 20.0,
                        "buildSteps": [
                            {"type": "line", "x": 0.0, "y": 0.0},
                            {"type": "line", "x": 30.0, "y": 0.0},
                            {"type": "line", "x": 0.0, "y": -30.0}
                        ]
                    }]
                },
                "canvasSize": {"width": 1200.0, "height": 800.0},
                "translateOffset": {"x": 5.0, "y": 0.0}
            }"##,
        )
        .unwrap();

        let app = open_workspace(Config::new(), Some(&path)).await.unwrap();
        let summary = WorkspaceSummary::of(&app.workspace);
        assert_eq!(summary.shapes, 1);
        assert_eq!(summary.background_shapes, 0);
        assert_eq!(summary.translate_offset, Coordinates::new(5.0, 0.0));
    }

    #[tokio::test]
    async fn test_open_rejects_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(open_workspace(Config::new(), Some(&path)).await.is_err());
        assert!(open_workspace(Config::new(), Some(&dir.path().join("missing.json")))
            .await
            .is_err());
    }
}
