use std::path::PathBuf;

use agtablette::{init_logging, open_workspace, Config, WorkspaceSummary, BUILD_DATE};
use anyhow::Context;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging()?;
    tracing::info!(
        "AGtablette {} (built {})",
        env!("CARGO_PKG_VERSION"),
        BUILD_DATE
    );

    let config_path = Config::default_path().context("cannot locate config directory")?;
    let config = Config::load_or_default(&config_path)
        .with_context(|| format!("cannot load {}", config_path.display()))?;

    let workspace_path = std::env::args_os().nth(1).map(PathBuf::from);
    let app = open_workspace(config, workspace_path.as_deref()).await?;

    let summary = WorkspaceSummary::of(&app.workspace);
    tracing::info!(
        "{} shape(s), {} background shape(s), {} group(s), zoom {:.2}, offset {}",
        summary.shapes,
        summary.background_shapes,
        summary.groups,
        summary.zoom_level,
        summary.translate_offset
    );
    Ok(())
}
