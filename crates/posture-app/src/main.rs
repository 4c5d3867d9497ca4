//! Posture Monitor - Main Entry Point

use posture_app::{init_logging, run, AppConfig};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = AppConfig::load()?;
    if let Some(input) = std::env::args().nth(1) {
        config.input = Some(input.into());
    }
    init_logging(&config.log_level)?;

    info!("=== Posture Monitor v{} ===", env!("CARGO_PKG_VERSION"));

    let summary = run(config).await?;
    info!(
        "Replay finished: {} frames, {} analyzed, {} skipped, {} failed, {} events",
        summary.frames, summary.analyzed, summary.skipped, summary.failed, summary.events
    );

    Ok(())
}
