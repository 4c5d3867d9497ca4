//! Posture Monitor
//!
//! Reads a JSON-lines stream of pose frames and UI events, runs every frame
//! through the posture core, and reports each analysis as a JSON line on
//! stdout. Overlay PNGs are written when a render directory is configured.

mod replay;

pub use replay::{read_records, replay, FrameReport, InputRecord, ReplaySummary};

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use overlay::{OverlayRenderer, PngSink};
use posture::PostureConfig;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, BufReader};
use tokio::sync::mpsc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Default config file name (extension resolved by the `config` crate)
const DEFAULT_CONFIG_FILE: &str = "posture";

/// Queued records between the reader task and the frame loop
const CHANNEL_CAPACITY: usize = 64;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Core analysis settings
    pub posture: PostureConfig,
    /// Maximum log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// JSON-lines input; stdin when unset
    pub input: Option<PathBuf>,
    /// Directory for overlay PNGs; none written when unset
    pub render_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            posture: PostureConfig::default(),
            log_level: "info".to_string(),
            input: None,
            render_dir: None,
        }
    }
}

impl AppConfig {
    /// Load from `$POSTURE_CONFIG` (or `./posture.*` if present) plus `POSTURE__*` env vars
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(std::env::var("POSTURE_CONFIG").ok().as_deref())
    }

    /// Load with an explicit config file; the file is required when given
    pub fn load_from(path: Option<&str>) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::File::with_name(path.unwrap_or(DEFAULT_CONFIG_FILE)).required(path.is_some()),
            )
            .add_source(
                config::Environment::with_prefix("POSTURE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?;

        let app: AppConfig = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        app.posture.validate()?;
        Ok(app)
    }
}

/// Initialize logging to stderr (stdout carries the reports)
pub fn init_logging(level: &str) -> anyhow::Result<()> {
    let level = Level::from_str(level).with_context(|| format!("Invalid log level '{}'", level))?;

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set tracing subscriber")?;
    Ok(())
}

/// Run a full replay from the configured input
pub async fn run(config: AppConfig) -> anyhow::Result<ReplaySummary> {
    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &config.input {
        Some(path) => {
            info!("Replaying {}", path.display());
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("Failed to open {}", path.display()))?;
            Box::new(BufReader::new(file))
        }
        None => {
            info!("Replaying from stdin");
            Box::new(BufReader::new(tokio::io::stdin()))
        }
    };

    let sink = match &config.render_dir {
        Some(dir) => Some(PngSink::new(OverlayRenderer::new(config.posture.canvas()), dir)?),
        None => None,
    };

    let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
    let reader_task = tokio::spawn(read_records(reader, tx));

    let mut stdout = std::io::stdout().lock();
    let summary = replay(rx, &config.posture, &mut stdout, sink).await?;

    reader_task.await.context("Reader task panicked")??;
    Ok(summary)
}
