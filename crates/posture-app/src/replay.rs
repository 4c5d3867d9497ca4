//! JSON-lines replay of pose frames and UI events

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use posture::{
    AnalysisResult, FrameInput, FrameProcessor, LandmarkSet, PostureConfig, RenderSink, SessionEvent,
    SessionState, Severity,
};
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};
use video_frame::VideoFrame;

/// One line of the input stream
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputRecord {
    /// A delivered frame; `landmarks` is null when no pose was detected
    Frame {
        sequence: u32,
        #[serde(default)]
        timestamp_ns: u64,
        #[serde(default)]
        landmarks: Option<LandmarkSet>,
        /// Image file for the frame; a blank canvas when absent
        #[serde(default)]
        image: Option<PathBuf>,
    },
    /// A UI event, applied before the next frame
    Event { event: SessionEvent },
}

/// One line of output per analyzed frame
#[derive(Debug, Serialize)]
pub struct FrameReport<'a> {
    pub sequence: u32,
    /// Sequence of the frame shown as background (differs while frozen)
    pub background_sequence: u32,
    pub frozen: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall: Option<Severity>,
    /// Rendered text lines, top to bottom
    pub lines: Vec<String>,
    pub analysis: &'a AnalysisResult,
}

/// Counters for a finished replay
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub frames: u64,
    /// Frames that produced an analysis
    pub analyzed: u64,
    /// Frames without a usable pose
    pub skipped: u64,
    /// Frames dropped on an image load or render error
    pub failed: u64,
    pub events: u64,
}

/// Parse input lines and forward them in order; malformed lines are logged and dropped
pub async fn read_records<R>(reader: R, tx: mpsc::Sender<InputRecord>) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut line_no = 0usize;

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        line_no += 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match serde_json::from_str::<InputRecord>(line) {
            Ok(record) => {
                if tx.send(record).await.is_err() {
                    debug!("Frame loop stopped, dropping remaining input");
                    break;
                }
            }
            Err(e) => warn!("Skipping malformed line {}: {}", line_no, e),
        }
    }

    Ok(())
}

async fn load_image(
    image: Option<PathBuf>,
    posture: &PostureConfig,
    timestamp_ns: u64,
    sequence: u32,
) -> anyhow::Result<VideoFrame> {
    let frame = match image {
        Some(path) => tokio::task::spawn_blocking(move || VideoFrame::open(path, timestamp_ns, sequence))
            .await
            .context("Image loader panicked")??,
        None => VideoFrame::blank(posture.canvas_width, posture.canvas_height, timestamp_ns, sequence)?,
    };
    Ok(frame)
}

/// Drive the frame processor over queued records.
///
/// Events are applied between frames, so each frame sees one consistent
/// mode and freeze state.
pub async fn replay<W, S>(
    mut rx: mpsc::Receiver<InputRecord>,
    posture: &PostureConfig,
    out: &mut W,
    mut sink: Option<S>,
) -> anyhow::Result<ReplaySummary>
where
    W: Write,
    S: RenderSink,
    S::Error: std::fmt::Display,
{
    let mut processor = FrameProcessor::new(posture)?;
    let mut session = SessionState::new(posture.initial_mode);
    let mut summary = ReplaySummary::default();

    while let Some(record) = rx.recv().await {
        match record {
            InputRecord::Event { event } => {
                summary.events += 1;
                session.apply(event);
            }
            InputRecord::Frame {
                sequence,
                timestamp_ns,
                landmarks,
                image,
            } => {
                summary.frames += 1;
                let image = match load_image(image, posture, timestamp_ns, sequence).await {
                    Ok(image) => image,
                    Err(e) => {
                        warn!("Dropping frame {}: {:#}", sequence, e);
                        summary.failed += 1;
                        continue;
                    }
                };

                let Some(output) = processor.process(&mut session, FrameInput { landmarks, image }) else {
                    continue;
                };

                if let Some(sink) = sink.as_mut() {
                    if let Err(e) = sink.render(&output) {
                        warn!("Failed to render frame {}: {}", sequence, e);
                        summary.failed += 1;
                        continue;
                    }
                }

                let report = FrameReport {
                    sequence: output.sequence,
                    background_sequence: output.background.sequence,
                    frozen: session.is_frozen(),
                    overall: output.analysis.overall_severity(),
                    lines: output.analysis.annotations.iter().map(|a| a.text()).collect(),
                    analysis: &output.analysis,
                };
                serde_json::to_writer(&mut *out, &report)?;
                writeln!(out)?;
            }
        }
    }

    let stats = processor.stats();
    summary.analyzed = stats.processed;
    summary.skipped = stats.skipped;

    out.flush()?;
    Ok(summary)
}
