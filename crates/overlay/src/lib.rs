//! Overlay Rendering
//!
//! Draws an analysis result over its background frame: severity-colored
//! polylines, joint markers, and a color swatch beside each text line.
//!
//! Text glyphs are left to the consumer of the analysis: the overlay marks
//! where each line goes and in which severity color, while the readout text
//! travels with the result (`TextAnnotation::text`, and the `lines` field of
//! the monitor's JSON reports).

mod renderer;

pub use renderer::{OverlayRenderer, PngSink};

use thiserror::Error;

/// Overlay error types
#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("Frame error: {0}")]
    Frame(#[from] video_frame::FrameError),

    #[error("Failed to write {path}: {reason}")]
    Write { path: String, reason: String },
}
