//! Posture Analysis Core
//!
//! Real-time postural assessment from pose-estimation landmarks:
//! - Shoulder tilt (front view)
//! - Leg alignment, X-type / O-type (front view)
//! - Forward head / neck angle (side view)
//!
//! Each processed frame yields an [`AnalysisResult`] of colored line segments
//! and text annotations, paired with the background image chosen by the
//! session's freeze state.

pub mod analysis;
pub mod classifier;
pub mod config;
pub mod geometry;
pub mod landmark;
pub mod pipeline;
pub mod processor;
pub mod session;

pub use analysis::{AnalysisBuilder, AnalysisResult, LineSegment, TextAnnotation};
pub use classifier::{classify, Bound, Classification, Color, Severity, ThresholdRule, ThresholdSet};
pub use config::PostureConfig;
pub use geometry::{angle_at, tilt_angle, Canvas, Point};
pub use landmark::{BodyPart, Landmark, LandmarkSet};
pub use pipeline::{PipelineContext, ViewMode};
pub use processor::{FrameInput, FrameProcessor, ProcessorStats, RenderOutput, RenderSink};
pub use session::{SessionEvent, SessionSnapshot, SessionState};

use thiserror::Error;

/// Posture analysis error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PostureError {
    #[error("No landmarks detected")]
    MissingLandmarks,

    #[error("Landmark {part} (index {index}) missing or not visible")]
    MissingLandmark { part: BodyPart, index: usize },

    #[error("Degenerate geometry in {operation}: zero-length vector")]
    DegenerateGeometry { operation: &'static str },

    #[error("Configuration error: {0}")]
    Config(String),
}
