//! Analysis pipelines, one per camera view

pub mod front;
pub mod side;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::geometry::Canvas;
use crate::landmark::{BodyPart, LandmarkSet};
use crate::{Point, PostureError};

/// Camera view the subject is analyzed from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Facing the camera: shoulders and legs
    #[default]
    Front,
    /// Profile: neck and head
    Side,
}

impl ViewMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewMode::Front => "front",
            ViewMode::Side => "side",
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed parameters shared by the pipelines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineContext {
    /// Surface landmarks are scaled onto
    pub canvas: Canvas,
    /// Height of the synthetic vertical above the shoulder (pixels)
    pub vertical_offset: f64,
    /// Landmarks scoring below this are treated as missing
    pub min_visibility: f64,
}

impl PipelineContext {
    pub(crate) fn point(&self, landmarks: &LandmarkSet, part: BodyPart) -> Result<Point, PostureError> {
        landmarks.point(part, self.canvas, self.min_visibility)
    }
}

impl Default for PipelineContext {
    fn default() -> Self {
        Self {
            canvas: Canvas::default(),
            vertical_offset: 100.0,
            min_visibility: 0.0,
        }
    }
}

/// Run the pipeline for `mode` over one frame's landmarks
pub fn run(mode: ViewMode, landmarks: &LandmarkSet, ctx: &PipelineContext) -> Result<AnalysisResult, PostureError> {
    match mode {
        ViewMode::Front => front::analyze(landmarks, ctx),
        ViewMode::Side => side::analyze(landmarks, ctx),
    }
}
