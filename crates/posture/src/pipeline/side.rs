//! Side view: forward head posture

use tracing::warn;

use crate::analysis::{format_metric, AnalysisBuilder, AnalysisResult};
use crate::classifier::{classify, Classification, Severity, ThresholdRule, ThresholdSet};
use crate::geometry::{angle_at, Point};
use crate::landmark::{BodyPart, LandmarkSet};
use crate::pipeline::{PipelineContext, ViewMode};
use crate::PostureError;

/// Angle between the shoulder-ear line and vertical (degrees)
pub const NECK_POSTURE: ThresholdSet = ThresholdSet {
    rules: &[
        ThresholdRule::above(30.0, "Forward Head", Severity::Bad),
        ThresholdRule::above(15.0, "Slight Forward Head", Severity::Warning),
    ],
    otherwise: Classification::OK,
};

pub const NECK_LABEL: &str = "Neck Angle";
pub const STATUS_LABEL: &str = "Status";

/// Angle at the shoulder between the ear and a point straight above it
pub fn neck_angle(ear: Point, shoulder: Point, vertical_offset: f64) -> Result<f64, PostureError> {
    let vertical = Point::new(shoulder.x, shoulder.y - vertical_offset);
    angle_at(ear, shoulder, vertical)
}

/// Analyze a profile frame
pub fn analyze(landmarks: &LandmarkSet, ctx: &PipelineContext) -> Result<AnalysisResult, PostureError> {
    let ear = ctx.point(landmarks, BodyPart::LeftEar)?;
    let shoulder = ctx.point(landmarks, BodyPart::LeftShoulder)?;

    let (angle, status) = match neck_angle(ear, shoulder, ctx.vertical_offset) {
        Ok(angle) => (Some(angle), classify(angle, &NECK_POSTURE)),
        Err(e) => {
            warn!("neck angle undefined: {}", e);
            (None, Classification::UNDEFINED)
        }
    };

    Ok(AnalysisBuilder::new(ViewMode::Side)
        .segment([shoulder, ear], status.severity)
        .annotation(NECK_LABEL, format_metric(angle, 0), None, status.severity)
        .annotation(STATUS_LABEL, status.label, None, status.severity)
        .build())
}
