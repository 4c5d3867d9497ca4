//! Front view: shoulder tilt and leg alignment

use tracing::{debug, warn};

use crate::analysis::{AnalysisBuilder, AnalysisResult};
use crate::classifier::{classify, Classification, Severity, ThresholdRule, ThresholdSet};
use crate::geometry::{angle_at, tilt_angle, Point};
use crate::landmark::{BodyPart, LandmarkSet};
use crate::pipeline::{PipelineContext, ViewMode};
use crate::PostureError;

/// Absolute shoulder line tilt (degrees)
pub const SHOULDER_TILT: ThresholdSet = ThresholdSet {
    rules: &[ThresholdRule::above(3.0, "Uneven Shoulders", Severity::Bad)],
    otherwise: Classification::OK,
};

/// Mean hip-knee-ankle angle of both legs (degrees); [170, 185] is neutral
pub const LEG_ALIGNMENT: ThresholdSet = ThresholdSet {
    rules: &[
        ThresholdRule::below(170.0, "X-Type Legs", Severity::Bad),
        ThresholdRule::above(185.0, "O-Type Legs", Severity::Warning),
    ],
    otherwise: Classification::OK,
};

pub const SHOULDER_LABEL: &str = "Shoulder Tilt";
pub const LEG_LABEL: &str = "Leg Angle";

/// Hip, knee and ankle of one leg
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    pub hip: Point,
    pub knee: Point,
    pub ankle: Point,
}

impl Leg {
    fn locate(
        landmarks: &LandmarkSet,
        ctx: &PipelineContext,
        parts: [BodyPart; 3],
    ) -> Result<Self, PostureError> {
        Ok(Self {
            hip: ctx.point(landmarks, parts[0])?,
            knee: ctx.point(landmarks, parts[1])?,
            ankle: ctx.point(landmarks, parts[2])?,
        })
    }

    /// Angle at the knee
    pub fn angle(&self) -> Result<f64, PostureError> {
        angle_at(self.hip, self.knee, self.ankle)
    }

    fn points(&self) -> [Point; 3] {
        [self.hip, self.knee, self.ankle]
    }
}

/// Absolute tilt of the shoulder line
pub fn shoulder_tilt(left: Point, right: Point) -> Result<f64, PostureError> {
    Ok(tilt_angle(left, right)?.abs())
}

/// Mean knee angle of both legs
pub fn leg_alignment(left: &Leg, right: &Leg) -> Result<f64, PostureError> {
    Ok((left.angle()? + right.angle()?) / 2.0)
}

fn classified(
    metric: Result<f64, PostureError>,
    set: &ThresholdSet,
    what: &str,
) -> (Option<f64>, Classification) {
    match metric {
        Ok(value) => (Some(value), classify(value, set)),
        Err(e @ PostureError::MissingLandmark { .. }) => {
            debug!("{} undefined: {}", what, e);
            (None, Classification::UNDEFINED)
        }
        Err(e) => {
            warn!("{} undefined: {}", what, e);
            (None, Classification::UNDEFINED)
        }
    }
}

/// Analyze a front-facing frame.
///
/// Both shoulders are required. A leg landmark that is missing or not
/// visible leaves the leg check undefined and its segments undrawn.
pub fn analyze(landmarks: &LandmarkSet, ctx: &PipelineContext) -> Result<AnalysisResult, PostureError> {
    let left_shoulder = ctx.point(landmarks, BodyPart::LeftShoulder)?;
    let right_shoulder = ctx.point(landmarks, BodyPart::RightShoulder)?;
    let legs = Leg::locate(
        landmarks,
        ctx,
        [BodyPart::LeftHip, BodyPart::LeftKnee, BodyPart::LeftAnkle],
    )
    .and_then(|left| {
        let right = Leg::locate(
            landmarks,
            ctx,
            [BodyPart::RightHip, BodyPart::RightKnee, BodyPart::RightAnkle],
        )?;
        Ok((left, right))
    });

    let (tilt, shoulders) = classified(
        shoulder_tilt(left_shoulder, right_shoulder),
        &SHOULDER_TILT,
        "shoulder tilt",
    );
    let (leg_angle, alignment) = classified(
        legs.clone().and_then(|(left, right)| leg_alignment(&left, &right)),
        &LEG_ALIGNMENT,
        "leg alignment",
    );

    let mut builder = AnalysisBuilder::new(ViewMode::Front)
        .segment([left_shoulder, right_shoulder], shoulders.severity)
        .metric(SHOULDER_LABEL, tilt, 1, shoulders);
    if let Ok((left, right)) = legs {
        builder = builder
            .segment(left.points(), alignment.severity)
            .segment(right.points(), alignment.severity);
    }
    Ok(builder.metric(LEG_LABEL, leg_angle, 1, alignment).build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::Color;
    use crate::pipeline::test_support::landmarks_with;

    fn straight_legs() -> Vec<(BodyPart, f64, f64)> {
        vec![
            (BodyPart::LeftHip, 0.4, 0.6),
            (BodyPart::LeftKnee, 0.4, 0.75),
            (BodyPart::LeftAnkle, 0.4, 0.9),
            (BodyPart::RightHip, 0.6, 0.6),
            (BodyPart::RightKnee, 0.6, 0.75),
            (BodyPart::RightAnkle, 0.6, 0.9),
        ]
    }

    #[test]
    fn test_level_shoulders_are_ok() {
        let tilt = shoulder_tilt(Point::new(0.0, 0.0), Point::new(10.0, 0.0)).unwrap();
        assert_eq!(tilt, 0.0);
        assert_eq!(classify(tilt, &SHOULDER_TILT), Classification::OK);
    }

    #[test]
    fn test_tilted_shoulders_are_uneven() {
        let tilt = shoulder_tilt(Point::new(0.0, 0.0), Point::new(10.0, 1.0)).unwrap();
        assert!((tilt - 5.7).abs() < 0.05);

        let status = classify(tilt, &SHOULDER_TILT);
        assert_eq!(status.label, "Uneven Shoulders");
        assert_eq!(status.severity, Severity::Bad);
    }

    #[test]
    fn test_tilt_sign_is_dropped() {
        let up = shoulder_tilt(Point::new(0.0, 1.0), Point::new(10.0, 0.0)).unwrap();
        let down = shoulder_tilt(Point::new(0.0, 0.0), Point::new(10.0, 1.0)).unwrap();
        assert_eq!(up, down);
    }

    #[test]
    fn test_leg_classification() {
        assert_eq!(classify(165.0, &LEG_ALIGNMENT).label, "X-Type Legs");
        assert_eq!(classify(165.0, &LEG_ALIGNMENT).severity, Severity::Bad);
        assert_eq!(classify(178.0, &LEG_ALIGNMENT), Classification::OK);
        assert_eq!(classify(190.0, &LEG_ALIGNMENT).label, "O-Type Legs");
        assert_eq!(classify(190.0, &LEG_ALIGNMENT).severity, Severity::Warning);
    }

    #[test]
    fn test_leg_boundaries_are_neutral() {
        assert_eq!(classify(170.0, &LEG_ALIGNMENT), Classification::OK);
        assert_eq!(classify(185.0, &LEG_ALIGNMENT), Classification::OK);
    }

    #[test]
    fn test_leg_alignment_averages() {
        let straight = Leg {
            hip: Point::new(0.0, 0.0),
            knee: Point::new(0.0, 10.0),
            ankle: Point::new(0.0, 20.0),
        };
        let bent = Leg {
            hip: Point::new(0.0, 0.0),
            knee: Point::new(0.0, 10.0),
            ankle: Point::new(10.0, 10.0),
        };
        let mean = leg_alignment(&straight, &bent).unwrap();
        assert!((mean - 135.0).abs() < 1e-9);
    }

    #[test]
    fn test_front_result_layout() {
        let mut parts = straight_legs();
        parts.push((BodyPart::LeftShoulder, 0.4, 0.3));
        parts.push((BodyPart::RightShoulder, 0.6, 0.3));
        let result = analyze(&landmarks_with(&parts), &PipelineContext::default()).unwrap();

        assert_eq!(result.mode, ViewMode::Front);
        assert_eq!(result.segments.len(), 3);
        assert_eq!(result.segments[0].points.len(), 2);
        assert_eq!(result.segments[1].points.len(), 3);
        assert_eq!(result.segments[2].points.len(), 3);

        assert_eq!(result.annotations.len(), 2);
        assert_eq!(result.annotations[0].label, SHOULDER_LABEL);
        assert_eq!(result.annotations[0].value, "0.0");
        assert_eq!(result.annotations[0].status.as_deref(), Some("OK"));
        assert_eq!(result.annotations[1].label, LEG_LABEL);
        assert_eq!(result.annotations[1].value, "180.0");
        assert!(result.annotations[0].position.y < result.annotations[1].position.y);
        assert!(result.segments.iter().all(|s| s.color == Color::GREEN));
    }

    #[test]
    fn test_knock_knees_share_severity() {
        let parts = vec![
            (BodyPart::LeftShoulder, 0.4, 0.3),
            (BodyPart::RightShoulder, 0.6, 0.3),
            (BodyPart::LeftHip, 0.4, 0.5),
            (BodyPart::LeftKnee, 0.5, 0.7),
            (BodyPart::LeftAnkle, 0.4, 0.9),
            (BodyPart::RightHip, 0.6, 0.5),
            (BodyPart::RightKnee, 0.5, 0.7),
            (BodyPart::RightAnkle, 0.6, 0.9),
        ];
        let result = analyze(&landmarks_with(&parts), &PipelineContext::default()).unwrap();

        let legs = result.annotation(LEG_LABEL).unwrap();
        assert_eq!(legs.status.as_deref(), Some("X-Type Legs"));
        assert_eq!(result.segments[1].severity, Severity::Bad);
        assert_eq!(result.segments[2].severity, Severity::Bad);
    }

    #[test]
    fn test_coincident_shoulders_are_undefined() {
        let mut parts = straight_legs();
        parts.push((BodyPart::LeftShoulder, 0.5, 0.3));
        parts.push((BodyPart::RightShoulder, 0.5, 0.3));
        let result = analyze(&landmarks_with(&parts), &PipelineContext::default()).unwrap();

        let shoulders = result.annotation(SHOULDER_LABEL).unwrap();
        assert_eq!(shoulders.value, "--");
        assert_eq!(shoulders.status.as_deref(), Some("Undefined"));
        // Leg check is unaffected
        assert_eq!(result.annotation(LEG_LABEL).unwrap().status.as_deref(), Some("OK"));
    }

    #[test]
    fn test_missing_legs_keep_shoulder_check() {
        let set = LandmarkSet::new(vec![crate::Landmark::new(0.5, 0.5); 27]);
        let result = analyze(&set, &PipelineContext::default()).unwrap();

        assert_eq!(result.segments.len(), 1);
        let shoulders = result.annotation(SHOULDER_LABEL).unwrap();
        assert_eq!(shoulders.status.as_deref(), Some("Undefined"));
        let legs = result.annotation(LEG_LABEL).unwrap();
        assert_eq!(legs.value, "--");
        assert_eq!(legs.status.as_deref(), Some("Undefined"));
        assert_eq!(legs.severity, Severity::Warning);
    }

    #[test]
    fn test_hidden_knee_leaves_legs_undefined() {
        let mut parts = straight_legs();
        parts.push((BodyPart::LeftShoulder, 0.4, 0.3));
        parts.push((BodyPart::RightShoulder, 0.6, 0.35));
        let mut landmarks = vec![crate::Landmark::new(0.5, 0.5); crate::landmark::POSE_LANDMARK_COUNT];
        for (part, x, y) in parts {
            landmarks[part.index()] = crate::Landmark::new(x, y);
        }
        landmarks[BodyPart::RightKnee.index()].visibility = Some(0.1);
        let set = LandmarkSet::new(landmarks);
        let ctx = PipelineContext {
            min_visibility: 0.5,
            ..Default::default()
        };

        let result = analyze(&set, &ctx).unwrap();
        assert_eq!(result.segments.len(), 1);
        assert_eq!(
            result.annotation(SHOULDER_LABEL).unwrap().status.as_deref(),
            Some("Uneven Shoulders")
        );
        assert_eq!(result.annotation(LEG_LABEL).unwrap().status.as_deref(), Some("Undefined"));
    }

    #[test]
    fn test_missing_shoulder_fails() {
        let set = LandmarkSet::new(vec![crate::Landmark::new(0.5, 0.5); 12]);
        assert_eq!(
            analyze(&set, &PipelineContext::default()),
            Err(PostureError::MissingLandmark {
                part: BodyPart::RightShoulder,
                index: 12
            })
        );
    }
}
