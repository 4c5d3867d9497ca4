//! Pose landmarks as delivered by the pose-estimation model

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::geometry::{Canvas, Point};
use crate::PostureError;

/// Number of landmarks in the full-body pose model
pub const POSE_LANDMARK_COUNT: usize = 33;

/// Body parts used by the analysis pipelines, keyed by model index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyPart {
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl BodyPart {
    /// Landmark index in the 33-point pose model
    pub const fn index(self) -> usize {
        match self {
            BodyPart::LeftEar => 7,
            BodyPart::RightEar => 8,
            BodyPart::LeftShoulder => 11,
            BodyPart::RightShoulder => 12,
            BodyPart::LeftHip => 23,
            BodyPart::RightHip => 24,
            BodyPart::LeftKnee => 25,
            BodyPart::RightKnee => 26,
            BodyPart::LeftAnkle => 27,
            BodyPart::RightAnkle => 28,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BodyPart::LeftEar => "left_ear",
            BodyPart::RightEar => "right_ear",
            BodyPart::LeftShoulder => "left_shoulder",
            BodyPart::RightShoulder => "right_shoulder",
            BodyPart::LeftHip => "left_hip",
            BodyPart::RightHip => "right_hip",
            BodyPart::LeftKnee => "left_knee",
            BodyPart::RightKnee => "right_knee",
            BodyPart::LeftAnkle => "left_ankle",
            BodyPart::RightAnkle => "right_ankle",
        }
    }
}

impl fmt::Display for BodyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single landmark in normalized image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position, 0 = left edge, 1 = right edge
    pub x: f64,
    /// Vertical position, 0 = top edge, 1 = bottom edge
    pub y: f64,
    /// Model confidence that the landmark is visible (0-1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
}

impl Landmark {
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            visibility: None,
        }
    }

    fn is_usable(&self, min_visibility: f64) -> bool {
        self.x.is_finite()
            && self.y.is_finite()
            && self.visibility.map_or(true, |v| v >= min_visibility)
    }
}

/// All landmarks detected for one frame, indexed by model position
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    landmarks: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(landmarks: Vec<Landmark>) -> Self {
        Self { landmarks }
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    /// Raw landmark for a body part, if the model produced one
    pub fn get(&self, part: BodyPart) -> Option<&Landmark> {
        self.landmarks.get(part.index())
    }

    /// Landmark scaled into canvas pixels.
    ///
    /// Fails with [`PostureError::MissingLandmark`] when the index is absent,
    /// the coordinates are not finite, or visibility is below `min_visibility`.
    pub fn point(&self, part: BodyPart, canvas: Canvas, min_visibility: f64) -> Result<Point, PostureError> {
        self.get(part)
            .filter(|lm| lm.is_usable(min_visibility))
            .map(|lm| canvas.scale(lm.x, lm.y))
            .ok_or(PostureError::MissingLandmark {
                part,
                index: part.index(),
            })
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(landmarks: Vec<Landmark>) -> Self {
        Self::new(landmarks)
    }
}
