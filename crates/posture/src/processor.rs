//! Per-frame orchestration

use tracing::debug;
use video_frame::VideoFrame;

use crate::analysis::AnalysisResult;
use crate::config::PostureConfig;
use crate::landmark::LandmarkSet;
use crate::pipeline::{self, PipelineContext};
use crate::session::{SessionSnapshot, SessionState};
use crate::PostureError;

/// One delivered frame: the live image and whatever the pose model found
#[derive(Debug, Clone)]
pub struct FrameInput {
    /// `None` when the model detected no pose
    pub landmarks: Option<LandmarkSet>,
    pub image: VideoFrame,
}

/// What the rendering side receives for a processed frame
#[derive(Debug, Clone)]
pub struct RenderOutput {
    /// Sequence number of the analyzed frame
    pub sequence: u32,
    /// Live image, or the held snapshot while frozen
    pub background: VideoFrame,
    pub analysis: AnalysisResult,
}

/// Rendering collaborator
pub trait RenderSink {
    type Error;

    fn render(&mut self, output: &RenderOutput) -> Result<(), Self::Error>;
}

/// Frame counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorStats {
    pub processed: u64,
    pub skipped: u64,
}

/// Runs the active pipeline over each incoming frame
pub struct FrameProcessor {
    context: PipelineContext,
    stats: ProcessorStats,
}

impl FrameProcessor {
    pub fn new(config: &PostureConfig) -> Result<Self, PostureError> {
        config.validate()?;
        Ok(Self {
            context: config.pipeline_context(),
            stats: ProcessorStats::default(),
        })
    }

    pub fn stats(&self) -> ProcessorStats {
        self.stats
    }

    /// Process one frame; `None` when the frame was skipped.
    ///
    /// Mode and freeze are read once up front and used for the whole frame.
    pub fn process(&mut self, session: &mut SessionState, input: FrameInput) -> Option<RenderOutput> {
        let snapshot = session.snapshot();
        let sequence = input.image.sequence;

        let analysis = match self.analyze(snapshot, input.landmarks.as_ref()) {
            Ok(analysis) => analysis,
            Err(e) => {
                debug!("Skipping frame {}: {}", sequence, e);
                self.stats.skipped += 1;
                return None;
            }
        };

        let background = session.background(&input.image, snapshot.freeze);
        self.stats.processed += 1;

        Some(RenderOutput {
            sequence,
            background,
            analysis,
        })
    }

    /// Process one frame and hand the result to `sink`; returns whether anything was rendered
    pub fn process_into<S: RenderSink>(
        &mut self,
        session: &mut SessionState,
        input: FrameInput,
        sink: &mut S,
    ) -> Result<bool, S::Error> {
        match self.process(session, input) {
            Some(output) => {
                sink.render(&output)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn analyze(
        &self,
        snapshot: SessionSnapshot,
        landmarks: Option<&LandmarkSet>,
    ) -> Result<AnalysisResult, PostureError> {
        let landmarks = landmarks
            .filter(|set| !set.is_empty())
            .ok_or(PostureError::MissingLandmarks)?;
        pipeline::run(snapshot.mode, landmarks, &self.context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmark::BodyPart;
    use crate::pipeline::test_support::landmarks_with;
    use crate::pipeline::{side, ViewMode};
    use crate::session::SessionEvent;

    fn pose(ear_x: f64) -> LandmarkSet {
        landmarks_with(&[
            (BodyPart::LeftEar, ear_x, 0.3),
            (BodyPart::LeftShoulder, 0.5, 0.5),
            (BodyPart::RightShoulder, 0.6, 0.5),
            (BodyPart::LeftHip, 0.45, 0.6),
            (BodyPart::LeftKnee, 0.45, 0.75),
            (BodyPart::LeftAnkle, 0.45, 0.9),
            (BodyPart::RightHip, 0.55, 0.6),
            (BodyPart::RightKnee, 0.55, 0.75),
            (BodyPart::RightAnkle, 0.55, 0.9),
        ])
    }

    fn input(sequence: u32, landmarks: Option<LandmarkSet>) -> FrameInput {
        FrameInput {
            landmarks,
            image: VideoFrame::blank(8, 6, sequence as u64 * 33_000_000, sequence).unwrap(),
        }
    }

    fn processor() -> FrameProcessor {
        FrameProcessor::new(&PostureConfig::default()).unwrap()
    }

    #[derive(Default)]
    struct Collect(Vec<RenderOutput>);

    impl RenderSink for Collect {
        type Error = std::convert::Infallible;

        fn render(&mut self, output: &RenderOutput) -> Result<(), Self::Error> {
            self.0.push(output.clone());
            Ok(())
        }
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = PostureConfig {
            canvas_width: 0,
            ..Default::default()
        };
        assert!(FrameProcessor::new(&config).is_err());
    }

    #[test]
    fn test_missing_landmarks_skip_frame() {
        let mut processor = processor();
        let mut session = SessionState::default();

        assert!(processor.process(&mut session, input(1, None)).is_none());
        assert!(processor
            .process(&mut session, input(2, Some(LandmarkSet::default())))
            .is_none());
        assert_eq!(processor.stats(), ProcessorStats { processed: 0, skipped: 2 });
    }

    #[test]
    fn test_incomplete_pose_skips_frame() {
        let mut processor = processor();
        let mut session = SessionState::default();
        let partial = LandmarkSet::new(vec![crate::Landmark::new(0.5, 0.5); 12]);

        assert!(processor.process(&mut session, input(1, Some(partial))).is_none());
        assert_eq!(processor.stats().skipped, 1);
    }

    #[test]
    fn test_live_background_follows_frames() {
        let mut processor = processor();
        let mut session = SessionState::default();

        let frame = input(1, Some(pose(0.5)));
        let image = frame.image.clone();
        let output = processor.process(&mut session, frame).unwrap();

        assert_eq!(output.sequence, 1);
        assert!(output.background.same_buffer(&image));
        assert_eq!(output.analysis.mode, ViewMode::Front);
    }

    #[test]
    fn test_freeze_holds_background_while_analysis_updates() {
        let mut processor = processor();
        let mut session = SessionState::new(ViewMode::Side);

        let first = input(1, Some(pose(0.5)));
        let held = first.image.clone();
        processor.process(&mut session, first).unwrap();

        session.apply(SessionEvent::ToggleFreeze);

        let upright = processor.process(&mut session, input(2, Some(pose(0.5)))).unwrap();
        let forward = processor.process(&mut session, input(3, Some(pose(0.65)))).unwrap();

        assert!(upright.background.same_buffer(&held));
        assert!(forward.background.same_buffer(&held));
        assert_eq!(forward.sequence, 3);
        assert_eq!(upright.analysis.annotation(side::STATUS_LABEL).unwrap().value, "OK");
        assert_eq!(
            forward.analysis.annotation(side::STATUS_LABEL).unwrap().value,
            "Forward Head"
        );

        session.apply(SessionEvent::ToggleFreeze);
        let live = input(4, Some(pose(0.5)));
        let image = live.image.clone();
        let output = processor.process(&mut session, live).unwrap();
        assert!(output.background.same_buffer(&image));
    }

    #[test]
    fn test_freeze_before_first_frame_captures_next() {
        let mut processor = processor();
        let mut session = SessionState::default();
        session.apply(SessionEvent::ToggleFreeze);

        let first = input(1, Some(pose(0.5)));
        let image = first.image.clone();
        processor.process(&mut session, first).unwrap();
        let second = processor.process(&mut session, input(2, Some(pose(0.5)))).unwrap();

        assert!(second.background.same_buffer(&image));
    }

    #[test]
    fn test_mode_switch_applies_to_next_frame_only() {
        let mut processor = processor();
        let mut session = SessionState::default();

        let before = processor.process(&mut session, input(1, Some(pose(0.5)))).unwrap();
        session.apply(SessionEvent::SelectSide);
        let after = processor.process(&mut session, input(2, Some(pose(0.5)))).unwrap();

        assert_eq!(before.analysis.mode, ViewMode::Front);
        assert_eq!(before.analysis.annotations.len(), 2);
        assert_eq!(after.analysis.mode, ViewMode::Side);
    }

    #[test]
    fn test_process_into_sink() {
        let mut processor = processor();
        let mut session = SessionState::default();
        let mut sink = Collect::default();

        assert!(!processor.process_into(&mut session, input(1, None), &mut sink).unwrap());
        assert!(processor
            .process_into(&mut session, input(2, Some(pose(0.5))), &mut sink)
            .unwrap());
        assert_eq!(sink.0.len(), 1);
        assert_eq!(sink.0[0].sequence, 2);
    }
}
