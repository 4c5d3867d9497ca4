//! Session state: view mode and freeze toggle

use serde::{Deserialize, Serialize};
use tracing::info;
use video_frame::VideoFrame;

use crate::pipeline::ViewMode;

/// State-transition requests from the UI side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionEvent {
    SelectFront,
    SelectSide,
    ToggleFreeze,
}

/// Mode and freeze flag as seen by one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub mode: ViewMode,
    pub freeze: bool,
}

/// Session state (lives for the whole run)
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    mode: ViewMode,
    freeze: bool,
    /// Held background; only set while frozen
    frozen_image: Option<VideoFrame>,
    /// Most recent live background, source for the next freeze
    latest_image: Option<VideoFrame>,
}

impl SessionState {
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze
    }

    pub fn frozen_image(&self) -> Option<&VideoFrame> {
        self.frozen_image.as_ref()
    }

    /// Mode and freeze flag to use for a whole frame
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            freeze: self.freeze,
        }
    }

    /// Apply an event; returns whether anything changed
    pub fn apply(&mut self, event: SessionEvent) -> bool {
        match event {
            SessionEvent::SelectFront => self.set_mode(ViewMode::Front),
            SessionEvent::SelectSide => self.set_mode(ViewMode::Side),
            SessionEvent::ToggleFreeze => {
                self.freeze = !self.freeze;
                if self.freeze {
                    self.frozen_image = self.latest_image.clone();
                } else {
                    self.frozen_image = None;
                }
                info!(
                    "Freeze {} (snapshot held: {})",
                    if self.freeze { "on" } else { "off" },
                    self.frozen_image.is_some()
                );
                true
            }
        }
    }

    fn set_mode(&mut self, mode: ViewMode) -> bool {
        if self.mode == mode {
            return false;
        }
        info!("View mode {} -> {}", self.mode, mode);
        self.mode = mode;
        true
    }

    /// Pick the background for a frame analyzed under `freeze`.
    ///
    /// Frozen: the held snapshot, capturing `live` if none is held yet.
    /// Live: `live` itself, remembered for the next freeze.
    pub(crate) fn background(&mut self, live: &VideoFrame, freeze: bool) -> VideoFrame {
        if freeze {
            self.frozen_image.get_or_insert_with(|| live.clone()).clone()
        } else {
            self.latest_image = Some(live.clone());
            live.clone()
        }
    }
}
