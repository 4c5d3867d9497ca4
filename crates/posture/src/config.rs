//! Posture analysis configuration

use serde::{Deserialize, Serialize};

use crate::geometry::Canvas;
use crate::pipeline::{PipelineContext, ViewMode};
use crate::PostureError;

/// Canvas height the vertical offset is specified against
pub const REFERENCE_CANVAS_HEIGHT: f64 = 480.0;

/// Posture analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureConfig {
    /// Render surface width (pixels)
    pub canvas_width: u32,

    /// Render surface height (pixels)
    pub canvas_height: u32,

    /// Distance of the vertical reference above the shoulder (pixels)
    pub vertical_offset_px: f64,

    /// Scale the vertical offset with canvas height
    pub scale_vertical_offset: bool,

    /// Landmark visibility below this counts as not detected
    pub min_visibility: f64,

    /// View mode at session start
    pub initial_mode: ViewMode,
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            canvas_width: 640,
            canvas_height: 480,
            vertical_offset_px: 100.0,
            scale_vertical_offset: false,
            min_visibility: 0.0,
            initial_mode: ViewMode::Front,
        }
    }
}

impl PostureConfig {
    pub fn validate(&self) -> Result<(), PostureError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(PostureError::Config(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas_width, self.canvas_height
            )));
        }
        if !(self.vertical_offset_px > 0.0) || !self.vertical_offset_px.is_finite() {
            return Err(PostureError::Config(format!(
                "vertical_offset_px must be positive, got {}",
                self.vertical_offset_px
            )));
        }
        if !(0.0..=1.0).contains(&self.min_visibility) {
            return Err(PostureError::Config(format!(
                "min_visibility must be within [0, 1], got {}",
                self.min_visibility
            )));
        }
        Ok(())
    }

    pub fn canvas(&self) -> Canvas {
        Canvas::new(self.canvas_width, self.canvas_height)
    }

    /// Effective vertical reference offset for the configured canvas
    pub fn vertical_offset(&self) -> f64 {
        if self.scale_vertical_offset {
            self.vertical_offset_px * self.canvas_height as f64 / REFERENCE_CANVAS_HEIGHT
        } else {
            self.vertical_offset_px
        }
    }

    pub fn pipeline_context(&self) -> PipelineContext {
        PipelineContext {
            canvas: self.canvas(),
            vertical_offset: self.vertical_offset(),
            min_visibility: self.min_visibility,
        }
    }
}
