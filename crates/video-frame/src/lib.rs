//! Video Frame Handle
//!
//! Provides the RGB frame type that flows from the capture side, through the
//! posture core (as the live or frozen background) and into overlay rendering.
//! Pixel storage is reference counted, so holding a frame as a frozen snapshot
//! never copies pixels and identity can be checked with [`VideoFrame::same_buffer`].

pub mod frame;

pub use frame::VideoFrame;

use thiserror::Error;

/// Frame error types
#[derive(Error, Debug)]
pub enum FrameError {
    #[error("Buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Invalid dimensions: {width}x{height}")]
    Dimensions { width: u32, height: u32 },

    #[error("Image error: {0}")]
    Image(String),
}

impl From<image::ImageError> for FrameError {
    fn from(e: image::ImageError) -> Self {
        FrameError::Image(e.to_string())
    }
}
