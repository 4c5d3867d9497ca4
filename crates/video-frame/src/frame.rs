//! Video frame type and conversions

use std::path::Path;
use std::sync::Arc;

use image::{imageops, RgbImage};
use tracing::debug;

use crate::FrameError;

/// Decoded RGB video frame
#[derive(Debug, Clone)]
pub struct VideoFrame {
    /// RGB pixel data (width * height * 3), shared between clones
    data: Arc<[u8]>,
    /// Frame width
    pub width: u32,
    /// Frame height
    pub height: u32,
    /// Capture timestamp (nanoseconds)
    pub timestamp_ns: u64,
    /// Frame sequence number
    pub sequence: u32,
}

impl VideoFrame {
    /// Create a new video frame from raw RGB data
    pub fn new(
        data: Vec<u8>,
        width: u32,
        height: u32,
        timestamp_ns: u64,
        sequence: u32,
    ) -> Result<Self, FrameError> {
        if width == 0 || height == 0 {
            return Err(FrameError::Dimensions { width, height });
        }
        let expected = width as usize * height as usize * 3;
        if data.len() != expected {
            return Err(FrameError::BufferSize {
                expected,
                actual: data.len(),
            });
        }

        Ok(Self {
            data: data.into(),
            width,
            height,
            timestamp_ns,
            sequence,
        })
    }

    /// Black frame, used when a replay carries landmarks but no image
    pub fn blank(width: u32, height: u32, timestamp_ns: u64, sequence: u32) -> Result<Self, FrameError> {
        let len = width as usize * height as usize * 3;
        Self::new(vec![0; len], width, height, timestamp_ns, sequence)
    }

    /// Wrap an `image` RGB buffer
    pub fn from_rgb_image(img: RgbImage, timestamp_ns: u64, sequence: u32) -> Result<Self, FrameError> {
        let (width, height) = img.dimensions();
        Self::new(img.into_raw(), width, height, timestamp_ns, sequence)
    }

    /// Decode an image file from disk
    pub fn open<P: AsRef<Path>>(path: P, timestamp_ns: u64, sequence: u32) -> Result<Self, FrameError> {
        let path = path.as_ref();
        debug!("Loading frame {} from {}", sequence, path.display());
        let img = image::open(path)?.to_rgb8();
        Self::from_rgb_image(img, timestamp_ns, sequence)
    }

    /// Whether both frames share the same pixel buffer
    pub fn same_buffer(&self, other: &VideoFrame) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Copy out into an owned `image` buffer for drawing
    pub fn to_rgb_image(&self) -> Result<RgbImage, FrameError> {
        RgbImage::from_raw(self.width, self.height, self.data.to_vec()).ok_or(FrameError::BufferSize {
            expected: self.width as usize * self.height as usize * 3,
            actual: self.data.len(),
        })
    }

    /// Resize to the given canvas; returns a clone when already that size
    pub fn resize(&self, new_width: u32, new_height: u32) -> Result<VideoFrame, FrameError> {
        if new_width == self.width && new_height == self.height {
            return Ok(self.clone());
        }
        if new_width == 0 || new_height == 0 {
            return Err(FrameError::Dimensions {
                width: new_width,
                height: new_height,
            });
        }

        let img = self.to_rgb_image()?;
        let resized = imageops::resize(&img, new_width, new_height, imageops::FilterType::Triangle);
        Self::from_rgb_image(resized, self.timestamp_ns, self.sequence)
    }
}
