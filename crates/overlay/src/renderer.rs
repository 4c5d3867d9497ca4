//! Overlay renderer and PNG sink

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_filled_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use posture::{AnalysisResult, Canvas, Color, Point, RenderOutput, RenderSink};
use tracing::{debug, info};

use crate::OverlayError;

/// Half-width of line strokes (pixels)
const STROKE_HALF_WIDTH: i32 = 1;
/// Radius of joint markers (pixels)
const JOINT_RADIUS: i32 = 4;
/// Side of the square drawn beside each text line (pixels)
const SWATCH_SIZE: u32 = 14;
/// Gap between a swatch and its text position (pixels)
const SWATCH_GAP: i32 = 4;

fn rgb(color: Color) -> Rgb<u8> {
    Rgb(color.to_array())
}

fn to_pixel(p: Point) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

/// Composes background and analysis into one canvas-sized image
pub struct OverlayRenderer {
    canvas: Canvas,
}

impl OverlayRenderer {
    pub fn new(canvas: Canvas) -> Self {
        Self { canvas }
    }

    /// Background scaled to the canvas with the analysis drawn on top
    pub fn compose(&self, output: &RenderOutput) -> Result<RgbImage, OverlayError> {
        let background = output
            .background
            .resize(self.canvas.width, self.canvas.height)?;
        let mut img = background.to_rgb_image()?;
        self.draw(&mut img, &output.analysis);
        Ok(img)
    }

    /// Draw segments, joints and annotation swatches in result order.
    ///
    /// Glyphs are not rasterized. Each text line is marked by a swatch in its
    /// severity color at the line's position; the text itself is available
    /// from [`posture::TextAnnotation::text`] for the reporting side.
    pub fn draw(&self, img: &mut RgbImage, analysis: &AnalysisResult) {
        for segment in &analysis.segments {
            let color = rgb(segment.color);
            for pair in segment.points.windows(2) {
                self.stroke(img, pair[0], pair[1], color);
            }
            for point in &segment.points {
                draw_filled_circle_mut(
                    img,
                    (point.x.round() as i32, point.y.round() as i32),
                    JOINT_RADIUS,
                    rgb(Color::WHITE),
                );
            }
        }

        for annotation in &analysis.annotations {
            // Text baseline sits at the annotation position; the swatch ends on it
            let x = annotation.position.x.round() as i32 - SWATCH_SIZE as i32 - SWATCH_GAP;
            let y = annotation.position.y.round() as i32 - SWATCH_SIZE as i32;
            draw_filled_rect_mut(
                img,
                Rect::at(x, y).of_size(SWATCH_SIZE, SWATCH_SIZE),
                rgb(annotation.color),
            );
            debug!("Overlay text at ({}, {}): {}", annotation.position.x, annotation.position.y, annotation.text());
        }
    }

    fn stroke(&self, img: &mut RgbImage, from: Point, to: Point, color: Rgb<u8>) {
        let (x0, y0) = to_pixel(from);
        let (x1, y1) = to_pixel(to);
        for offset in -STROKE_HALF_WIDTH..=STROKE_HALF_WIDTH {
            let o = offset as f32;
            draw_line_segment_mut(img, (x0 + o, y0), (x1 + o, y1), color);
            draw_line_segment_mut(img, (x0, y0 + o), (x1, y1 + o), color);
        }
    }
}

/// Writes each composed frame as `frame_<sequence>.png` into a directory
pub struct PngSink {
    renderer: OverlayRenderer,
    dir: PathBuf,
}

impl PngSink {
    pub fn new(renderer: OverlayRenderer, dir: impl AsRef<Path>) -> Result<Self, OverlayError> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| OverlayError::Write {
            path: dir.display().to_string(),
            reason: e.to_string(),
        })?;
        info!("Writing overlays to {}", dir.display());
        Ok(Self { renderer, dir })
    }
}

impl RenderSink for PngSink {
    type Error = OverlayError;

    fn render(&mut self, output: &RenderOutput) -> Result<(), OverlayError> {
        let img = self.renderer.compose(output)?;
        let path = self.dir.join(format!("frame_{:06}.png", output.sequence));
        img.save(&path).map_err(|e| OverlayError::Write {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}
