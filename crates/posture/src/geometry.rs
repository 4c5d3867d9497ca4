//! Angle and tilt computations over canvas points

use serde::{Deserialize, Serialize};

use crate::PostureError;

/// Rays shorter than this (in pixels) have no usable direction
const MIN_RAY_LENGTH: f64 = 1e-9;

/// Rays whose normalized cross product is within this are collinear
const COLLINEAR_TOLERANCE: f64 = 1e-12;

/// A position on the rendering canvas, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Target rendering surface dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scale a normalized `[0, 1]` coordinate pair into canvas pixels
    pub fn scale(&self, x: f64, y: f64) -> Point {
        Point::new(x * self.width as f64, y * self.height as f64)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(640, 480)
    }
}

/// Angle in degrees at vertex `b` between rays `b->a` and `b->c`, in `[0, 180]`.
///
/// Collinear rays give exactly `180` (opposite) or `0` (same direction); otherwise
/// the cosine is clamped to `[-1, 1]` before `acos`. A zero-length ray yields
/// [`PostureError::DegenerateGeometry`].
pub fn angle_at(a: Point, b: Point, c: Point) -> Result<f64, PostureError> {
    let (bax, bay) = (a.x - b.x, a.y - b.y);
    let (bcx, bcy) = (c.x - b.x, c.y - b.y);

    let mag_ba = bax.hypot(bay);
    let mag_bc = bcx.hypot(bcy);

    // Negated so NaN magnitudes fall through to the error as well
    if !(mag_ba > MIN_RAY_LENGTH && mag_bc > MIN_RAY_LENGTH) {
        return Err(PostureError::DegenerateGeometry { operation: "angle_at" });
    }

    let dot = bax * bcx + bay * bcy;
    let cross = bax * bcy - bay * bcx;
    if cross.abs() <= COLLINEAR_TOLERANCE * mag_ba * mag_bc {
        return Ok(if dot < 0.0 { 180.0 } else { 0.0 });
    }

    let cos = (dot / (mag_ba * mag_bc)).clamp(-1.0, 1.0);
    Ok(cos.acos().to_degrees())
}

/// Tilt in degrees of the line through `p` and `q` relative to horizontal.
///
/// Measured with `atan2(dy, |dx|)`, so the result lies in `[-90, 90]`, does not
/// depend on which side of the image `p` is on, and `tilt_angle(q, p)` is
/// exactly `-tilt_angle(p, q)`. This departs from a signed `atan2(dy, dx)`
/// on purpose: the signed form reads about 180 for a level line traversed
/// right to left. Coincident points are degenerate.
pub fn tilt_angle(p: Point, q: Point) -> Result<f64, PostureError> {
    let dx = q.x - p.x;
    let dy = q.y - p.y;

    if !(dx.hypot(dy) > MIN_RAY_LENGTH) {
        return Err(PostureError::DegenerateGeometry { operation: "tilt_angle" });
    }

    Ok(dy.atan2(dx.abs()).to_degrees())
}
