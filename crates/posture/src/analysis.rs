//! Per-frame analysis results handed to the rendering side

use serde::Serialize;
use tracing::warn;

use crate::classifier::{Classification, Color, Severity};
use crate::geometry::Point;
use crate::pipeline::ViewMode;

/// Left margin of the text block (pixels)
pub const TEXT_ORIGIN_X: f64 = 20.0;
/// Baseline of the first text line (pixels)
pub const TEXT_ORIGIN_Y: f64 = 30.0;
/// Vertical distance between text lines (pixels)
pub const LINE_HEIGHT: f64 = 25.0;

/// A polyline overlay colored by severity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSegment {
    /// At least two points
    pub points: Vec<Point>,
    pub severity: Severity,
    pub color: Color,
}

/// A text overlay at a fixed screen position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextAnnotation {
    pub label: String,
    /// Formatted metric or status text
    pub value: String,
    /// Status label shown next to the value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    pub position: Point,
    pub severity: Severity,
    pub color: Color,
}

impl TextAnnotation {
    /// Single line of display text
    pub fn text(&self) -> String {
        match &self.status {
            Some(status) => format!("{}: {} ({})", self.label, self.value, status),
            None => format!("{}: {}", self.label, self.value),
        }
    }
}

/// Complete analysis output for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// View mode the frame was analyzed in
    pub mode: ViewMode,
    pub segments: Vec<LineSegment>,
    pub annotations: Vec<TextAnnotation>,
}

impl AnalysisResult {
    /// Worst severity across all annotations
    pub fn overall_severity(&self) -> Option<Severity> {
        self.annotations.iter().map(|a| a.severity).max()
    }

    /// Check if any check came out BAD
    pub fn has_bad(&self) -> bool {
        self.overall_severity() == Some(Severity::Bad)
    }

    /// First annotation with the given label
    pub fn annotation(&self, label: &str) -> Option<&TextAnnotation> {
        self.annotations.iter().find(|a| a.label == label)
    }
}

/// Accumulates overlays for one frame; text lines stack top to bottom
pub struct AnalysisBuilder {
    mode: ViewMode,
    segments: Vec<LineSegment>,
    annotations: Vec<TextAnnotation>,
    next_line_y: f64,
}

impl AnalysisBuilder {
    pub fn new(mode: ViewMode) -> Self {
        Self {
            mode,
            segments: Vec::new(),
            annotations: Vec::new(),
            next_line_y: TEXT_ORIGIN_Y,
        }
    }

    /// Add a polyline; fewer than two points is dropped
    pub fn segment<I>(mut self, points: I, severity: Severity) -> Self
    where
        I: IntoIterator<Item = Point>,
    {
        let points: Vec<Point> = points.into_iter().collect();
        if points.len() < 2 {
            warn!("Dropping line segment with {} point(s)", points.len());
            return self;
        }

        self.segments.push(LineSegment {
            points,
            severity,
            color: severity.color(),
        });
        self
    }

    /// Add a text line at the next free position
    pub fn annotation(
        mut self,
        label: impl Into<String>,
        value: impl Into<String>,
        status: Option<&str>,
        severity: Severity,
    ) -> Self {
        self.annotations.push(TextAnnotation {
            label: label.into(),
            value: value.into(),
            status: status.map(str::to_string),
            position: Point::new(TEXT_ORIGIN_X, self.next_line_y),
            severity,
            color: severity.color(),
        });
        self.next_line_y += LINE_HEIGHT;
        self
    }

    /// Metric line with its classification as status
    pub fn metric(
        self,
        label: &str,
        value: Option<f64>,
        decimals: usize,
        classification: Classification,
    ) -> Self {
        self.annotation(
            label,
            format_metric(value, decimals),
            Some(classification.label),
            classification.severity,
        )
    }

    pub fn build(self) -> AnalysisResult {
        AnalysisResult {
            mode: self.mode,
            segments: self.segments,
            annotations: self.annotations,
        }
    }
}

/// Format a metric with fixed decimals; undefined metrics render as `--`
pub fn format_metric(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) if v.is_finite() => {
            if decimals == 0 {
                // Half away from zero, not the formatter's half-to-even
                format!("{:.0}", v.round())
            } else {
                format!("{:.*}", decimals, v)
            }
        }
        _ => "--".to_string(),
    }
}
