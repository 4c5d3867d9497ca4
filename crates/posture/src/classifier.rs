//! Threshold-based classification of posture metrics

use serde::{Deserialize, Serialize};

/// How far a metric deviates from normal
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Ok,
    Warning,
    Bad,
}

impl Severity {
    /// Display color for this severity
    pub fn color(self) -> Color {
        match self {
            Severity::Ok => Color::GREEN,
            Severity::Warning => Color::YELLOW,
            Severity::Bad => Color::RED,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ok => "ok",
            Severity::Warning => "warning",
            Severity::Bad => "bad",
        }
    }
}

/// RGB display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const GREEN: Color = Color::new(0, 200, 0);
    pub const YELLOW: Color = Color::new(255, 220, 0);
    pub const RED: Color = Color::new(230, 0, 0);
    pub const WHITE: Color = Color::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// One guard condition of a threshold set
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Matches when the metric is strictly greater
    Above(f64),
    /// Matches when the metric is strictly less
    Below(f64),
}

impl Bound {
    pub fn matches(&self, metric: f64) -> bool {
        match *self {
            Bound::Above(limit) => metric > limit,
            Bound::Below(limit) => metric < limit,
        }
    }
}

/// Status label and severity assigned to a metric
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub label: &'static str,
    pub severity: Severity,
}

impl Classification {
    pub const OK: Classification = Classification {
        label: "OK",
        severity: Severity::Ok,
    };

    /// Metric could not be computed (coincident landmarks)
    pub const UNDEFINED: Classification = Classification {
        label: "Undefined",
        severity: Severity::Warning,
    };
}

/// A guard with the classification it produces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdRule {
    pub bound: Bound,
    pub label: &'static str,
    pub severity: Severity,
}

impl ThresholdRule {
    pub const fn above(limit: f64, label: &'static str, severity: Severity) -> Self {
        Self {
            bound: Bound::Above(limit),
            label,
            severity,
        }
    }

    pub const fn below(limit: f64, label: &'static str, severity: Severity) -> Self {
        Self {
            bound: Bound::Below(limit),
            label,
            severity,
        }
    }
}

/// Ordered rules for one metric; the first matching rule wins
#[derive(Debug, Clone, Copy)]
pub struct ThresholdSet {
    pub rules: &'static [ThresholdRule],
    pub otherwise: Classification,
}

/// Classify a metric against an ordered threshold set
pub fn classify(metric: f64, set: &ThresholdSet) -> Classification {
    set.rules
        .iter()
        .find(|rule| rule.bound.matches(metric))
        .map(|rule| Classification {
            label: rule.label,
            severity: rule.severity,
        })
        .unwrap_or(set.otherwise)
}
