//! Drawing-surface abstraction the plot builders draw into

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{RenderError, Result};

/// Point marker for scatter series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Marker {
    #[default]
    Circle,
    Cross,
    Triangle,
}

impl FromStr for Marker {
    type Err = RenderError;

    /// Accepts the single-character marker codes `o`, `x`, `^` or the full names
    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "o" | "circle" => Ok(Marker::Circle),
            "x" | "cross" => Ok(Marker::Cross),
            "^" | "triangle" => Ok(Marker::Triangle),
            other => Err(RenderError::InvalidMarker(other.to_string())),
        }
    }
}

/// Stroke pattern for line series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

/// A drawing surface
///
/// Methods mirror the primitives the plot builders need. Implementations
/// decide how (or whether) anything is rendered.
pub trait Axes {
    /// Scatter of `(x, y)` pairs
    fn scatter(&mut self, points: &[(f64, f64)], marker: Marker, label: Option<&str>);

    /// Polyline through `(x, y)` pairs, `color` overrides the default series color
    fn line(&mut self, points: &[(f64, f64)], style: LineStyle, color: Option<[u8; 3]>, label: Option<&str>);

    /// Post-step function: each y holds until the next x
    fn step(&mut self, points: &[(f64, f64)], label: Option<&str>);

    /// Histogram of raw samples split into `bins` equal-width bars
    fn hist(&mut self, samples: &[f64], bins: usize) -> Result<()>;

    /// Box-and-whisker chart, one box per group
    fn boxplot(&mut self, groups: &[Vec<f64>], labels: &[String]) -> Result<()>;

    fn set_title(&mut self, title: &str);

    fn set_xlabel(&mut self, label: &str);

    fn set_ylabel(&mut self, label: &str);

    /// Show a legend for every labelled series
    fn legend(&mut self);
}
