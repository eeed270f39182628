//! Rendering options

use serde::{Deserialize, Serialize};

/// Size, colors and grid settings used when a figure is rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotStyle {
    /// Output width in pixels
    pub width: u32,

    /// Output height in pixels
    pub height: u32,

    /// Margin around the chart area
    pub margin: u32,

    pub title_font_size: u32,

    /// Scatter marker radius
    pub marker_size: u32,

    /// Color of scatter points and lines without an explicit color
    pub data_color: [u8; 3],

    /// Histogram bar and box fill color
    pub bar_color: [u8; 3],

    /// Whether to draw grid lines
    pub show_grid: bool,
}

impl Default for PlotStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            margin: 20,
            title_font_size: 28,
            marker_size: 3,
            data_color: [31, 119, 180],
            bar_color: [92, 140, 97],
            show_grid: true,
        }
    }
}
