//! In-memory drawing surface that records every artist drawn on it

use serde::Serialize;

use pgf_stats::{box_summary, histogram, BoxSummary, HistogramBin};

use crate::axes::{Axes, LineStyle, Marker};
use crate::config::PlotStyle;
use crate::Result;

/// Something drawn on a [`Figure`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Artist {
    Scatter {
        points: Vec<(f64, f64)>,
        marker: Marker,
        label: Option<String>,
    },
    Line {
        points: Vec<(f64, f64)>,
        style: LineStyle,
        color: Option<[u8; 3]>,
        label: Option<String>,
    },
    Step {
        points: Vec<(f64, f64)>,
        label: Option<String>,
    },
    /// One histogram bar
    Bar(HistogramBin),
    /// One box, centred on `position` (1-based)
    Box {
        position: f64,
        label: String,
        summary: BoxSummary,
    },
}

impl Artist {
    pub fn label(&self) -> Option<&str> {
        match self {
            Artist::Scatter { label, .. } | Artist::Line { label, .. } | Artist::Step { label, .. } => {
                label.as_deref()
            }
            Artist::Bar(_) => None,
            Artist::Box { label, .. } => Some(label),
        }
    }

    /// Data points of point-based artists, empty for bars and boxes
    pub fn points(&self) -> &[(f64, f64)] {
        match self {
            Artist::Scatter { points, .. } | Artist::Line { points, .. } | Artist::Step { points, .. } => points,
            Artist::Bar(_) | Artist::Box { .. } => &[],
        }
    }
}

/// Recording [`Axes`] implementation
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Figure {
    title: String,
    xlabel: String,
    ylabel: String,
    legend: bool,
    tick_labels: Vec<String>,
    artists: Vec<Artist>,
}

impl Figure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn xlabel(&self) -> &str {
        &self.xlabel
    }

    pub fn ylabel(&self) -> &str {
        &self.ylabel
    }

    pub fn has_legend(&self) -> bool {
        self.legend
    }

    /// Categorical x tick labels set by a box plot
    pub fn tick_labels(&self) -> &[String] {
        &self.tick_labels
    }

    pub fn artists(&self) -> &[Artist] {
        &self.artists
    }

    /// Scatter collections
    pub fn collections(&self) -> impl Iterator<Item = &Artist> {
        self.artists
            .iter()
            .filter(|a| matches!(a, Artist::Scatter { .. }))
    }

    /// Lines and step functions
    pub fn lines(&self) -> impl Iterator<Item = &Artist> {
        self.artists
            .iter()
            .filter(|a| matches!(a, Artist::Line { .. } | Artist::Step { .. }))
    }

    /// Histogram bars
    pub fn patches(&self) -> impl Iterator<Item = &HistogramBin> {
        self.artists.iter().filter_map(|a| match a {
            Artist::Bar(bin) => Some(bin),
            _ => None,
        })
    }

    /// Box-plot boxes
    pub fn boxes(&self) -> impl Iterator<Item = (&str, &BoxSummary)> {
        self.artists.iter().filter_map(|a| match a {
            Artist::Box { label, summary, .. } => Some((label.as_str(), summary)),
            _ => None,
        })
    }

    /// Render the recorded artists as an SVG document
    #[cfg(feature = "svg")]
    pub fn render_svg(&self, style: &PlotStyle) -> Result<String> {
        crate::svg::render(self, style)
    }

    /// Render the recorded artists as an SVG document
    ///
    /// Always fails: this build has no rendering backend.
    #[cfg(not(feature = "svg"))]
    pub fn render_svg(&self, _style: &PlotStyle) -> Result<String> {
        Err(crate::RenderError::Unsupported(
            "SVG rendering requires the `svg` feature of pgf-render",
        ))
    }
}

impl Axes for Figure {
    fn scatter(&mut self, points: &[(f64, f64)], marker: Marker, label: Option<&str>) {
        self.artists.push(Artist::Scatter {
            points: points.to_vec(),
            marker,
            label: label.map(String::from),
        });
    }

    fn line(&mut self, points: &[(f64, f64)], style: LineStyle, color: Option<[u8; 3]>, label: Option<&str>) {
        self.artists.push(Artist::Line {
            points: points.to_vec(),
            style,
            color,
            label: label.map(String::from),
        });
    }

    fn step(&mut self, points: &[(f64, f64)], label: Option<&str>) {
        self.artists.push(Artist::Step {
            points: points.to_vec(),
            label: label.map(String::from),
        });
    }

    fn hist(&mut self, samples: &[f64], bins: usize) -> Result<()> {
        let bars = histogram(samples, bins)?;
        self.artists.extend(bars.into_iter().map(Artist::Bar));
        Ok(())
    }

    fn boxplot(&mut self, groups: &[Vec<f64>], labels: &[String]) -> Result<()> {
        for (i, (values, label)) in groups.iter().zip(labels).enumerate() {
            if values.is_empty() {
                tracing::warn!("Skipping empty box plot group '{}'", label);
                continue;
            }
            self.artists.push(Artist::Box {
                position: (i + 1) as f64,
                label: label.clone(),
                summary: box_summary(values)?,
            });
        }
        self.tick_labels = labels.to_vec();
        Ok(())
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_xlabel(&mut self, label: &str) {
        self.xlabel = label.to_string();
    }

    fn set_ylabel(&mut self, label: &str) {
        self.ylabel = label.to_string();
    }

    fn legend(&mut self) {
        self.legend = true;
    }
}
