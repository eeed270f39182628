//! Plot builders and drawing surfaces
//!
//! Plot builders compute their series with `pgf-stats` and feed them to any
//! [`Axes`] implementation. [`Figure`] records what was drawn and, with the
//! `svg` feature, renders it through `plotters`.

pub mod axes;
pub mod config;
pub mod figure;
pub mod plots;
#[cfg(feature = "svg")]
mod svg;

use pgf_data::DataError;
use thiserror::Error;

// Re-exports
pub use axes::{Axes, LineStyle, Marker};
pub use config::PlotStyle;
pub use figure::{Artist, Figure};
pub use plots::{box_plot, cdf_plot, histogram_plot, qq_plot};

/// Errors that can occur while building or rendering a plot
#[derive(Error, Debug)]
pub enum RenderError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error("unknown marker '{0}'")]
    InvalidMarker(String),

    #[error("unsupported: {0}")]
    Unsupported(&'static str),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),
}

pub type Result<T> = std::result::Result<T, RenderError>;
