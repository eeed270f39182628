//! Plot builders
//!
//! Each builder validates its input and computes the plotted series before
//! touching the surface, so a failed call leaves a passed-in surface as it was.

use pgf_data::{Frame, Series};
use pgf_stats::{box_plot_groups, ecdf, qq_points, Bins};

use crate::axes::{Axes, LineStyle, Marker};
use crate::Result;

const REFERENCE_COLOR: [u8; 3] = [214, 39, 40];

/// Normal Q-Q plot of `series` with an identity reference line
pub fn qq_plot<A>(series: &Series, ax: Option<A>, marker: Marker) -> Result<A>
where
    A: Axes + Default,
{
    let qq = qq_points(series)?;
    let points: Vec<(f64, f64)> = qq.pairs().collect();
    let (lo, hi) = qq.reference;

    let mut ax = ax.unwrap_or_default();
    ax.scatter(&points, marker, Some("Data"));
    ax.line(&[(lo, lo), (hi, hi)], LineStyle::Dashed, Some(REFERENCE_COLOR), Some("Ideal normal"));
    ax.set_title("Normal Q-Q Plot");
    ax.set_xlabel("Theoretical Quantiles");
    ax.set_ylabel("Sample Quantiles");
    ax.legend();

    tracing::debug!("Q-Q plot of '{}' with {} points", series.name(), qq.len());
    Ok(ax)
}

/// Histogram of the non-missing values of `series`
///
/// `bins` is a positive count or a [`pgf_stats::BinStrategy`] resolved
/// against the data.
pub fn histogram_plot<A>(series: &Series, bins: impl Into<Bins>, ax: Option<A>) -> Result<A>
where
    A: Axes + Default,
{
    let bins = bins.into();
    let values = series.numeric_values()?;
    let count = bins.resolve(&values)?;

    let mut ax = ax.unwrap_or_default();
    ax.hist(&values, count)?;
    ax.set_title("Histogram");
    ax.set_xlabel(series.name());
    ax.set_ylabel("Frequency");

    tracing::debug!("Histogram of '{}' with {} bins ({:?})", series.name(), count, bins);
    Ok(ax)
}

/// Empirical CDF step plot, labelled with `label` or the series name
pub fn cdf_plot<A>(series: &Series, ax: Option<A>, label: Option<&str>) -> Result<A>
where
    A: Axes + Default,
{
    let points = ecdf(series)?;

    let mut ax = ax.unwrap_or_default();
    ax.step(&points, Some(label.unwrap_or(series.name())));
    ax.set_title("Empirical CDF");
    ax.set_xlabel(series.name());
    ax.set_ylabel("Cumulative Probability");
    ax.legend();
    Ok(ax)
}

/// Box-and-whisker chart of `columns`, optionally grouped by `by`
pub fn box_plot<A>(frame: &Frame, columns: Option<&[&str]>, by: Option<&str>, ax: Option<A>) -> Result<A>
where
    A: Axes + Default,
{
    let groups = box_plot_groups(frame, columns, by)?;

    let mut ax = ax.unwrap_or_default();
    ax.boxplot(&groups.groups, &groups.labels)?;
    match by {
        Some(by) => {
            ax.set_title(&format!("Box Plot by {by}"));
            ax.set_xlabel(by);
        }
        None => ax.set_title("Box Plot"),
    }
    Ok(ax)
}
