//! Empirical quantiles for Q-Q and CDF plots, and box-plot data preparation

use std::f64::consts::SQRT_2;

use serde::Serialize;
use statrs::function::erf::erfc_inv;
use statrs::statistics::Statistics;

use pgf_data::{quantile_sorted, DataError, Frame, Result, Series};

/// Paired quantiles for a normal Q-Q plot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QqPoints {
    /// Standard-normal quantiles at `(i - 0.5) / n`
    pub theoretical: Vec<f64>,
    /// Observed values sorted ascending
    pub sample: Vec<f64>,
    /// `(min, max)` over both sequences, for the identity reference line
    pub reference: (f64, f64),
}

impl QqPoints {
    pub fn len(&self) -> usize {
        self.sample.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sample.is_empty()
    }

    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.theoretical.iter().copied().zip(self.sample.iter().copied())
    }
}

/// Inverse CDF of the standard normal distribution
fn probit(p: f64) -> f64 {
    -SQRT_2 * erfc_inv(2.0 * p)
}

/// Sample quantiles against standard-normal quantiles
pub fn qq_points(series: &Series) -> Result<QqPoints> {
    let sample = series.sorted_values()?;
    if sample.is_empty() {
        return Err(DataError::EmptyInput("qq_plot"));
    }

    let n = sample.len() as f64;
    let theoretical: Vec<f64> = (1..=sample.len())
        .map(|i| probit((i as f64 - 0.5) / n))
        .collect();

    let lo = theoretical[0].min(sample[0]);
    let hi = theoretical[theoretical.len() - 1].max(sample[sample.len() - 1]);

    Ok(QqPoints {
        theoretical,
        sample,
        reference: (lo, hi),
    })
}

/// Empirical CDF as `(value, i / n)` pairs over the sorted values
///
/// The final probability is exactly 1.0.
pub fn ecdf(series: &Series) -> Result<Vec<(f64, f64)>> {
    let sorted = series.sorted_values()?;
    if sorted.is_empty() {
        return Err(DataError::EmptyInput("cdf_plot"));
    }

    let n = sorted.len() as f64;
    Ok(sorted
        .into_iter()
        .enumerate()
        .map(|(i, v)| (v, (i + 1) as f64 / n))
        .collect())
}

/// Labelled groups of observations for a box-and-whisker chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxGroups {
    pub labels: Vec<String>,
    pub groups: Vec<Vec<f64>>,
}

/// Collect box-plot groups from a frame
///
/// Without `by`, each numeric value column is one group. With `by`, each
/// distinct non-missing value of that column is one group holding the
/// row-major flattened observations of every value column. `columns`
/// defaults to every numeric column other than `by`; an explicit list is
/// checked for existence and then narrowed to its numeric members.
pub fn box_plot_groups(frame: &Frame, columns: Option<&[&str]>, by: Option<&str>) -> Result<BoxGroups> {
    if let Some(by) = by {
        frame.column(by)?;
    }

    let candidates: Vec<&Series> = match columns {
        Some(names) => names
            .iter()
            .map(|name| frame.column(name))
            .collect::<Result<_>>()?,
        None => frame
            .columns()
            .iter()
            .filter(|s| Some(s.name()) != by)
            .collect(),
    };

    let value_columns: Vec<&Series> = candidates.into_iter().filter(|s| s.is_numeric()).collect();
    if value_columns.is_empty() {
        return Err(DataError::NoNumericColumns);
    }

    let (labels, groups) = match by {
        None => {
            let mut labels = Vec::with_capacity(value_columns.len());
            let mut groups = Vec::with_capacity(value_columns.len());
            for series in &value_columns {
                labels.push(series.name().to_string());
                groups.push(series.numeric_values()?);
            }
            (labels, groups)
        }
        Some(by) => {
            let mut labels = Vec::new();
            let mut groups = Vec::new();
            for (key, rows) in frame.group_rows(by)? {
                let values: Vec<f64> = rows
                    .iter()
                    .flat_map(|&row| value_columns.iter().filter_map(move |s| s.cells()[row].as_f64()))
                    .filter(|v| !v.is_nan())
                    .collect();
                labels.push(key.to_string());
                groups.push(values);
            }
            (labels, groups)
        }
    };

    if groups.iter().all(Vec::is_empty) {
        return Err(DataError::EmptyGroups);
    }

    tracing::debug!(
        "Box plot groups: {} groups over {} value columns",
        groups.len(),
        value_columns.len()
    );
    Ok(BoxGroups { labels, groups })
}

/// Five-number summary with Tukey whiskers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub mean: f64,
    /// Smallest observation inside the lower fence
    pub whisker_low: f64,
    /// Largest observation inside the upper fence
    pub whisker_high: f64,
    pub outliers: Vec<f64>,
}

/// Summarize one group for a box-and-whisker chart, fences at 1.5 IQR
pub fn box_summary(values: &[f64]) -> Result<BoxSummary> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if sorted.is_empty() {
        return Err(DataError::EmptyInput("box_summary"));
    }
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile_sorted(&sorted, 0.25);
    let median = quantile_sorted(&sorted, 0.5);
    let q3 = quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    let lower_fence = q1 - 1.5 * iqr;
    let upper_fence = q3 + 1.5 * iqr;

    let mut inside = sorted
        .iter()
        .copied()
        .filter(|&v| v >= lower_fence && v <= upper_fence);
    let whisker_low = inside.next().unwrap_or(q1);
    let whisker_high = inside.last().unwrap_or(whisker_low);

    Ok(BoxSummary {
        min: sorted[0],
        q1,
        median,
        q3,
        max: sorted[sorted.len() - 1],
        mean: sorted.iter().mean(),
        whisker_low,
        whisker_high,
        outliers: sorted
            .iter()
            .copied()
            .filter(|&v| v < lower_fence || v > upper_fence)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pgf_data::Cell;

    #[test]
    fn test_probit_reference_values() {
        assert!(probit(0.5).abs() < 1e-9);
        assert!((probit(0.975) - 1.959_963_984_540_054).abs() < 1e-9);
        assert!((probit(0.1) + 1.281_551_565_544_6).abs() < 1e-9);
    }

    #[test]
    fn test_qq_points_pairs_and_bounds() {
        let series = Series::from_values("s", [Some(3.0), None, Some(1.0), Some(5.0), Some(2.0), Some(4.0)]);
        let qq = qq_points(&series).unwrap();

        assert_eq!(qq.len(), 5);
        assert_eq!(qq.theoretical.len(), qq.sample.len());
        assert_eq!(qq.sample, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!(qq.theoretical.windows(2).all(|w| w[0] < w[1]));
        assert!(qq.theoretical[2].abs() < 1e-9);

        let (lo, hi) = qq.reference;
        assert!(qq.pairs().all(|(t, s)| t >= lo && t <= hi && s >= lo && s <= hi));
        assert_eq!(hi, 5.0);
        assert!((lo - qq.theoretical[0]).abs() < 1e-12);
    }

    #[test]
    fn test_qq_points_rejects_empty_input() {
        let series = Series::from_values("s", [None::<f64>, None]);
        assert!(matches!(qq_points(&series), Err(DataError::EmptyInput(_))));
    }

    #[test]
    fn test_ecdf_steps() {
        let series = Series::from_values("numbers", [3.0, 1.0, 4.0, 1.0]);
        let points = ecdf(&series).unwrap();
        assert_eq!(points.first().unwrap().0, 1.0);
        assert_eq!(points.last().unwrap().1, 1.0);
        assert!(points.windows(2).all(|w| w[0].1 <= w[1].1 && w[0].0 <= w[1].0));
        assert_eq!(points[1], (1.0, 0.5));
    }

    #[test]
    fn test_ecdf_last_probability_exact() {
        for n in 1..50 {
            let series = Series::from_values("s", (0..n).map(|i| f64::from(i) * 0.37));
            assert_eq!(ecdf(&series).unwrap().last().unwrap().1, 1.0);
        }
        assert!(ecdf(&Series::new("s", Vec::new())).is_err());
    }

    fn frame() -> Frame {
        Frame::from_columns(vec![
            Series::from_values("a", [Some(1.0), Some(2.0), None, Some(4.0)]),
            Series::from_values("b", [10.0, 20.0, 30.0, 40.0]),
            Series::from_values("segment", ["y", "x", "y", "x"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_box_groups_ungrouped_defaults_to_numeric() {
        let groups = box_plot_groups(&frame(), None, None).unwrap();
        assert_eq!(groups.labels, vec!["a", "b"]);
        assert_eq!(groups.groups[0], vec![1.0, 2.0, 4.0]);
        assert_eq!(groups.groups[1], vec![10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_box_groups_by_segment() {
        let groups = box_plot_groups(&frame(), None, Some("segment")).unwrap();
        assert_eq!(groups.labels, vec!["x", "y"]);
        assert_eq!(groups.groups[0], vec![2.0, 20.0, 4.0, 40.0]);
        assert_eq!(groups.groups[1], vec![1.0, 10.0, 30.0]);

        let only_a = box_plot_groups(&frame(), Some(&["a", "segment"][..]), Some("segment")).unwrap();
        assert_eq!(only_a.groups[1], vec![1.0]);
    }

    #[test]
    fn test_box_groups_validation() {
        let f = frame();
        assert!(matches!(
            box_plot_groups(&f, Some(&["missing"][..]), None),
            Err(DataError::ColumnNotFound(_))
        ));
        assert!(matches!(
            box_plot_groups(&f, None, Some("nope")),
            Err(DataError::ColumnNotFound(_))
        ));
        assert!(matches!(
            box_plot_groups(&f, Some(&["segment"][..]), None),
            Err(DataError::NoNumericColumns)
        ));

        let empty = Frame::from_columns(vec![
            Series::new("v", vec![Cell::Missing, Cell::Missing]),
            Series::from_values("g", ["p", "q"]),
        ])
        .unwrap();
        assert!(matches!(box_plot_groups(&empty, None, Some("g")), Err(DataError::EmptyGroups)));
        assert!(matches!(box_plot_groups(&empty, None, None), Err(DataError::EmptyGroups)));
    }

    #[test]
    fn test_box_summary_whiskers_and_outliers() {
        let summary = box_summary(&[1.0, 2.0, 3.0, 4.0, 5.0, 100.0]).unwrap();
        assert_eq!(summary.q1, 2.25);
        assert_eq!(summary.median, 3.5);
        assert_eq!(summary.q3, 4.75);
        assert_eq!(summary.whisker_low, 1.0);
        assert_eq!(summary.whisker_high, 5.0);
        assert_eq!(summary.outliers, vec![100.0]);
        assert_eq!(summary.max, 100.0);
        assert!((summary.mean - 115.0 / 6.0).abs() < 1e-12);
        assert!(box_summary(&[]).is_err());
    }
}
