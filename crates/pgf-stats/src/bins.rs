//! Histogram bin-count rules and equal-width binning

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use pgf_data::{quantile_sorted, DataError, Result, Series};

/// Rule used to pick a number of bins from the data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinStrategy {
    SquareRoot,
    Sturges,
    Scott,
    FreedmanDiaconis,
}

impl BinStrategy {
    pub const ALL: [BinStrategy; 4] = [
        BinStrategy::SquareRoot,
        BinStrategy::Sturges,
        BinStrategy::Scott,
        BinStrategy::FreedmanDiaconis,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BinStrategy::SquareRoot => "square_root",
            BinStrategy::Sturges => "sturges",
            BinStrategy::Scott => "scott",
            BinStrategy::FreedmanDiaconis => "freedman_diaconis",
        }
    }
}

impl fmt::Display for BinStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BinStrategy {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqrt" | "square_root" => Ok(BinStrategy::SquareRoot),
            "sturges" => Ok(BinStrategy::Sturges),
            "scott" => Ok(BinStrategy::Scott),
            "fd" | "freedman_diaconis" => Ok(BinStrategy::FreedmanDiaconis),
            _ => Err(DataError::InvalidBinSpec(s.to_string())),
        }
    }
}

/// Recommended bin counts, one per rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinCounts {
    pub square_root: usize,
    pub sturges: usize,
    pub scott: usize,
    pub freedman_diaconis: usize,
}

impl BinCounts {
    pub fn get(&self, strategy: BinStrategy) -> usize {
        match strategy {
            BinStrategy::SquareRoot => self.square_root,
            BinStrategy::Sturges => self.sturges,
            BinStrategy::Scott => self.scott,
            BinStrategy::FreedmanDiaconis => self.freedman_diaconis,
        }
    }
}

/// Largest bin count [`histogram`] will allocate
pub const MAX_HISTOGRAM_BINS: usize = 1 << 20;

/// Number of bins requested for a histogram
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bins {
    Count(usize),
    Strategy(BinStrategy),
}

impl Bins {
    /// Resolve to a concrete bin count in `1..=MAX_HISTOGRAM_BINS` for `values`
    pub fn resolve(&self, values: &[f64]) -> Result<usize> {
        let count = match *self {
            Bins::Count(n) => n,
            Bins::Strategy(strategy) => bin_counts(values)?.get(strategy),
        };
        check_bin_count(count)?;
        Ok(count)
    }
}

fn check_bin_count(count: usize) -> Result<()> {
    if count == 0 || count > MAX_HISTOGRAM_BINS {
        return Err(DataError::InvalidBinCount(count));
    }
    Ok(())
}

impl Default for Bins {
    fn default() -> Self {
        Bins::Strategy(BinStrategy::FreedmanDiaconis)
    }
}

impl From<usize> for Bins {
    fn from(count: usize) -> Self {
        Bins::Count(count)
    }
}

impl From<BinStrategy> for Bins {
    fn from(strategy: BinStrategy) -> Self {
        Bins::Strategy(strategy)
    }
}

impl FromStr for Bins {
    type Err = DataError;

    /// Accepts a decimal count or a rule name
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().parse::<usize>() {
            Ok(count) => Ok(Bins::Count(count)),
            Err(_) => s.parse::<BinStrategy>().map(Bins::Strategy),
        }
    }
}

/// Recommended bin counts for the non-missing values of `series`
///
/// Scott's rule uses the sample standard deviation (divisor N - 1) and
/// Freedman-Diaconis the linearly interpolated IQR. Both fall back to one
/// bin when the data range or the bin width is zero.
pub fn histogram_bin_counts(series: &Series) -> Result<BinCounts> {
    let values = series.numeric_values()?;
    let counts = bin_counts(&values)?;
    tracing::debug!("Bin counts for '{}' (n={}): {:?}", series.name(), values.len(), counts);
    Ok(counts)
}

/// [`histogram_bin_counts`] over already extracted values
///
/// A width rule whose `range / width` is not finite fails with
/// [`DataError::UnboundedBinCount`].
pub fn bin_counts(values: &[f64]) -> Result<BinCounts> {
    let mut sorted = values.to_vec();
    if sorted.is_empty() {
        return Err(DataError::EmptyInput("histogram_bin_counts"));
    }
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let range = sorted[sorted.len() - 1] - sorted[0];
    let cube_root = n.powf(1.0 / 3.0);

    let width_rule = |rule: &'static str, width: f64| -> Result<usize> {
        if range == 0.0 || width.is_nan() || width <= 0.0 {
            return Ok(1);
        }
        let bins = (range / width).ceil();
        if !bins.is_finite() || bins > usize::MAX as f64 {
            return Err(DataError::UnboundedBinCount(rule));
        }
        Ok((bins as usize).max(1))
    };

    let std = sorted.iter().std_dev();
    let iqr = quantile_sorted(&sorted, 0.75) - quantile_sorted(&sorted, 0.25);

    let counts = BinCounts {
        square_root: (n.sqrt().ceil() as usize).max(1),
        sturges: ((1.0 + n.log2()).ceil() as usize).max(1),
        scott: width_rule("scott", 3.5 * std / cube_root)?,
        freedman_diaconis: width_rule("freedman_diaconis", 2.0 * iqr / cube_root)?,
    };

    if range == 0.0 {
        tracing::warn!("Zero data range, width-based rules fall back to one bin");
    }
    Ok(counts)
}

/// One equal-width histogram bin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Split `values` into `bins` equal-width bins over `[min, max]`
///
/// Bins are half-open except the last, which includes `max`. A zero range
/// is widened to `[v - 0.5, v + 0.5]`. `bins` must be in
/// `1..=MAX_HISTOGRAM_BINS`.
pub fn histogram(values: &[f64], bins: usize) -> Result<Vec<HistogramBin>> {
    check_bin_count(bins)?;
    if values.is_empty() {
        return Err(DataError::EmptyInput("histogram"));
    }

    let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if min == max {
        min -= 0.5;
        max += 0.5;
    }

    let bin_width = (max - min) / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - min) / bin_width).floor() as usize).min(bins - 1);
        counts[idx] += 1;
    }

    Ok(counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let start = min + i as f64 * bin_width;
            let end = if i == bins - 1 { max } else { start + bin_width };
            HistogramBin { start, end, count }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_bin_counts_matches_reference_values() {
        let series = Series::from_values("s", (1..=100).map(f64::from));
        let counts = histogram_bin_counts(&series).unwrap();
        assert_eq!(
            counts,
            BinCounts {
                square_root: 10,
                sturges: 8,
                scott: 5,
                freedman_diaconis: 5,
            }
        );
    }

    #[test]
    fn test_histogram_bin_counts_handles_degenerate_series_and_empty() {
        let single_value = Series::from_values("s", [5.0, 5.0, 5.0]);
        assert_eq!(
            histogram_bin_counts(&single_value).unwrap(),
            BinCounts {
                square_root: 2,
                sturges: 3,
                scott: 1,
                freedman_diaconis: 1,
            }
        );

        let empty = Series::new("s", Vec::new());
        assert!(matches!(histogram_bin_counts(&empty), Err(DataError::EmptyInput(_))));
    }

    #[test]
    fn test_bin_counts_ignore_missing() {
        let series = Series::from_values("s", [Some(1.0), None, None, Some(2.0), Some(3.0), Some(4.0)]);
        let counts = histogram_bin_counts(&series).unwrap();
        assert_eq!(counts.square_root, 2);
        assert_eq!(counts.sturges, 3);
    }

    #[test]
    fn test_zero_iqr_falls_back_to_one_bin() {
        let series = Series::from_values("s", [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 50.0]);
        let counts = histogram_bin_counts(&series).unwrap();
        assert_eq!(counts.freedman_diaconis, 1);
        assert!(counts.scott >= 1);
    }

    #[test]
    fn test_bin_counts_serialize_with_rule_names() {
        let series = Series::from_values("s", (1..=100).map(f64::from));
        let json = serde_json::to_value(histogram_bin_counts(&series).unwrap()).unwrap();
        for strategy in BinStrategy::ALL {
            assert!(json.get(strategy.name()).is_some());
        }
    }

    #[test]
    fn test_bins_parsing() {
        assert_eq!("5".parse::<Bins>().unwrap(), Bins::Count(5));
        assert_eq!("fd".parse::<Bins>().unwrap(), Bins::Strategy(BinStrategy::FreedmanDiaconis));
        assert_eq!("Sturges".parse::<Bins>().unwrap(), Bins::Strategy(BinStrategy::Sturges));
        assert!(matches!("many".parse::<Bins>(), Err(DataError::InvalidBinSpec(s)) if s == "many"));
    }

    #[test]
    fn test_bins_resolve_rejects_zero() {
        let values = [1.0, 2.0, 3.0];
        assert!(matches!(Bins::Count(0).resolve(&values), Err(DataError::InvalidBinCount(0))));
        assert_eq!(Bins::Strategy(BinStrategy::SquareRoot).resolve(&values).unwrap(), 2);
    }

    #[test]
    fn test_width_rule_rejects_infinite_bin_count() {
        let series = Series::from_values("s", [0.0, 0.0, 0.0, 1e-300, 1e300]);
        assert!(matches!(
            histogram_bin_counts(&series),
            Err(DataError::UnboundedBinCount("freedman_diaconis"))
        ));

        let values = series.numeric_values().unwrap();
        assert!(matches!(Bins::default().resolve(&values), Err(DataError::UnboundedBinCount(_))));
    }

    #[test]
    fn test_oversized_bin_counts_rejected() {
        let values = [1.0, 1.0, 1.0, 1.000001, 1000.0];
        let counts = bin_counts(&values).unwrap();
        assert!(counts.freedman_diaconis > MAX_HISTOGRAM_BINS);
        assert!(matches!(
            Bins::default().resolve(&values),
            Err(DataError::InvalidBinCount(n)) if n == counts.freedman_diaconis
        ));

        assert!(matches!(
            histogram(&values, MAX_HISTOGRAM_BINS + 1),
            Err(DataError::InvalidBinCount(_))
        ));
        assert!(matches!(histogram(&values, usize::MAX), Err(DataError::InvalidBinCount(_))));
        assert_eq!(histogram(&values, MAX_HISTOGRAM_BINS).unwrap().len(), MAX_HISTOGRAM_BINS);
    }

    #[test]
    fn test_histogram_equal_width() {
        let values: Vec<f64> = (0..10).map(f64::from).collect();
        let bins = histogram(&values, 5).unwrap();
        assert_eq!(bins.len(), 5);
        assert!(bins.iter().all(|b| b.count == 2));
        assert_eq!(bins[0].start, 0.0);
        assert_eq!(bins[4].end, 9.0);
    }

    #[test]
    fn test_histogram_zero_range() {
        let bins = histogram(&[3.0, 3.0], 2).unwrap();
        assert_eq!(bins[0].start, 2.5);
        assert_eq!(bins[1].end, 3.5);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 2);
        assert!(matches!(histogram(&[], 2), Err(DataError::EmptyInput(_))));
        assert!(matches!(histogram(&[1.0], 0), Err(DataError::InvalidBinCount(0))));
    }
}
