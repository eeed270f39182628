//! Z-score flagging and IQR fences

use pgf_data::{Cell, Ddof, Frame, Result, Series};

/// Default absolute z-score above which a row is flagged
pub const DEFAULT_Z_THRESHOLD: f64 = 3.0;

/// Default IQR multiplier for the outlier fences
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Add `<col>_z` and `<col>_is_outlier` columns for a numeric column
///
/// The z-score uses the population standard deviation (divisor N). A zero
/// standard deviation yields `NaN` scores and no flagged rows; missing cells
/// get a `NaN` score and are never flagged.
pub fn add_zscore_outlier_flag(frame: &Frame, col: &str, z: f64) -> Result<Frame> {
    let values = frame.column(col)?;
    let mean = values.mean()?;
    let std = values.std(Ddof::Population)?;

    if std == 0.0 {
        tracing::warn!("Column '{}' has zero standard deviation, z-scores are NaN", col);
    }

    let scores: Vec<f64> = values
        .cells()
        .iter()
        .map(|cell| match cell.as_f64() {
            Some(v) => (v - mean) / std,
            None => f64::NAN,
        })
        .collect();

    let flags: Vec<bool> = scores.iter().map(|score| score.abs() > z).collect();
    let flagged = flags.iter().filter(|f| **f).count();
    tracing::debug!(
        "Z-score flagging on '{}': mean={:.4}, std={:.4}, threshold={}, flagged={}",
        col,
        mean,
        std,
        z,
        flagged
    );

    let mut out = frame.clone();
    out.insert_column(Series::from_values(format!("{col}_z"), scores.iter().copied()))?;
    out.insert_column(Series::from_values(format!("{col}_is_outlier"), flags))?;
    Ok(out)
}

/// Lower and upper outlier cutoffs `(Q1 - k*IQR, Q3 + k*IQR)`
///
/// Quartiles are linearly interpolated over the non-missing values.
pub fn iqr_bounds(series: &Series, k: f64) -> Result<(f64, f64)> {
    let q1 = series.quantile(0.25)?;
    let q3 = series.quantile(0.75)?;
    let iqr = q3 - q1;
    Ok((q1 - k * iqr, q3 + k * iqr))
}
