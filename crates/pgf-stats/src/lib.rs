//! Cleaning and exploratory-statistics helpers
//!
//! Every function is a stateless transform over one frame or series: it
//! reads its input and returns a new value, never mutating the caller's data.

pub mod bins;
pub mod clean;
pub mod date;
pub mod distribution;
pub mod outliers;

// Re-exports
pub use bins::{
    bin_counts, histogram, histogram_bin_counts, BinCounts, BinStrategy, Bins, HistogramBin, MAX_HISTOGRAM_BINS,
};
pub use clean::{fix_col_names, normalize_column_name, null_percentage, NullReport};
pub use date::add_date_time;
pub use distribution::{box_plot_groups, box_summary, ecdf, qq_points, BoxGroups, BoxSummary, QqPoints};
pub use outliers::{add_zscore_outlier_flag, iqr_bounds, DEFAULT_IQR_MULTIPLIER, DEFAULT_Z_THRESHOLD};
