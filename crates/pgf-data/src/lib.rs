//! Tabular data model for the cleaning and statistics helpers
//!
//! A [`Frame`] is an ordered list of equally long [`Series`], and every
//! series holds tagged [`Cell`] values so that mixed-type columns survive
//! until a helper decides how to treat them.

pub mod frame;
pub mod series;
pub mod sources;

use arrow::error::ArrowError;
use thiserror::Error;

// Re-exports
pub use frame::{Frame, GroupKey};
pub use series::{quantile_sorted, Cell, Ddof, Series};

/// Errors that can occur in data operations
#[derive(Error, Debug)]
pub enum DataError {
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    #[error("column '{column}' is not numeric (found {found} at row {row})")]
    NonNumericColumn {
        column: String,
        row: usize,
        found: &'static str,
    },

    #[error("{0} requires at least one non-missing observation")]
    EmptyInput(&'static str),

    #[error("bin count {0} is out of range")]
    InvalidBinCount(usize),

    #[error("{0} rule yields an unbounded number of bins")]
    UnboundedBinCount(&'static str),

    #[error("invalid bin specification '{0}': expected a positive integer or a rule name")]
    InvalidBinSpec(String),

    #[error("no numeric columns to plot")]
    NoNumericColumns,

    #[error("every group is empty after dropping missing values")]
    EmptyGroups,

    #[error("column '{column}' has {actual} rows, frame has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("cannot parse '{value}' in column '{column}' as a date")]
    DateParse { column: String, value: String },

    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),
}

/// Result alias used throughout the pgf crates
pub type Result<T> = std::result::Result<T, DataError>;
