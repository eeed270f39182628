//! Column-name normalization and null-rate auditing

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use pgf_data::Frame;

static NON_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_]+").expect("valid regex"));

/// Trim, collapse every run of non-word characters to `_`, and lowercase
pub fn normalize_column_name(name: &str) -> String {
    NON_WORD.replace_all(name.trim(), "_").to_lowercase()
}

/// Copy of `frame` with every column name normalized
pub fn fix_col_names(frame: &Frame) -> Frame {
    frame.map_column_names(normalize_column_name)
}

/// Percentage of missing rows per column, in column order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NullReport(IndexMap<String, f64>);

impl NullReport {
    pub fn get(&self, column: &str) -> Option<f64> {
        self.0.get(column).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(name, pct)| (name.as_str(), *pct))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, f64> {
        self.0
    }
}

/// Percentage (0-100) of missing rows in each column
///
/// With `include_empty_strings`, text that is empty after trimming also
/// counts as missing. A frame without rows reports 0.0 everywhere. A
/// repeated column name reports the first column with that name.
pub fn null_percentage(frame: &Frame, include_empty_strings: bool) -> NullReport {
    let rows = frame.row_count();
    let mut report = IndexMap::with_capacity(frame.column_count());

    for series in frame.columns() {
        let pct = if rows == 0 {
            0.0
        } else {
            series.missing_count(include_empty_strings) as f64 / rows as f64 * 100.0
        };
        report.entry(series.name().to_string()).or_insert(pct);
    }

    tracing::debug!("Null audit over {} rows: {:?}", rows, report);
    NullReport(report)
}
