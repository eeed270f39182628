//! Named columns of tagged cells and the per-column statistics the helpers rely on

use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::{DataError, Result};

/// A single value in a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Missing,
    Number(f64),
    Text(String),
    Bool(bool),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
}

impl Cell {
    /// True for explicit missing markers and for `NaN`
    pub fn is_missing(&self) -> bool {
        match self {
            Cell::Missing => true,
            Cell::Number(v) => v.is_nan(),
            _ => false,
        }
    }

    /// True for text that is empty once surrounding whitespace is removed
    pub fn is_blank(&self) -> bool {
        matches!(self, Cell::Text(s) if s.trim().is_empty())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Cell::Missing => "missing",
            Cell::Number(_) => "number",
            Cell::Text(_) => "text",
            Cell::Bool(_) => "bool",
            Cell::DateTime(_) => "datetime",
            Cell::Time(_) => "time",
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Missing => write!(f, "NA"),
            Cell::Number(v) => write!(f, "{v}"),
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::DateTime(dt) => write!(f, "{dt}"),
            Cell::Time(t) => write!(f, "{t}"),
        }
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Cell::Number(f64::from(value))
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Cell::Bool(value)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Cell::DateTime(value)
    }
}

impl From<NaiveTime> for Cell {
    fn from(value: NaiveTime) -> Self {
        Cell::Time(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Missing, Into::into)
    }
}

/// Divisor used for variance and standard deviation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ddof {
    /// Divide by N
    Population,
    /// Divide by N - 1
    Sample,
}

/// A named column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    name: String,
    cells: Vec<Cell>,
}

impl Series {
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Build a series from anything convertible into cells
    pub fn from_values<I, T>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Cell>,
    {
        Self::new(name, values.into_iter().map(Into::into).collect())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn get(&self, row: usize) -> Option<&Cell> {
        self.cells.get(row)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Same cells under a different name
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self::new(name, self.cells.clone())
    }

    /// True when every non-missing cell is a number
    pub fn is_numeric(&self) -> bool {
        self.cells
            .iter()
            .all(|cell| cell.is_missing() || matches!(cell, Cell::Number(_)))
    }

    /// Number of missing cells, optionally counting blank text as missing
    pub fn missing_count(&self, include_blank: bool) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.is_missing() || (include_blank && cell.is_blank()))
            .count()
    }

    /// Non-missing values in row order
    ///
    /// Fails with [`DataError::NonNumericColumn`] on the first cell that is
    /// neither missing nor a number.
    pub fn numeric_values(&self) -> Result<Vec<f64>> {
        let mut values = Vec::with_capacity(self.cells.len());
        for (row, cell) in self.cells.iter().enumerate() {
            if cell.is_missing() {
                continue;
            }
            match cell {
                Cell::Number(v) => values.push(*v),
                other => {
                    return Err(DataError::NonNumericColumn {
                        column: self.name.clone(),
                        row,
                        found: other.kind(),
                    })
                }
            }
        }
        Ok(values)
    }

    /// Non-missing values sorted ascending
    pub fn sorted_values(&self) -> Result<Vec<f64>> {
        let mut values = self.numeric_values()?;
        values.sort_by(f64::total_cmp);
        Ok(values)
    }

    /// Mean of the non-missing values, `NaN` when there are none
    pub fn mean(&self) -> Result<f64> {
        Ok(self.numeric_values()?.iter().mean())
    }

    /// Standard deviation of the non-missing values
    ///
    /// `NaN` when there are too few values for the chosen divisor.
    pub fn std(&self, ddof: Ddof) -> Result<f64> {
        let values = self.numeric_values()?;
        Ok(match ddof {
            Ddof::Population => values.iter().population_std_dev(),
            Ddof::Sample => values.iter().std_dev(),
        })
    }

    /// Linearly interpolated quantile of the non-missing values
    pub fn quantile(&self, p: f64) -> Result<f64> {
        Ok(quantile_sorted(&self.sorted_values()?, p))
    }
}

/// Quantile of an ascending slice, interpolating between the floor and ceil
/// of `p * (n - 1)`
///
/// Returns `NaN` for an empty slice. `p` is clamped to `[0, 1]`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }

    let idx = (sorted.len() - 1) as f64 * p.clamp(0.0, 1.0);
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;

    if lower == upper || upper >= sorted.len() {
        sorted[lower]
    } else {
        let fraction = idx - lower as f64;
        sorted[lower] * (1.0 - fraction) + sorted[upper] * fraction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_missing_and_blank_predicates() {
        assert!(Cell::Missing.is_missing());
        assert!(Cell::Number(f64::NAN).is_missing());
        assert!(!Cell::Number(0.0).is_missing());
        assert!(Cell::from("   ").is_blank());
        assert!(!Cell::from(" x ").is_blank());
        assert!(!Cell::Missing.is_blank());
    }

    #[test]
    fn test_from_option() {
        let s = Series::from_values("a", [Some(1.0), None, Some(3.0)]);
        assert_eq!(s.cells()[1], Cell::Missing);
        assert_eq!(s.missing_count(false), 1);
        assert_eq!(s.numeric_values().unwrap(), vec![1.0, 3.0]);
    }

    #[test]
    fn test_std_divisors() {
        let s = Series::from_values("x", [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!(approx(s.mean().unwrap(), 5.0));
        assert!(approx(s.std(Ddof::Population).unwrap(), 2.0));
        assert!(approx(s.std(Ddof::Sample).unwrap(), (32.0_f64 / 7.0).sqrt()));
    }

    #[test]
    fn test_quantile_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert!(approx(quantile_sorted(&sorted, 0.25), 2.25));
        assert!(approx(quantile_sorted(&sorted, 0.75), 4.75));
        assert!(approx(quantile_sorted(&sorted, 0.0), 1.0));
        assert!(approx(quantile_sorted(&sorted, 1.0), 6.0));
        assert!(quantile_sorted(&[], 0.5).is_nan());
    }

    #[test]
    fn test_non_numeric_rejected() {
        let s = Series::from_values("mixed", [Cell::from(1.0), Cell::from("two")]);
        assert!(!s.is_numeric());
        match s.numeric_values() {
            Err(DataError::NonNumericColumn { row, found, .. }) => {
                assert_eq!(row, 1);
                assert_eq!(found, "text");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
