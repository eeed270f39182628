//! Column-ordered frame of equally long series

use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDateTime, NaiveTime};
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::series::{Cell, Series};
use crate::{DataError, Result};

/// An ordered set of named columns sharing one row count
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Series>", into = "Vec<Series>")]
pub struct Frame {
    columns: Vec<Series>,
}

impl Frame {
    /// Create an empty frame
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frame, checking that every column has the same length
    ///
    /// Every column is kept in order, including repeated names.
    pub fn from_columns(columns: Vec<Series>) -> Result<Self> {
        let mut frame = Self::new();
        for series in columns {
            frame.check_length(&series)?;
            frame.columns.push(series);
        }
        Ok(frame)
    }

    fn check_length(&self, series: &Series) -> Result<()> {
        if !self.columns.is_empty() && series.len() != self.row_count() {
            return Err(DataError::LengthMismatch {
                column: series.name().to_string(),
                expected: self.row_count(),
                actual: series.len(),
            });
        }
        Ok(())
    }

    /// Add a column, replacing the first existing column of the same name
    pub fn insert_column(&mut self, series: Series) -> Result<()> {
        self.check_length(&series)?;

        match self.columns.iter_mut().find(|c| c.name() == series.name()) {
            Some(existing) => *existing = series,
            None => self.columns.push(series),
        }
        Ok(())
    }

    /// Builder form of [`Frame::insert_column`]
    pub fn with_column(mut self, series: Series) -> Result<Self> {
        self.insert_column(series)?;
        Ok(self)
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Series> {
        self.get(name)
            .ok_or_else(|| DataError::ColumnNotFound(name.to_string()))
    }

    pub fn get(&self, name: &str) -> Option<&Series> {
        self.columns.iter().find(|c| c.name() == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn columns(&self) -> &[Series] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Series::name).collect()
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Series::len)
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Columns whose non-missing cells are all numbers
    pub fn numeric_columns(&self) -> impl Iterator<Item = &Series> {
        self.columns.iter().filter(|c| c.is_numeric())
    }

    /// Copy of the frame with every column name passed through `rename`
    ///
    /// Names are rewritten positionally, so two columns may end up sharing
    /// a name.
    pub fn map_column_names<F>(&self, mut rename: F) -> Frame
    where
        F: FnMut(&str) -> String,
    {
        Frame {
            columns: self
                .columns
                .iter()
                .map(|c| c.renamed(rename(c.name())))
                .collect(),
        }
    }

    /// Row indices keyed by the distinct non-missing values of `by`
    ///
    /// Rows whose key is missing are dropped. Keys iterate in ascending order.
    pub fn group_rows(&self, by: &str) -> Result<BTreeMap<GroupKey, Vec<usize>>> {
        let column = self.column(by)?;
        let mut groups: BTreeMap<GroupKey, Vec<usize>> = BTreeMap::new();
        for (row, cell) in column.cells().iter().enumerate() {
            if let Some(key) = GroupKey::from_cell(cell) {
                groups.entry(key).or_default().push(row);
            }
        }
        Ok(groups)
    }
}

impl TryFrom<Vec<Series>> for Frame {
    type Error = DataError;

    fn try_from(columns: Vec<Series>) -> Result<Self> {
        Frame::from_columns(columns)
    }
}

impl From<Frame> for Vec<Series> {
    fn from(frame: Frame) -> Self {
        frame.columns
    }
}

/// Hashable, totally ordered view of a non-missing cell
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GroupKey {
    Bool(bool),
    Number(OrderedFloat<f64>),
    Text(String),
    DateTime(NaiveDateTime),
    Time(NaiveTime),
}

impl GroupKey {
    pub fn from_cell(cell: &Cell) -> Option<Self> {
        if cell.is_missing() {
            return None;
        }
        match cell {
            Cell::Missing => None,
            Cell::Number(v) => Some(GroupKey::Number(OrderedFloat(*v))),
            Cell::Text(s) => Some(GroupKey::Text(s.clone())),
            Cell::Bool(b) => Some(GroupKey::Bool(*b)),
            Cell::DateTime(dt) => Some(GroupKey::DateTime(*dt)),
            Cell::Time(t) => Some(GroupKey::Time(*t)),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Bool(b) => write!(f, "{b}"),
            GroupKey::Number(v) => write!(f, "{}", v.0),
            GroupKey::Text(s) => write!(f, "{s}"),
            GroupKey::DateTime(dt) => write!(f, "{dt}"),
            GroupKey::Time(t) => write!(f, "{t}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Frame {
        Frame::from_columns(vec![
            Series::from_values("id", [1.0, 2.0, 3.0]),
            Series::from_values("segment", ["b", "a", "b"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let err = sample()
            .with_column(Series::from_values("short", [1.0]))
            .unwrap_err();
        assert!(matches!(err, DataError::LengthMismatch { expected: 3, actual: 1, .. }));
    }

    #[test]
    fn test_insert_replaces_existing() {
        let mut frame = sample();
        frame
            .insert_column(Series::from_values("id", [7.0, 8.0, 9.0]))
            .unwrap();
        assert_eq!(frame.column_names(), vec!["id", "segment"]);
        assert_eq!(frame.column("id").unwrap().cells()[0], Cell::Number(7.0));
    }

    #[test]
    fn test_missing_column() {
        assert!(matches!(
            sample().column("nope"),
            Err(DataError::ColumnNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn test_group_rows_sorted_and_drops_missing() {
        let frame = sample()
            .with_column(Series::from_values("g", [Some(2.0), None, Some(1.0)]))
            .unwrap();

        let by_segment = frame.group_rows("segment").unwrap();
        let keys: Vec<String> = by_segment.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(by_segment[&GroupKey::Text("b".into())], vec![0, 2]);

        let by_g = frame.group_rows("g").unwrap();
        assert_eq!(by_g.len(), 2);
        assert_eq!(by_g.values().next().unwrap(), &vec![2]);
    }

    #[test]
    fn test_map_column_names_leaves_source() {
        let frame = sample();
        let upper = frame.map_column_names(|name| name.to_uppercase());
        assert_eq!(upper.column_names(), vec!["ID", "SEGMENT"]);
        assert_eq!(frame.column_names(), vec!["id", "segment"]);
    }

    #[test]
    fn test_from_columns_keeps_repeated_names() {
        let frame = Frame::from_columns(vec![
            Series::from_values("a", [1.0, 2.0]),
            Series::from_values("a", [3.0, 4.0]),
        ])
        .unwrap();
        assert_eq!(frame.column_names(), vec!["a", "a"]);
        assert_eq!(frame.column("a").unwrap().cells()[0], Cell::Number(1.0));
    }

    #[test]
    fn test_json_round_trip_keeps_colliding_renames() {
        let frame = Frame::from_columns(vec![
            Series::from_values("a b", [1.0, 2.0]),
            Series::from_values("a-b", [3.0, 4.0]),
        ])
        .unwrap();
        let renamed = frame.map_column_names(|name| name.replace([' ', '-'], "_"));
        assert_eq!(renamed.column_count(), 2);

        let json = serde_json::to_string(&renamed).unwrap();
        let back: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(back.column_names(), vec!["a_b", "a_b"]);
        assert_eq!(back, renamed);
    }

    #[test]
    fn test_json_round_trip_checks_lengths() {
        let json = serde_json::to_string(&sample()).unwrap();
        let back: Frame = serde_json::from_str(&json).unwrap();
        assert_eq!(back, sample());

        let ragged = r#"[
            {"name": "a", "cells": [{"Number": 1.0}, "Missing"]},
            {"name": "b", "cells": [{"Text": "x"}]}
        ]"#;
        assert!(serde_json::from_str::<Frame>(ragged).is_err());
    }
}
