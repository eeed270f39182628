//! Calendar field extraction from a date column

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike};

use pgf_data::{Cell, DataError, Frame, Result, Series};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

fn parse_datetime(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

fn to_datetime(column: &str, cell: &Cell) -> Result<Option<NaiveDateTime>> {
    if cell.is_missing() {
        return Ok(None);
    }
    match cell {
        Cell::DateTime(dt) => Ok(Some(*dt)),
        Cell::Text(s) => parse_datetime(s).map(Some).ok_or_else(|| DataError::DateParse {
            column: column.to_string(),
            value: s.clone(),
        }),
        other => Err(DataError::DateParse {
            column: column.to_string(),
            value: other.to_string(),
        }),
    }
}

fn derive<F>(parsed: &[Option<NaiveDateTime>], name: &str, f: F) -> Series
where
    F: Fn(&NaiveDateTime) -> Cell,
{
    Series::new(
        name,
        parsed
            .iter()
            .map(|dt| dt.as_ref().map_or(Cell::Missing, &f))
            .collect(),
    )
}

fn is_month_end(date: NaiveDate) -> bool {
    date.succ_opt().map_or(true, |next| next.month() != date.month())
}

/// Add calendar columns derived from `date_col`
///
/// Adds `date`, `year`, `month`, `day`, `quarter`, `dayofweek` (Monday = 0),
/// `is_month_start` and `is_month_end`, plus `time`, `minutes` and `hours`
/// when `include_time` is set. Missing dates stay missing in every derived
/// column.
pub fn add_date_time(frame: &Frame, date_col: &str, include_time: bool) -> Result<Frame> {
    let source = frame.column(date_col)?;
    let parsed = source
        .cells()
        .iter()
        .map(|cell| to_datetime(date_col, cell))
        .collect::<Result<Vec<_>>>()?;

    let mut out = frame.clone();
    out.insert_column(derive(&parsed, "date", |dt| Cell::DateTime(*dt)))?;
    out.insert_column(derive(&parsed, "year", |dt| Cell::from(dt.year())))?;
    out.insert_column(derive(&parsed, "month", |dt| Cell::Number(f64::from(dt.month()))))?;
    out.insert_column(derive(&parsed, "day", |dt| Cell::Number(f64::from(dt.day()))))?;
    out.insert_column(derive(&parsed, "quarter", |dt| Cell::Number(f64::from((dt.month() - 1) / 3 + 1))))?;
    out.insert_column(derive(&parsed, "dayofweek", |dt| {
        Cell::Number(f64::from(dt.weekday().num_days_from_monday()))
    }))?;
    out.insert_column(derive(&parsed, "is_month_start", |dt| Cell::Bool(dt.day() == 1)))?;
    out.insert_column(derive(&parsed, "is_month_end", |dt| Cell::Bool(is_month_end(dt.date()))))?;

    if include_time {
        out.insert_column(derive(&parsed, "time", |dt| Cell::Time(dt.time())))?;
        out.insert_column(derive(&parsed, "minutes", |dt| Cell::Number(f64::from(dt.minute()))))?;
        out.insert_column(derive(&parsed, "hours", |dt| Cell::Number(f64::from(dt.hour()))))?;
    }

    tracing::debug!(
        "Decomposed '{}' into {} calendar columns",
        date_col,
        out.column_count() - frame.column_count()
    );
    Ok(out)
}
