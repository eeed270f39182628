//! Arrow `RecordBatch` import

use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;

use crate::frame::Frame;
use crate::series::{Cell, Series};
use crate::{DataError, Result};

/// Convert one Arrow array into cells
///
/// Numeric arrays become [`Cell::Number`], string arrays [`Cell::Text`] and
/// boolean arrays [`Cell::Bool`]. Every other type is rendered with Arrow's
/// display formatting and kept as text. Nulls become [`Cell::Missing`].
pub fn cells_from_array(array: &dyn Array) -> Result<Vec<Cell>> {
    let data_type = array.data_type();

    if data_type.is_numeric() {
        let floats = cast(array, &DataType::Float64)?;
        let floats = floats.as_primitive::<Float64Type>();
        return Ok((0..floats.len())
            .map(|i| {
                if floats.is_null(i) {
                    Cell::Missing
                } else {
                    Cell::Number(floats.value(i))
                }
            })
            .collect());
    }

    let cells = match data_type {
        DataType::Utf8 => {
            let strings = array.as_string::<i32>();
            (0..strings.len())
                .map(|i| {
                    if strings.is_null(i) {
                        Cell::Missing
                    } else {
                        Cell::Text(strings.value(i).to_string())
                    }
                })
                .collect()
        }
        DataType::LargeUtf8 => {
            let strings = array.as_string::<i64>();
            (0..strings.len())
                .map(|i| {
                    if strings.is_null(i) {
                        Cell::Missing
                    } else {
                        Cell::Text(strings.value(i).to_string())
                    }
                })
                .collect()
        }
        DataType::Boolean => {
            let bools = array.as_boolean();
            (0..bools.len())
                .map(|i| {
                    if bools.is_null(i) {
                        Cell::Missing
                    } else {
                        Cell::Bool(bools.value(i))
                    }
                })
                .collect()
        }
        other => {
            tracing::debug!("Rendering Arrow column of type {:?} as text", other);
            let mut cells = Vec::with_capacity(array.len());
            for i in 0..array.len() {
                if array.is_null(i) {
                    cells.push(Cell::Missing);
                } else {
                    cells.push(Cell::Text(array_value_to_string(array, i)?));
                }
            }
            cells
        }
    };

    Ok(cells)
}

impl TryFrom<&RecordBatch> for Frame {
    type Error = DataError;

    fn try_from(batch: &RecordBatch) -> Result<Self> {
        let schema = batch.schema();
        let mut columns = Vec::with_capacity(batch.num_columns());
        for (field, array) in schema.fields().iter().zip(batch.columns()) {
            columns.push(Series::new(field.name().clone(), cells_from_array(array.as_ref())?));
        }
        tracing::debug!(
            "Imported RecordBatch with {} columns and {} rows",
            columns.len(),
            batch.num_rows()
        );
        Frame::from_columns(columns)
    }
}
