//! Sample report: runs every cleaning and statistics helper on a small
//! in-memory sales table and logs the results.
//!
//! Pass a directory as the first argument to also write the plots there as SVG.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use arrow::util::pretty::pretty_format_batches;
use tracing::{info, warn};

use pgf_data::{Cell, Frame};
use pgf_render::{box_plot, cdf_plot, histogram_plot, qq_plot, Figure, Marker, PlotStyle};
use pgf_stats::{
    add_date_time, add_zscore_outlier_flag, fix_col_names, histogram_bin_counts, iqr_bounds, null_percentage,
    BinStrategy, DEFAULT_IQR_MULTIPLIER, DEFAULT_Z_THRESHOLD,
};

fn sample_batch() -> Result<RecordBatch> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Order ID", DataType::Int64, false),
        Field::new("Order Date", DataType::Utf8, true),
        Field::new("Region", DataType::Utf8, true),
        Field::new("Unit-Price", DataType::Float64, true),
        Field::new(" Qty ", DataType::Int64, true),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(1..=12)),
        Arc::new(StringArray::from(vec![
            Some("2025-01-03"),
            Some("2025-01-31 17:20:00"),
            Some("2025-02-14"),
            None,
            Some("2025-03-01T09:05:00"),
            Some("2025-04-30"),
            Some("2025-05-17"),
            Some("2025-06-30 23:59:59"),
            Some("2025-07-04"),
            Some("2025-09-12"),
            Some("2025-11-28"),
            Some("2025-12-31"),
        ])),
        Arc::new(StringArray::from(vec![
            Some("north"),
            Some("south"),
            Some("north"),
            Some(" "),
            Some("east"),
            Some("south"),
            Some("north"),
            Some("east"),
            None,
            Some("south"),
            Some("east"),
            Some("north"),
        ])),
        Arc::new(Float64Array::from(vec![
            Some(12.5),
            Some(13.0),
            Some(11.75),
            Some(12.0),
            None,
            Some(14.25),
            Some(12.8),
            Some(13.4),
            Some(96.0),
            Some(12.1),
            Some(11.9),
            Some(13.6),
        ])),
        Arc::new(Int64Array::from(vec![
            Some(3),
            Some(1),
            Some(4),
            Some(1),
            Some(5),
            None,
            Some(2),
            Some(6),
            Some(5),
            Some(3),
            Some(5),
            Some(8),
        ])),
    ];

    Ok(RecordBatch::try_new(schema, columns)?)
}

fn write_svg(dir: &Path, name: &str, figure: &Figure, style: &PlotStyle) -> Result<()> {
    let svg = figure.render_svg(style)?;
    let path = dir.join(format!("{name}.svg"));
    std::fs::write(&path, &svg).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {} ({} bytes)", path.display(), svg.len());
    Ok(())
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let output_dir = std::env::args().nth(1).map(PathBuf::from);

    let batch = sample_batch()?;
    info!("Sample data:\n{}", pretty_format_batches(std::slice::from_ref(&batch))?);

    let frame = fix_col_names(&Frame::try_from(&batch)?);
    info!("Normalized columns: {:?}", frame.column_names());

    let nulls = null_percentage(&frame, true);
    info!("Null percentage: {}", serde_json::to_string(&nulls)?);

    let flagged = add_zscore_outlier_flag(&frame, "unit_price", DEFAULT_Z_THRESHOLD)?;
    let flags = flagged.column("unit_price_is_outlier")?;
    let outlier_rows: Vec<usize> = (0..flags.len())
        .filter(|&row| matches!(flags.get(row), Some(Cell::Bool(true))))
        .collect();
    info!("Z-score outlier rows (|z| > {}): {:?}", DEFAULT_Z_THRESHOLD, outlier_rows);

    let price = frame.column("unit_price")?;
    let (lower, upper) = iqr_bounds(price, DEFAULT_IQR_MULTIPLIER)?;
    info!("IQR bounds for unit_price: [{:.3}, {:.3}]", lower, upper);

    let bins = histogram_bin_counts(price)?;
    info!("Histogram bin counts: {}", serde_json::to_string(&bins)?);

    let dated = add_date_time(&frame, "order_date", true)?;
    info!("With calendar fields: {:?}", dated.column_names());

    let style = PlotStyle::default();
    let figures: Vec<(&str, Figure)> = vec![
        ("qq", qq_plot(price, None, Marker::Circle)?),
        ("histogram", histogram_plot(price, BinStrategy::Sturges, None)?),
        ("cdf", cdf_plot(price, None, None)?),
        ("box", box_plot(&frame, Some(&["unit_price", "qty"][..]), None, None)?),
        ("box_by_region", box_plot(&frame, Some(&["unit_price"][..]), Some("region"), None)?),
    ];

    match output_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
            for (name, figure) in &figures {
                write_svg(&dir, name, figure, &style)?;
            }
        }
        None => {
            for (name, figure) in &figures {
                match figure.render_svg(&style) {
                    Ok(svg) => info!("Rendered {} plot '{}' ({} bytes)", name, figure.title(), svg.len()),
                    Err(e) => warn!("Could not render {} plot: {}", name, e),
                }
            }
        }
    }

    Ok(())
}
