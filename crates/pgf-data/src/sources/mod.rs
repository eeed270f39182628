//! Conversions from external tabular containers into [`Frame`](crate::Frame)

pub mod record_batch;

pub use record_batch::cells_from_array;
