//! Series storage module exports.
//!
//! Re-exports the per-family store and the cell types it holds.

pub mod cell;
pub mod series_store;

pub use cell::{
    BucketCount, CounterCell, GaugeCell, HistogramCell, HistogramSnapshot, SeriesCell, SeriesValue,
};
pub use series_store::SeriesStore;
