//! idmetrics core: the in-process metrics engine.
//!
//! Label-dimensioned counters, gauges and histograms, a registry that owns
//! them, and the Prometheus text encoder used by scrape endpoints. This crate
//! carries no transport or runtime dependencies so the exporter and tests can
//! share it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Update-path
//! failures surface as `MetricsError` so callers can drop them without
//! disturbing the instrumented service.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod buckets;
pub mod error;
pub mod exposition;
pub mod family;
pub mod label;
pub mod registry;
pub mod snapshot;
pub mod store;

/// Shared result type.
pub use error::{ErrorCode, MetricsError, Result};
pub use family::{
    CounterVec, Desc, Family, GaugeVec, HistogramOpts, HistogramVec, MetricFamily, MetricKind, Opts,
};
pub use label::{LabelKey, LabelSchema};
pub use registry::Registry;
pub use snapshot::{FamilySnapshot, RegistrySnapshot, SeriesSnapshot};
pub use store::{CounterCell, GaugeCell, HistogramCell, HistogramSnapshot, SeriesValue};
