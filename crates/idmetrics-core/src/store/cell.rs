//! Per-series cells.
//!
//! Counters and gauges are lock-free: the `f64` lives as raw bits in an
//! `AtomicU64`. Histograms keep buckets, sum and count behind one short
//! per-cell mutex so a snapshot always reads them as a unit.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::{Serialize, Serializer};

use crate::error::{MetricsError, Result};
use crate::exposition::format_value;
use crate::family::MetricKind;

/// A mutable cell stored once per series.
pub trait SeriesCell: Send + Sync + 'static {
    /// Per-family settings every new cell is built from.
    type Config: Clone + Send + Sync + 'static;

    const KIND: MetricKind;

    fn new(config: &Self::Config) -> Self;

    /// Point-in-time copy of the cell, consistent on its own.
    fn snapshot(&self) -> SeriesValue;
}

/// Immutable copy of one series' state.
///
/// Serialized untagged; `+Inf`, `-Inf` and `NaN` become the strings used by
/// the text exposition, since JSON numbers cannot carry them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesValue {
    Counter(#[serde(serialize_with = "sample")] f64),
    Gauge(#[serde(serialize_with = "sample")] f64),
    Histogram(HistogramSnapshot),
}

fn sample<S: Serializer>(v: &f64, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if v.is_finite() {
        serializer.serialize_f64(*v)
    } else {
        serializer.serialize_str(&format_value(*v))
    }
}

/// Cumulative bucket count: observations `<= le`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BucketCount {
    pub le: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSnapshot {
    /// Finite bounds only; the `+Inf` bucket equals `count`.
    pub buckets: Vec<BucketCount>,
    #[serde(serialize_with = "sample")]
    pub sum: f64,
    pub count: u64,
}

impl HistogramSnapshot {
    /// Cumulative count for the bucket bounded by `le` (`f64::INFINITY` for `+Inf`).
    pub fn bucket(&self, le: f64) -> Option<u64> {
        if le == f64::INFINITY {
            return Some(self.count);
        }
        self.buckets.iter().find(|b| b.le == le).map(|b| b.count)
    }
}

/// Atomic `f64` stored as raw bits.
#[derive(Debug, Default)]
struct AtomicF64 {
    bits: AtomicU64,
}

impl AtomicF64 {
    fn load(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Acquire))
    }

    fn store(&self, v: f64) {
        self.bits.store(v.to_bits(), Ordering::Release);
    }

    fn fetch_add(&self, delta: f64) {
        let mut cur = self.bits.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(cur) + delta).to_bits();
            match self
                .bits
                .compare_exchange_weak(cur, next, Ordering::AcqRel, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(actual) => cur = actual,
            }
        }
    }
}

/// Monotonically non-decreasing value, starting at 0.
#[derive(Debug, Default)]
pub struct CounterCell {
    value: AtomicF64,
}

impl CounterCell {
    pub fn inc(&self) {
        self.value.fetch_add(1.0);
    }

    /// Negative and NaN deltas are rejected and leave the value untouched.
    pub fn inc_by(&self, delta: f64) -> Result<()> {
        if delta.is_nan() || delta < 0.0 {
            return Err(MetricsError::InvalidDelta(delta));
        }
        self.value.fetch_add(delta);
        Ok(())
    }

    pub fn get(&self) -> f64 {
        self.value.load()
    }
}

impl SeriesCell for CounterCell {
    type Config = ();

    const KIND: MetricKind = MetricKind::Counter;

    fn new(_: &()) -> Self {
        Self::default()
    }

    fn snapshot(&self) -> SeriesValue {
        SeriesValue::Counter(self.get())
    }
}

/// Arbitrary value, last write wins.
#[derive(Debug, Default)]
pub struct GaugeCell {
    value: AtomicF64,
}

impl GaugeCell {
    pub fn set(&self, v: f64) {
        self.value.store(v);
    }

    pub fn add(&self, delta: f64) {
        self.value.fetch_add(delta);
    }

    pub fn sub(&self, delta: f64) {
        self.value.fetch_add(-delta);
    }

    pub fn inc(&self) {
        self.add(1.0);
    }

    pub fn dec(&self) {
        self.sub(1.0);
    }

    pub fn get(&self) -> f64 {
        self.value.load()
    }
}

impl SeriesCell for GaugeCell {
    type Config = ();

    const KIND: MetricKind = MetricKind::Gauge;

    fn new(_: &()) -> Self {
        Self::default()
    }

    fn snapshot(&self) -> SeriesValue {
        SeriesValue::Gauge(self.get())
    }
}

#[derive(Debug)]
struct HistogramState {
    /// Cumulative, parallel to the family bounds.
    buckets: Box<[u64]>,
    sum: f64,
    count: u64,
}

/// Fixed-bucket distribution of observed values.
#[derive(Debug)]
pub struct HistogramCell {
    bounds: Arc<[f64]>,
    state: Mutex<HistogramState>,
}

impl HistogramCell {
    // Plain counters cannot be left half-valid by a panicking holder.
    fn lock(&self) -> MutexGuard<'_, HistogramState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn observe(&self, v: f64) {
        // First bound >= v; NaN matches none and only lands in +Inf.
        let first = self.bounds.partition_point(|b| !(*b >= v));
        let mut st = self.lock();
        for c in &mut st.buckets[first..] {
            *c += 1;
        }
        st.sum += v;
        st.count += 1;
    }

    pub fn bounds(&self) -> &[f64] {
        &self.bounds
    }

    pub fn sample_count(&self) -> u64 {
        self.lock().count
    }

    pub fn sample_sum(&self) -> f64 {
        self.lock().sum
    }
}

impl SeriesCell for HistogramCell {
    type Config = Arc<[f64]>;

    const KIND: MetricKind = MetricKind::Histogram;

    fn new(bounds: &Arc<[f64]>) -> Self {
        Self {
            bounds: Arc::clone(bounds),
            state: Mutex::new(HistogramState {
                buckets: vec![0; bounds.len()].into_boxed_slice(),
                sum: 0.0,
                count: 0,
            }),
        }
    }

    fn snapshot(&self) -> SeriesValue {
        let (counts, sum, count) = {
            let st = self.lock();
            (st.buckets.clone(), st.sum, st.count)
        };
        let buckets = self
            .bounds
            .iter()
            .zip(counts.iter())
            .map(|(&le, &count)| BucketCount { le, count })
            .collect();
        SeriesValue::Histogram(HistogramSnapshot {
            buckets,
            sum,
            count,
        })
    }
}
