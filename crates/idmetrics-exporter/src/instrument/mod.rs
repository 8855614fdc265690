//! Name-based instrumentation API.
//!
//! Collaborators update families by name and label values. Update failures
//! never reach the caller: they are logged and counted in
//! `<namespace>_metrics_dropped_updates_total{reason}`, then dropped.
//! The `try_*` variants return the error instead.

use std::sync::Arc;

use idmetrics_core::error::{ErrorCode, MetricsError, Result};
use idmetrics_core::{CounterVec, Opts, Registry};

pub const DROPPED_UPDATES: &str = "metrics_dropped_updates_total";

#[derive(Clone)]
pub struct Instruments {
    registry: Arc<Registry>,
    dropped: Arc<CounterVec>,
}

impl Instruments {
    /// Wrap `registry` and register the dropped-updates counter in it.
    pub fn new(registry: Arc<Registry>, namespace: &str) -> Result<Self> {
        let dropped = registry.register_counter(
            Opts::new(DROPPED_UPDATES, "Metric updates dropped because they were invalid")
                .namespace(namespace)
                .labels(["reason"]),
        )?;
        Ok(Self { registry, dropped })
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn try_increment(&self, name: &str, values: &[&str], delta: f64) -> Result<()> {
        self.registry.get(name)?.as_counter()?.inc_by(values, delta)
    }

    pub fn try_set(&self, name: &str, values: &[&str], value: f64) -> Result<()> {
        self.registry.get(name)?.as_gauge()?.set(values, value)
    }

    pub fn try_observe(&self, name: &str, values: &[&str], value: f64) -> Result<()> {
        self.registry.get(name)?.as_histogram()?.observe(values, value)
    }

    /// Add `delta` to a counter series; invalid updates are dropped.
    pub fn increment(&self, name: &str, values: &[&str], delta: f64) {
        if let Err(e) = self.try_increment(name, values, delta) {
            self.report(name, &e);
        }
    }

    /// Set a gauge series; invalid updates are dropped.
    pub fn set(&self, name: &str, values: &[&str], value: f64) {
        if let Err(e) = self.try_set(name, values, value) {
            self.report(name, &e);
        }
    }

    /// Observe into a histogram series; invalid updates are dropped.
    pub fn observe(&self, name: &str, values: &[&str], value: f64) {
        if let Err(e) = self.try_observe(name, values, value) {
            self.report(name, &e);
        }
    }

    /// Log and count a dropped update.
    pub fn report(&self, name: &str, err: &MetricsError) {
        let reason = err.code().as_str();
        tracing::warn!(metric = %name, reason, error = %err, "metric update dropped");
        // Single label, always valid; nothing left to report if this fails.
        let _ = self.dropped.inc(&[reason]);
    }

    /// Dropped updates counted so far for `code`.
    pub fn dropped(&self, code: ErrorCode) -> f64 {
        match self.dropped.get(&[code.as_str()]) {
            Ok(Some(cell)) => cell.get(),
            _ => 0.0,
        }
    }

    pub fn export_text(&self) -> String {
        self.registry.export_text()
    }
}
