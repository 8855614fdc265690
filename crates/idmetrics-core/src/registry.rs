//! Catalog of metric families.
//!
//! Families are registered once at startup and live for the process.
//! Build one `Registry`, wrap it in an `Arc` and hand it to every
//! collaborator; there is no global instance.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{MetricsError, Result};
use crate::exposition;
use crate::family::{CounterVec, Family, GaugeVec, HistogramOpts, HistogramVec, Opts};
use crate::snapshot::RegistrySnapshot;

#[derive(Default)]
struct RegistryInner {
    families: Vec<Family>,
    by_name: HashMap<String, usize>,
}

/// Unique-name catalog, enumerated in registration order.
#[derive(Default)]
pub struct Registry {
    inner: RwLock<RegistryInner>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // Both fields are updated together under the write lock, so a poisoned
    // lock still guards a coherent catalog.
    fn read(&self) -> RwLockReadGuard<'_, RegistryInner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a family. Fails with `DuplicateMetric` when the name is taken.
    pub fn register(&self, family: impl Into<Family>) -> Result<()> {
        let family = family.into();
        let mut inner = self.write();
        if inner.by_name.contains_key(family.name()) {
            return Err(MetricsError::DuplicateMetric(family.name().to_string()));
        }
        tracing::info!(name = %family.name(), kind = %family.kind(), "metric family registered");
        let idx = inner.families.len();
        inner.by_name.insert(family.name().to_string(), idx);
        inner.families.push(family);
        Ok(())
    }

    pub fn register_counter(&self, opts: Opts) -> Result<Arc<CounterVec>> {
        let vec = Arc::new(CounterVec::new(opts)?);
        self.register(Arc::clone(&vec))?;
        Ok(vec)
    }

    pub fn register_gauge(&self, opts: Opts) -> Result<Arc<GaugeVec>> {
        let vec = Arc::new(GaugeVec::new(opts)?);
        self.register(Arc::clone(&vec))?;
        Ok(vec)
    }

    pub fn register_histogram(&self, opts: HistogramOpts) -> Result<Arc<HistogramVec>> {
        let vec = Arc::new(HistogramVec::new(opts)?);
        self.register(Arc::clone(&vec))?;
        Ok(vec)
    }

    /// Look up a family by its fully-qualified name.
    pub fn get(&self, name: &str) -> Result<Family> {
        let inner = self.read();
        inner
            .by_name
            .get(name)
            .map(|&idx| inner.families[idx].clone())
            .ok_or_else(|| MetricsError::UnknownMetric(name.to_string()))
    }

    /// All families, in registration order.
    pub fn families(&self) -> Vec<Family> {
        self.read().families.clone()
    }

    pub fn len(&self) -> usize {
        self.read().families.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().families.is_empty()
    }

    /// Snapshot every family. The catalog lock is released before any series
    /// is read.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            families: self.families().iter().map(Family::snapshot).collect(),
        }
    }

    /// Full exposition document for one scrape.
    pub fn export_text(&self) -> String {
        exposition::encode(&self.snapshot())
    }
}
