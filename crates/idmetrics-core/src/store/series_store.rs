use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::label::{LabelKey, LabelTuple};
use crate::store::cell::{SeriesCell, SeriesValue};

struct SeriesEntry<C> {
    cell: Arc<C>,
    created_seq: u64,
}

/// Series store for one family:
/// - `label values -> cell`, created lazily on first observation
/// - creation order kept through a sequence number for stable exposition
///
/// Series are never evicted.
pub struct SeriesStore<C: SeriesCell> {
    family: String,
    config: C::Config,
    map: DashMap<LabelKey, SeriesEntry<C>>,
    seq: AtomicU64,
}

impl<C: SeriesCell> SeriesStore<C> {
    pub fn new(family: impl Into<String>, config: C::Config) -> Self {
        Self {
            family: family.into(),
            config,
            map: DashMap::new(),
            seq: AtomicU64::new(0),
        }
    }

    /// Return the cell for `values`, creating it exactly once.
    ///
    /// The caller has already checked arity against the family schema.
    /// Concurrent first callers with equal values all get the same cell.
    pub fn get_or_create(&self, values: &[&str]) -> Arc<C> {
        let probe: &[&str] = values;
        if let Some(entry) = self.map.get(&probe as &dyn LabelTuple) {
            return Arc::clone(&entry.cell);
        }

        let entry = self
            .map
            .entry(LabelKey::from_values(values))
            .or_insert_with(|| {
                let created_seq = self.seq.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(family = %self.family, seq = created_seq, "series created");
                SeriesEntry {
                    cell: Arc::new(C::new(&self.config)),
                    created_seq,
                }
            });
        Arc::clone(&entry.cell)
    }

    /// Existing cell for `values`, without creating one.
    pub fn get(&self, values: &[&str]) -> Option<Arc<C>> {
        let probe: &[&str] = values;
        self.map
            .get(&probe as &dyn LabelTuple)
            .map(|entry| Arc::clone(&entry.cell))
    }

    /// Copy every series in first-observation order.
    ///
    /// Map locks are released before cells are read, so writers to existing
    /// series never wait on a scrape for longer than one cell copy.
    pub fn snapshot(&self) -> Vec<(LabelKey, SeriesValue)> {
        let mut rows: Vec<(u64, LabelKey, Arc<C>)> = self
            .map
            .iter()
            .map(|r| (r.value().created_seq, r.key().clone(), Arc::clone(&r.value().cell)))
            .collect();
        rows.sort_unstable_by_key(|(seq, _, _)| *seq);

        rows.into_iter()
            .map(|(_, key, cell)| (key, cell.snapshot()))
            .collect()
    }

    pub fn config(&self) -> &C::Config {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}
