//! Metric families: named, typed, labelled collections of series.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::buckets::{self, DEFAULT_BUCKETS};
use crate::error::{MetricsError, Result};
use crate::label::{is_valid_metric_name, LabelSchema};
use crate::snapshot::{FamilySnapshot, SeriesSnapshot};
use crate::store::{CounterCell, GaugeCell, HistogramCell, SeriesCell, SeriesStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
}

impl MetricKind {
    /// Name used on `# TYPE` lines.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
            MetricKind::Histogram => "histogram",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static description of a family, as seen by the encoder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Desc {
    pub name: String,
    pub kind: MetricKind,
    pub help: String,
    pub label_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buckets: Option<Vec<f64>>,
}

/// Options shared by every family kind.
///
/// The fully-qualified name joins the non-empty parts of
/// `namespace_subsystem_name`.
#[derive(Debug, Clone, Default)]
pub struct Opts {
    pub namespace: String,
    pub subsystem: String,
    pub name: String,
    pub help: String,
    pub label_names: Vec<String>,
}

impl Opts {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            ..Self::default()
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn subsystem(mut self, subsystem: impl Into<String>) -> Self {
        self.subsystem = subsystem.into();
        self
    }

    pub fn labels<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.label_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn fq_name(&self) -> String {
        [&self.namespace, &self.subsystem, &self.name]
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| p.as_str())
            .collect::<Vec<_>>()
            .join("_")
    }
}

/// Histogram options: [`Opts`] plus bucket bounds.
#[derive(Debug, Clone)]
pub struct HistogramOpts {
    pub common: Opts,
    pub buckets: Vec<f64>,
}

impl HistogramOpts {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            common: Opts::new(name, help),
            buckets: DEFAULT_BUCKETS.to_vec(),
        }
    }

    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.common = self.common.namespace(namespace);
        self
    }

    pub fn subsystem(mut self, subsystem: impl Into<String>) -> Self {
        self.common = self.common.subsystem(subsystem);
        self
    }

    pub fn labels<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.common = self.common.labels(names);
        self
    }

    pub fn buckets(mut self, buckets: Vec<f64>) -> Self {
        self.buckets = buckets;
        self
    }
}

impl From<Opts> for HistogramOpts {
    fn from(common: Opts) -> Self {
        Self {
            common,
            buckets: DEFAULT_BUCKETS.to_vec(),
        }
    }
}

/// One family of series sharing name, kind, help and label schema.
pub struct MetricFamily<C: SeriesCell> {
    name: String,
    help: String,
    schema: LabelSchema,
    store: SeriesStore<C>,
}

pub type CounterVec = MetricFamily<CounterCell>;
pub type GaugeVec = MetricFamily<GaugeCell>;
pub type HistogramVec = MetricFamily<HistogramCell>;

impl<C: SeriesCell> MetricFamily<C> {
    fn build(opts: Opts, config: C::Config) -> Result<Self> {
        // A bare namespace or subsystem is not a metric name.
        if opts.name.is_empty() {
            return Err(MetricsError::InvalidMetricName(opts.fq_name()));
        }
        let name = opts.fq_name();
        if !is_valid_metric_name(&name) {
            return Err(MetricsError::InvalidMetricName(name));
        }
        let schema = LabelSchema::new(opts.label_names)?;
        Ok(Self {
            store: SeriesStore::new(name.clone(), config),
            name,
            help: opts.help,
            schema,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MetricKind {
        C::KIND
    }

    pub fn schema(&self) -> &LabelSchema {
        &self.schema
    }

    /// Cell for `values` (schema order), created on first use.
    ///
    /// Handles may be cached by callers to skip the lookup on hot paths.
    pub fn get_or_create(&self, values: &[&str]) -> Result<Arc<C>> {
        self.schema.check(values)?;
        Ok(self.store.get_or_create(values))
    }

    /// Existing cell for `values`; never creates a series.
    pub fn get(&self, values: &[&str]) -> Result<Option<Arc<C>>> {
        self.schema.check(values)?;
        Ok(self.store.get(values))
    }

    /// Number of series observed so far.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    fn desc(&self, buckets: Option<Vec<f64>>) -> Desc {
        Desc {
            name: self.name.clone(),
            kind: C::KIND,
            help: self.help.clone(),
            label_names: self.schema.names().to_vec(),
            buckets,
        }
    }

    fn collect(&self, desc: Desc) -> FamilySnapshot {
        let series = self
            .store
            .snapshot()
            .into_iter()
            .map(|(label_values, value)| SeriesSnapshot {
                label_values,
                value,
            })
            .collect();
        FamilySnapshot { desc, series }
    }
}

impl<C: SeriesCell> fmt::Debug for MetricFamily<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetricFamily")
            .field("name", &self.name)
            .field("kind", &C::KIND)
            .field("labels", &self.schema.names())
            .field("series", &self.len())
            .finish()
    }
}

impl MetricFamily<CounterCell> {
    pub fn new(opts: Opts) -> Result<Self> {
        Self::build(opts, ())
    }

    pub fn inc(&self, values: &[&str]) -> Result<()> {
        self.get_or_create(values)?.inc();
        Ok(())
    }

    /// Fails with `InvalidDelta` for negative or NaN deltas, without creating
    /// the series.
    pub fn inc_by(&self, values: &[&str], delta: f64) -> Result<()> {
        self.schema.check(values)?;
        if delta.is_nan() || delta < 0.0 {
            return Err(MetricsError::InvalidDelta(delta));
        }
        self.store.get_or_create(values).inc_by(delta)
    }

    pub fn describe(&self) -> Desc {
        self.desc(None)
    }

    pub fn snapshot(&self) -> FamilySnapshot {
        self.collect(self.describe())
    }
}

impl MetricFamily<GaugeCell> {
    pub fn new(opts: Opts) -> Result<Self> {
        Self::build(opts, ())
    }

    pub fn set(&self, values: &[&str], v: f64) -> Result<()> {
        self.get_or_create(values)?.set(v);
        Ok(())
    }

    pub fn add(&self, values: &[&str], delta: f64) -> Result<()> {
        self.get_or_create(values)?.add(delta);
        Ok(())
    }

    pub fn describe(&self) -> Desc {
        self.desc(None)
    }

    pub fn snapshot(&self) -> FamilySnapshot {
        self.collect(self.describe())
    }
}

impl MetricFamily<HistogramCell> {
    pub fn new(opts: HistogramOpts) -> Result<Self> {
        let bounds = buckets::validate(opts.buckets)?;
        let family = Self::build(opts.common, Arc::from(bounds))?;
        if family.schema.contains("le") {
            return Err(MetricsError::InvalidLabelName("le".into()));
        }
        Ok(family)
    }

    pub fn observe(&self, values: &[&str], v: f64) -> Result<()> {
        self.get_or_create(values)?.observe(v);
        Ok(())
    }

    pub fn bounds(&self) -> &[f64] {
        self.store.config()
    }

    pub fn describe(&self) -> Desc {
        self.desc(Some(self.bounds().to_vec()))
    }

    pub fn snapshot(&self) -> FamilySnapshot {
        self.collect(self.describe())
    }
}

/// A registered family of any kind.
#[derive(Clone)]
pub enum Family {
    Counter(Arc<CounterVec>),
    Gauge(Arc<GaugeVec>),
    Histogram(Arc<HistogramVec>),
}

impl Family {
    pub fn name(&self) -> &str {
        match self {
            Family::Counter(f) => f.name(),
            Family::Gauge(f) => f.name(),
            Family::Histogram(f) => f.name(),
        }
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            Family::Counter(_) => MetricKind::Counter,
            Family::Gauge(_) => MetricKind::Gauge,
            Family::Histogram(_) => MetricKind::Histogram,
        }
    }

    pub fn describe(&self) -> Desc {
        match self {
            Family::Counter(f) => f.describe(),
            Family::Gauge(f) => f.describe(),
            Family::Histogram(f) => f.describe(),
        }
    }

    pub fn snapshot(&self) -> FamilySnapshot {
        match self {
            Family::Counter(f) => f.snapshot(),
            Family::Gauge(f) => f.snapshot(),
            Family::Histogram(f) => f.snapshot(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Family::Counter(f) => f.len(),
            Family::Gauge(f) => f.len(),
            Family::Histogram(f) => f.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn as_counter(&self) -> Result<&CounterVec> {
        match self {
            Family::Counter(f) => Ok(f),
            other => Err(other.wrong_kind(MetricKind::Counter)),
        }
    }

    pub fn as_gauge(&self) -> Result<&GaugeVec> {
        match self {
            Family::Gauge(f) => Ok(f),
            other => Err(other.wrong_kind(MetricKind::Gauge)),
        }
    }

    pub fn as_histogram(&self) -> Result<&HistogramVec> {
        match self {
            Family::Histogram(f) => Ok(f),
            other => Err(other.wrong_kind(MetricKind::Histogram)),
        }
    }

    fn wrong_kind(&self, expected: MetricKind) -> MetricsError {
        MetricsError::WrongKind {
            name: self.name().to_string(),
            expected,
            actual: self.kind(),
        }
    }
}

impl fmt::Debug for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Family")
            .field("name", &self.name())
            .field("kind", &self.kind())
            .finish()
    }
}

impl From<Arc<CounterVec>> for Family {
    fn from(f: Arc<CounterVec>) -> Self {
        Family::Counter(f)
    }
}

impl From<Arc<GaugeVec>> for Family {
    fn from(f: Arc<GaugeVec>) -> Self {
        Family::Gauge(f)
    }
}

impl From<Arc<HistogramVec>> for Family {
    fn from(f: Arc<HistogramVec>) -> Self {
        Family::Histogram(f)
    }
}
