//! Shared application state for the exporter.
//!
//! Built once at startup: registry, instrumentation surface and the identity
//! catalog. Registration errors are returned so `main` can abort.

use std::sync::Arc;

use idmetrics_core::error::Result;
use idmetrics_core::Registry;

use crate::catalog::IdentityMetrics;
use crate::config::ExporterConfig;
use crate::instrument::Instruments;

#[derive(Clone)]
pub struct AppState {
    cfg: Arc<ExporterConfig>,
    instruments: Instruments,
    identity: IdentityMetrics,
}

impl AppState {
    pub fn new(cfg: ExporterConfig) -> Result<Self> {
        let registry = Arc::new(Registry::new());
        let instruments = Instruments::new(registry, &cfg.metrics.namespace)?;
        let identity = IdentityMetrics::register(&instruments, &cfg.metrics)?;

        tracing::info!(
            families = instruments.registry().len(),
            namespace = %cfg.metrics.namespace,
            "metric catalog registered"
        );

        Ok(Self {
            cfg: Arc::new(cfg),
            instruments,
            identity,
        })
    }

    pub fn cfg(&self) -> &ExporterConfig {
        &self.cfg
    }

    pub fn instruments(&self) -> &Instruments {
        &self.instruments
    }

    pub fn identity(&self) -> &IdentityMetrics {
        &self.identity
    }

    pub fn registry(&self) -> &Arc<Registry> {
        self.instruments.registry()
    }
}
