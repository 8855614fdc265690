use std::net::SocketAddr;

use serde::Deserialize;

use idmetrics_core::buckets;
use idmetrics_core::error::{MetricsError, Result};
use idmetrics_core::label::is_valid_metric_name;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterConfig {
    pub version: u32,

    #[serde(default)]
    pub exporter: ExporterSection,

    #[serde(default)]
    pub metrics: MetricsSection,
}

impl ExporterConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(MetricsError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.exporter.validate()?;
        self.metrics.validate()?;

        Ok(())
    }
}

impl Default for ExporterConfig {
    fn default() -> Self {
        Self {
            version: 1,
            exporter: ExporterSection::default(),
            metrics: MetricsSection::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            MetricsError::Config(format!(
                "exporter.listen must be a valid SocketAddr ({}): {e}",
                self.listen
            ))
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MetricsSection {
    /// Prefix joined to every family name with `_`. May be empty.
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Overrides the default request-latency bounds.
    #[serde(default)]
    pub request_duration_buckets: Option<Vec<f64>>,

    /// Overrides the OPA evaluation-latency bounds.
    #[serde(default)]
    pub authorization_duration_buckets: Option<Vec<f64>>,
}

impl Default for MetricsSection {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            request_duration_buckets: None,
            authorization_duration_buckets: None,
        }
    }
}

impl MetricsSection {
    pub fn validate(&self) -> Result<()> {
        if !self.namespace.is_empty() && !is_valid_metric_name(&self.namespace) {
            return Err(MetricsError::Config(format!(
                "metrics.namespace is not a valid metric name prefix: {:?}",
                self.namespace
            )));
        }
        for (field, bounds) in [
            ("request_duration_buckets", &self.request_duration_buckets),
            ("authorization_duration_buckets", &self.authorization_duration_buckets),
        ] {
            if let Some(b) = bounds {
                buckets::validate(b.clone())
                    .map_err(|e| MetricsError::Config(format!("metrics.{field}: {e}")))?;
            }
        }
        Ok(())
    }
}

fn default_listen() -> String {
    "0.0.0.0:9090".into()
}
fn default_namespace() -> String {
    "spiffe_demo".into()
}
