//! Exporter config loader (strict parsing).

pub mod schema;

use std::fs;

use idmetrics_core::error::{MetricsError, Result};

pub use schema::{ExporterConfig, ExporterSection, MetricsSection};

/// Environment variable overriding the config path used by the binary.
pub const CONFIG_PATH_ENV: &str = "IDMETRICS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "idmetrics.yaml";

pub fn load_from_file(path: &str) -> Result<ExporterConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| MetricsError::Config(format!("read config failed ({path}): {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ExporterConfig> {
    let cfg: ExporterConfig = serde_yaml::from_str(s)
        .map_err(|e| MetricsError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}
