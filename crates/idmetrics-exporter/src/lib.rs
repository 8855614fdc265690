//! idmetrics exporter library entry.
//!
//! Wires the engine into an identity-aware service: strict YAML config, the
//! fixed SVID / HTTP / OPA / delegation catalog, the error-swallowing
//! instrumentation API and the scrape endpoints. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod catalog;
pub mod config;
pub mod instrument;
pub mod ops;
pub mod router;
