//! Top-level facade crate for idmetrics.
//!
//! Re-exports the engine and the exporter so services can depend on a single crate.

pub mod core {
    pub use idmetrics_core::*;
}

pub mod exporter {
    pub use idmetrics_exporter::*;
}
