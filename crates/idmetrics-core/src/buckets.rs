//! Histogram bucket bounds.
//!
//! Bounds are finite and strictly ascending. The `+Inf` bucket is implicit:
//! every histogram carries it and its count always equals the total count.

use crate::error::{MetricsError, Result};

/// Default bounds, tuned for request latencies in seconds.
pub const DEFAULT_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// Validate a bound list. A trailing `+Inf` is accepted and stripped.
pub fn validate(mut bounds: Vec<f64>) -> Result<Vec<f64>> {
    if bounds.last() == Some(&f64::INFINITY) {
        bounds.pop();
    }
    if bounds.is_empty() {
        return Err(MetricsError::InvalidBuckets(
            "at least one finite bound is required".into(),
        ));
    }
    if let Some(b) = bounds.iter().find(|b| !b.is_finite()) {
        return Err(MetricsError::InvalidBuckets(format!(
            "bound {b} is not finite"
        )));
    }
    if let Some(w) = bounds.windows(2).find(|w| w[0] >= w[1]) {
        return Err(MetricsError::InvalidBuckets(format!(
            "bounds must be strictly ascending ({} >= {})",
            w[0], w[1]
        )));
    }
    Ok(bounds)
}

/// `count` bounds starting at `start`, each `width` apart.
pub fn linear_buckets(start: f64, width: f64, count: usize) -> Result<Vec<f64>> {
    if count < 1 {
        return Err(MetricsError::InvalidBuckets(
            "linear_buckets needs a positive count".into(),
        ));
    }
    if !(width > 0.0) {
        return Err(MetricsError::InvalidBuckets(format!(
            "linear_buckets width must be positive, got {width}"
        )));
    }
    validate((0..count).map(|i| start + width * i as f64).collect())
}

/// `count` bounds where the first is `start` and each next one is `factor` times larger.
pub fn exponential_buckets(start: f64, factor: f64, count: usize) -> Result<Vec<f64>> {
    if count < 1 {
        return Err(MetricsError::InvalidBuckets(
            "exponential_buckets needs a positive count".into(),
        ));
    }
    if !(start > 0.0) {
        return Err(MetricsError::InvalidBuckets(format!(
            "exponential_buckets start must be positive, got {start}"
        )));
    }
    if !(factor > 1.0) {
        return Err(MetricsError::InvalidBuckets(format!(
            "exponential_buckets factor must be greater than 1, got {factor}"
        )));
    }
    let mut next = start;
    let mut bounds = Vec::with_capacity(count);
    for _ in 0..count {
        bounds.push(next);
        next *= factor;
    }
    validate(bounds)
}
