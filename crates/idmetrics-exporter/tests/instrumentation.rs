//! The name-based API drops invalid updates instead of failing callers.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use idmetrics_core::{ErrorCode, HistogramOpts, Opts, Registry};
use idmetrics_exporter::instrument::Instruments;

fn setup() -> Instruments {
    let registry = Arc::new(Registry::new());
    registry
        .register_counter(Opts::new("requests_total", "Requests.").labels(["service", "status"]))
        .unwrap();
    registry
        .register_gauge(Opts::new("expiry_seconds", "Expiry.").labels(["service"]))
        .unwrap();
    registry
        .register_histogram(HistogramOpts::new("latency_seconds", "Latency.").buckets(vec![0.1, 0.5, 1.0]))
        .unwrap();
    Instruments::new(registry, "test").unwrap()
}

#[test]
fn valid_updates_land() {
    let inst = setup();
    inst.increment("requests_total", &["web", "200"], 1.0);
    inst.increment("requests_total", &["web", "200"], 2.0);
    inst.set("expiry_seconds", &["web"], 42.0);
    inst.observe("latency_seconds", &[], 0.3);

    let text = inst.export_text();
    assert!(text.contains("requests_total{service=\"web\",status=\"200\"} 3\n"));
    assert!(text.contains("expiry_seconds{service=\"web\"} 42\n"));
    assert!(text.contains("latency_seconds_bucket{le=\"0.5\"} 1\n"));
    assert!(text.contains("latency_seconds_count 1\n"));
}

#[test]
fn invalid_updates_are_dropped_and_counted() {
    let inst = setup();

    inst.increment("nope_total", &[], 1.0);
    inst.increment("requests_total", &["web"], 1.0);
    inst.increment("requests_total", &["web", "200"], -1.0);
    inst.set("requests_total", &["web", "200"], 5.0);
    inst.observe("latency_seconds", &["extra"], 0.1);

    assert_eq!(inst.dropped(ErrorCode::UnknownMetric), 1.0);
    assert_eq!(inst.dropped(ErrorCode::SchemaMismatch), 2.0);
    assert_eq!(inst.dropped(ErrorCode::InvalidDelta), 1.0);
    assert_eq!(inst.dropped(ErrorCode::WrongKind), 1.0);
    assert_eq!(inst.dropped(ErrorCode::DuplicateMetric), 0.0);

    let text = inst.export_text();
    assert!(text.contains(
        "test_metrics_dropped_updates_total{reason=\"SCHEMA_MISMATCH\"} 2\n"
    ));
    // dropped updates leave no trace in their target families
    assert!(!text.contains("requests_total{service=\"web\",status=\"200\"}"));
    assert!(!text.contains("latency_seconds_count"));
}

#[test]
fn try_variants_surface_errors() {
    let inst = setup();
    let err = inst.try_increment("missing", &[], 1.0).expect_err("unknown");
    assert_eq!(err.code(), ErrorCode::UnknownMetric);
    assert!(!err.is_fatal());

    let err = inst.try_observe("expiry_seconds", &["web"], 1.0).expect_err("wrong kind");
    assert_eq!(err.code(), ErrorCode::WrongKind);

    inst.try_set("expiry_seconds", &["web"], -3.0).unwrap();
    assert_eq!(inst.dropped(ErrorCode::WrongKind), 0.0);
}

#[test]
fn second_instruments_on_same_registry_collides() {
    let registry = Arc::new(Registry::new());
    Instruments::new(Arc::clone(&registry), "dup").unwrap();
    let err = Instruments::new(registry, "dup").err().expect("duplicate");
    assert_eq!(err.code(), ErrorCode::DuplicateMetric);
}
