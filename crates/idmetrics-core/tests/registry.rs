//! Registration rules and end-to-end counter behaviour.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use idmetrics_core::{CounterVec, Family, GaugeVec, HistogramOpts, MetricKind, Opts, Registry, SeriesValue};

#[test]
fn requests_total_scenario() {
    let registry = Registry::new();
    let c = registry
        .register_counter(Opts::new("requests_total", "Total requests.").labels(["service", "status"]))
        .unwrap();

    for _ in 0..3 {
        c.inc(&["web", "200"]).unwrap();
    }
    c.inc(&["web", "500"]).unwrap();

    let text = registry.export_text();
    let series: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
    assert_eq!(
        series,
        vec![
            r#"requests_total{service="web",status="200"} 3"#,
            r#"requests_total{service="web",status="500"} 1"#,
        ]
    );
}

#[test]
fn duplicate_name_is_rejected() {
    let registry = Registry::new();
    registry.register_counter(Opts::new("dup_total", "first")).unwrap();

    let err = registry.register_gauge(Opts::new("dup_total", "second")).expect_err("must fail");
    assert_eq!(err.code().as_str(), "DUPLICATE_METRIC");
    assert!(err.is_fatal());
    assert_eq!(registry.len(), 1);
    assert_eq!(registry.get("dup_total").unwrap().kind(), MetricKind::Counter);
}

#[test]
fn namespace_and_subsystem_build_the_name() {
    let opts = Opts::new("rotations_total", "x").namespace("spiffe_demo").subsystem("svid");
    assert_eq!(opts.fq_name(), "spiffe_demo_svid_rotations_total");
    assert_eq!(Opts::new("plain", "x").namespace("ns").fq_name(), "ns_plain");
}

#[test]
fn invalid_names_are_rejected() {
    let registry = Registry::new();

    let err = registry.register_counter(Opts::new("", "empty")).expect_err("empty name");
    assert_eq!(err.code().as_str(), "INVALID_METRIC_NAME");

    let err = registry
        .register_counter(Opts::new("", "bare namespace").namespace("spiffe_demo"))
        .expect_err("empty name under a namespace");
    assert_eq!(err.code().as_str(), "INVALID_METRIC_NAME");

    let err = registry.register_counter(Opts::new("9lives", "digit")).expect_err("leading digit");
    assert_eq!(err.code().as_str(), "INVALID_METRIC_NAME");

    let err = registry
        .register_counter(Opts::new("ok_total", "x").labels(["caller-type"]))
        .expect_err("dash in label");
    assert_eq!(err.code().as_str(), "INVALID_LABEL_NAME");

    let err = registry
        .register_counter(Opts::new("ok_total", "x").labels(["__reserved"]))
        .expect_err("reserved prefix");
    assert_eq!(err.code().as_str(), "INVALID_LABEL_NAME");

    let err = registry
        .register_counter(Opts::new("ok_total", "x").labels(["service", "service"]))
        .expect_err("repeated label");
    assert_eq!(err.code().as_str(), "INVALID_LABEL_NAME");

    let err = registry
        .register_histogram(HistogramOpts::new("ok_seconds", "x").labels(["le"]))
        .expect_err("le is reserved on histograms");
    assert_eq!(err.code().as_str(), "INVALID_LABEL_NAME");

    assert!(registry.is_empty());
}

#[test]
fn schema_mismatch_is_reported() {
    let c = CounterVec::new(Opts::new("x_total", "x").labels(["service", "status"])).unwrap();
    let err = c.inc(&["web"]).expect_err("arity");
    assert_eq!(
        err,
        idmetrics_core::MetricsError::SchemaMismatch { expected: 2, got: 1 }
    );
    assert!(!err.is_fatal());
    assert!(c.is_empty());
}

#[test]
fn negative_increment_is_rejected() {
    let c = CounterVec::new(Opts::new("x_total", "x").labels(["service"])).unwrap();
    c.inc_by(&["web"], 2.0).unwrap();

    let err = c.inc_by(&["web"], -1.0).expect_err("negative delta");
    assert_eq!(err.code().as_str(), "INVALID_DELTA");
    assert_eq!(c.get_or_create(&["web"]).unwrap().get(), 2.0);

    let err = c.inc_by(&["web"], f64::NAN).expect_err("nan delta");
    assert_eq!(err.code().as_str(), "INVALID_DELTA");
    assert_eq!(c.get_or_create(&["web"]).unwrap().get(), 2.0);
}

#[test]
fn rejected_increment_creates_no_series() {
    let registry = Registry::new();
    let c = registry
        .register_counter(Opts::new("requests_total", "x").labels(["service", "status"]))
        .unwrap();
    c.inc(&["web", "200"]).unwrap();

    let err = c.inc_by(&["web", "404"], -1.0).expect_err("negative delta");
    assert_eq!(err.code().as_str(), "INVALID_DELTA");
    assert_eq!(c.len(), 1);
    assert!(c.get(&["web", "404"]).unwrap().is_none());
    assert!(!registry.export_text().contains("status=\"404\""));
}

#[test]
fn lookup_by_name_and_kind() {
    let registry = Registry::new();
    registry.register_gauge(Opts::new("g", "gauge")).unwrap();

    let err = registry.get("missing").expect_err("unknown");
    assert_eq!(err.code().as_str(), "UNKNOWN_METRIC");

    let fam = registry.get("g").unwrap();
    let err = fam.as_counter().expect_err("gauge is not a counter");
    assert_eq!(err.code().as_str(), "WRONG_KIND");
    assert_eq!(err.to_string(), "metric g is a gauge, not a counter");

    fam.as_gauge().unwrap().set(&[], 4.0).unwrap();
    assert_eq!(registry.snapshot().family("g").unwrap().series[0].value, SeriesValue::Gauge(4.0));
}

#[test]
fn families_keep_registration_order() {
    let registry = Registry::new();
    let names = ["zeta_total", "alpha", "mid_seconds"];
    registry.register_counter(Opts::new(names[0], "z")).unwrap();
    registry.register(Arc::new(GaugeVec::new(Opts::new(names[1], "a")).unwrap())).unwrap();
    registry.register_histogram(HistogramOpts::new(names[2], "m")).unwrap();

    let got: Vec<String> = registry.families().iter().map(|f| f.name().to_string()).collect();
    assert_eq!(got, names);
    assert!(matches!(registry.families()[2], Family::Histogram(_)));
}

#[test]
fn gauge_moves_both_ways() {
    let g = GaugeVec::new(Opts::new("inflight", "x").labels(["service"])).unwrap();
    let cell = g.get_or_create(&["web"]).unwrap();
    cell.inc();
    cell.inc();
    cell.dec();
    cell.add(2.5);
    cell.sub(0.5);
    assert_eq!(cell.get(), 3.0);
    g.set(&["web"], -7.0).unwrap();
    assert_eq!(cell.get(), -7.0);
}

#[test]
fn describe_reports_schema() {
    let h = idmetrics_core::HistogramVec::new(
        HistogramOpts::new("lat_seconds", "Latency.").labels(["service"]).buckets(vec![0.1, 1.0]),
    )
    .unwrap();
    let d = h.describe();
    assert_eq!(d.name, "lat_seconds");
    assert_eq!(d.kind, MetricKind::Histogram);
    assert_eq!(d.help, "Latency.");
    assert_eq!(d.label_names, vec!["service".to_string()]);
    assert_eq!(d.buckets, Some(vec![0.1, 1.0]));
}

#[test]
fn json_snapshot_spells_out_non_finite_values() {
    let registry = Registry::new();
    let g = registry.register_gauge(Opts::new("skew_seconds", "x").labels(["service"])).unwrap();
    g.set(&["web"], f64::INFINITY).unwrap();
    g.set(&["api"], 1.5).unwrap();
    let h = registry
        .register_histogram(HistogramOpts::new("lat_seconds", "x").buckets(vec![1.0]))
        .unwrap();
    h.observe(&[], f64::NAN).unwrap();

    let json = serde_json::to_value(registry.snapshot()).unwrap();
    let gauge = &json["families"][0]["series"];
    assert_eq!(gauge[0]["label_values"], serde_json::json!(["web"]));
    assert_eq!(gauge[0]["value"], serde_json::json!("+Inf"));
    assert_eq!(gauge[1]["value"], serde_json::json!(1.5));

    let hist = &json["families"][1]["series"][0]["value"];
    assert_eq!(hist["sum"], serde_json::json!("NaN"));
    assert_eq!(hist["count"], serde_json::json!(1));
    assert_eq!(hist["buckets"][0], serde_json::json!({"le": 1.0, "count": 0}));
}
