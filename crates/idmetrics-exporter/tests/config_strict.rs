#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use idmetrics_exporter::config;

#[test]
fn deny_unknown_fields_nested() {
    let bad = r#"
version: 1
metrics:
  namespaec: "spiffe_demo" # typo should fail
"#;

    let err = config::load_from_str(bad).expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
    assert!(err.is_fatal());
}

#[test]
fn ok_minimal_config() {
    let cfg = config::load_from_str("version: 1\n").expect("must parse");
    assert_eq!(cfg.version, 1);
    assert_eq!(cfg.exporter.listen, "0.0.0.0:9090");
    assert_eq!(cfg.metrics.namespace, "spiffe_demo");
    assert!(cfg.metrics.request_duration_buckets.is_none());
    assert!(cfg.metrics.authorization_duration_buckets.is_none());
}

#[test]
fn ok_full_config() {
    let ok = r#"
version: 1
exporter:
  listen: "127.0.0.1:9100"
metrics:
  namespace: "mesh"
  request_duration_buckets: [0.01, 0.1, 1.0]
  authorization_duration_buckets: [0.001, 0.01, .inf]
"#;
    let cfg = config::load_from_str(ok).expect("must parse");
    assert_eq!(cfg.exporter.listen_addr().unwrap().port(), 9100);
    assert_eq!(cfg.metrics.namespace, "mesh");
    assert_eq!(cfg.metrics.request_duration_buckets, Some(vec![0.01, 0.1, 1.0]));
}

#[test]
fn rejects_bad_values() {
    let cases = [
        "version: 2\n",
        "version: 1\nexporter:\n  listen: \"not-an-addr\"\n",
        "version: 1\nmetrics:\n  namespace: \"spiffe-demo\"\n",
        "version: 1\nmetrics:\n  request_duration_buckets: [1.0, 0.5]\n",
        "version: 1\nmetrics:\n  authorization_duration_buckets: []\n",
    ];
    for yaml in cases {
        let err = config::load_from_str(yaml).expect_err(yaml);
        assert_eq!(err.code().as_str(), "CONFIG", "yaml={yaml}");
    }
}

#[test]
fn empty_namespace_is_allowed() {
    let cfg = config::load_from_str("version: 1\nmetrics:\n  namespace: \"\"\n").unwrap();
    assert_eq!(cfg.metrics.namespace, "");
}

#[test]
fn missing_file_is_a_config_error() {
    let err = config::load_from_file("/nonexistent/idmetrics.yaml").expect_err("must fail");
    assert_eq!(err.code().as_str(), "CONFIG");
}
