//! Identity metric catalog.
//!
//! The fixed set of families recorded by SPIFFE-enabled services: SVID
//! lifecycle, HTTP traffic, OPA authorization outcomes and delegation
//! attempts. Names below are unprefixed; the configured namespace is joined
//! in front at registration (`spiffe_demo_svid_rotations_total`, ...).

pub mod identity;

pub use identity::{AuthzDecision, DelegationResult, IdentityMetrics};

/// SVID lifecycle.
pub mod svid {
    /// Seconds until the SVID expires (gauge; service, spiffe_id)
    pub const EXPIRATION_SECONDS: &str = "svid_expiration_seconds";
    /// Number of SVID rotations (counter; service, spiffe_id)
    pub const ROTATIONS_TOTAL: &str = "svid_rotations_total";

    pub const LABELS: [&str; 2] = ["service", "spiffe_id"];
}

/// HTTP request traffic.
pub mod http {
    /// Request latency in seconds (histogram; service, method, path, status)
    pub const REQUEST_DURATION_SECONDS: &str = "http_request_duration_seconds";
    /// Number of requests (counter; service, method, path, status)
    pub const REQUESTS_TOTAL: &str = "http_requests_total";

    pub const LABELS: [&str; 4] = ["service", "method", "path", "status"];
}

/// OPA authorization.
pub mod authz {
    /// Number of policy decisions (counter; service, decision, caller_type)
    pub const DECISIONS_TOTAL: &str = "authorization_decisions_total";
    /// Policy evaluation latency in seconds (histogram; service)
    pub const DURATION_SECONDS: &str = "authorization_duration_seconds";

    pub const DECISION_LABELS: [&str; 3] = ["service", "decision", "caller_type"];
    pub const DURATION_LABELS: [&str; 1] = ["service"];

    /// 1ms to 1s.
    pub const DURATION_BUCKETS: &[f64] = &[0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0];
}

/// User-to-agent delegation.
pub mod delegation {
    /// Number of delegation attempts (counter; user, agent, result)
    pub const ATTEMPTS_TOTAL: &str = "delegations_total";

    pub const LABELS: [&str; 3] = ["user", "agent", "result"];
}

/// Join `namespace` and `name` the way registration does.
pub fn qualified(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{namespace}_{name}")
    }
}
