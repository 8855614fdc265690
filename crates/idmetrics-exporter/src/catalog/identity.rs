use std::sync::Arc;
use std::time::{Duration, SystemTime};

use idmetrics_core::buckets::DEFAULT_BUCKETS;
use idmetrics_core::error::Result;
use idmetrics_core::{CounterVec, GaugeVec, HistogramOpts, HistogramVec, Opts};

use super::{authz, delegation, http, svid};
use crate::config::MetricsSection;
use crate::instrument::Instruments;

/// Outcome of an OPA policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthzDecision {
    Allow,
    Deny,
}

impl AuthzDecision {
    pub fn as_str(self) -> &'static str {
        match self {
            AuthzDecision::Allow => "allow",
            AuthzDecision::Deny => "deny",
        }
    }
}

impl From<bool> for AuthzDecision {
    fn from(allowed: bool) -> Self {
        if allowed {
            AuthzDecision::Allow
        } else {
            AuthzDecision::Deny
        }
    }
}

/// Outcome of a delegation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelegationResult {
    Success,
    Denied,
    Error,
}

impl DelegationResult {
    pub fn as_str(self) -> &'static str {
        match self {
            DelegationResult::Success => "success",
            DelegationResult::Denied => "denied",
            DelegationResult::Error => "error",
        }
    }
}

/// Typed handles to every identity family.
/// Register once at startup, then clone into each collaborator.
#[derive(Clone)]
pub struct IdentityMetrics {
    instruments: Instruments,
    svid_expiration_seconds: Arc<GaugeVec>,
    svid_rotations_total: Arc<CounterVec>,
    http_request_duration_seconds: Arc<HistogramVec>,
    http_requests_total: Arc<CounterVec>,
    authorization_decisions_total: Arc<CounterVec>,
    authorization_duration_seconds: Arc<HistogramVec>,
    delegations_total: Arc<CounterVec>,
}

impl IdentityMetrics {
    /// Register the seven families in `instruments`' registry.
    /// Fails on any name collision; callers should abort startup.
    pub fn register(instruments: &Instruments, cfg: &MetricsSection) -> Result<Self> {
        let registry = instruments.registry();
        let ns = cfg.namespace.as_str();

        let svid_expiration_seconds = registry.register_gauge(
            Opts::new(svid::EXPIRATION_SECONDS, "Seconds until SVID expires")
                .namespace(ns)
                .labels(svid::LABELS),
        )?;
        let svid_rotations_total = registry.register_counter(
            Opts::new(svid::ROTATIONS_TOTAL, "Total number of SVID rotations")
                .namespace(ns)
                .labels(svid::LABELS),
        )?;
        let http_request_duration_seconds = registry.register_histogram(
            HistogramOpts::new(http::REQUEST_DURATION_SECONDS, "HTTP request duration in seconds")
                .namespace(ns)
                .labels(http::LABELS)
                .buckets(
                    cfg.request_duration_buckets
                        .clone()
                        .unwrap_or_else(|| DEFAULT_BUCKETS.to_vec()),
                ),
        )?;
        let http_requests_total = registry.register_counter(
            Opts::new(http::REQUESTS_TOTAL, "Total number of HTTP requests")
                .namespace(ns)
                .labels(http::LABELS),
        )?;
        let authorization_decisions_total = registry.register_counter(
            Opts::new(authz::DECISIONS_TOTAL, "Total number of OPA authorization decisions")
                .namespace(ns)
                .labels(authz::DECISION_LABELS),
        )?;
        let authorization_duration_seconds = registry.register_histogram(
            HistogramOpts::new(
                authz::DURATION_SECONDS,
                "OPA authorization evaluation duration in seconds",
            )
            .namespace(ns)
            .labels(authz::DURATION_LABELS)
            .buckets(
                cfg.authorization_duration_buckets
                    .clone()
                    .unwrap_or_else(|| authz::DURATION_BUCKETS.to_vec()),
            ),
        )?;
        let delegations_total = registry.register_counter(
            Opts::new(delegation::ATTEMPTS_TOTAL, "Total number of delegation attempts")
                .namespace(ns)
                .labels(delegation::LABELS),
        )?;

        Ok(Self {
            instruments: instruments.clone(),
            svid_expiration_seconds,
            svid_rotations_total,
            http_request_duration_seconds,
            http_requests_total,
            authorization_decisions_total,
            authorization_duration_seconds,
            delegations_total,
        })
    }

    fn swallow(&self, name: &str, res: Result<()>) {
        if let Err(e) = res {
            self.instruments.report(name, &e);
        }
    }

    /// Set the seconds-to-expiry gauge from the SVID's `NotAfter`.
    /// Already-expired SVIDs report a negative value.
    pub fn record_svid_expiry(&self, service: &str, spiffe_id: &str, expires_at: SystemTime) {
        let secs = match expires_at.duration_since(SystemTime::now()) {
            Ok(left) => left.as_secs_f64(),
            Err(past) => -past.duration().as_secs_f64(),
        };
        self.set_svid_seconds_to_expiry(service, spiffe_id, secs);
    }

    pub fn set_svid_seconds_to_expiry(&self, service: &str, spiffe_id: &str, secs: f64) {
        let res = self.svid_expiration_seconds.set(&[service, spiffe_id], secs);
        self.swallow(self.svid_expiration_seconds.name(), res);
    }

    pub fn record_svid_rotation(&self, service: &str, spiffe_id: &str) {
        let res = self.svid_rotations_total.inc(&[service, spiffe_id]);
        self.swallow(self.svid_rotations_total.name(), res);
    }

    /// Count the request and record its latency under the same labels.
    pub fn record_request(
        &self,
        service: &str,
        method: &str,
        path: &str,
        status: u16,
        elapsed: Duration,
    ) {
        let status = status.to_string();
        let labels = [service, method, path, status.as_str()];

        let res = self.http_requests_total.inc(&labels);
        self.swallow(self.http_requests_total.name(), res);

        let res = self
            .http_request_duration_seconds
            .observe(&labels, elapsed.as_secs_f64());
        self.swallow(self.http_request_duration_seconds.name(), res);
    }

    /// Count the decision and record how long OPA took to reach it.
    pub fn record_authorization(
        &self,
        service: &str,
        decision: AuthzDecision,
        caller_type: &str,
        elapsed: Duration,
    ) {
        let res = self
            .authorization_decisions_total
            .inc(&[service, decision.as_str(), caller_type]);
        self.swallow(self.authorization_decisions_total.name(), res);

        let res = self
            .authorization_duration_seconds
            .observe(&[service], elapsed.as_secs_f64());
        self.swallow(self.authorization_duration_seconds.name(), res);
    }

    pub fn record_delegation(&self, user: &str, agent: &str, result: DelegationResult) {
        let res = self.delegations_total.inc(&[user, agent, result.as_str()]);
        self.swallow(self.delegations_total.name(), res);
    }
}
