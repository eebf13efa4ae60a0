// Backend health probes (MySQL, Redis).
//
// A probe makes one bounded connection attempt, runs a few read-only status
// queries and reports. All failures are folded into a `BackendHealth` here.

mod mysql;
mod redis;

pub use mysql::MySqlProbe;
pub use self::redis::RedisProbe;

use std::collections::BTreeMap;
use std::time::Duration;

use crate::models::{BackendHealth, BackendKind, BackendState};

/// Why a probe could not produce a report.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    #[error("connection failed: {0}")]
    Unreachable(String),
    #[error("no response within {timeout_ms} ms")]
    Timeout { timeout_ms: u64 },
    #[error("connection rejected: {0}")]
    Rejected(String),
    #[error("query `{query}` failed: {reason}")]
    Query { query: String, reason: String },
}

impl ProbeError {
    /// Unreachable services are `Unavailable`; anything that got an answer is `Error`.
    pub fn state(&self) -> BackendState {
        match self {
            ProbeError::Unreachable(_) | ProbeError::Timeout { .. } => BackendState::Unavailable,
            ProbeError::Rejected(_) | ProbeError::Query { .. } => BackendState::Error,
        }
    }
}

/// What a successful probe found.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProbeReport {
    pub version: Option<String>,
    pub uptime_seconds: Option<u64>,
    pub metrics: BTreeMap<String, String>,
}

#[async_trait::async_trait]
pub trait BackendProbe: Send + Sync {
    fn kind(&self) -> BackendKind;

    /// Upper bound for the whole probe, connection included.
    fn timeout(&self) -> Duration;

    /// One connection attempt plus status queries. The connection is closed before returning.
    async fn check(&self) -> Result<ProbeReport, ProbeError>;
}

/// Run a probe to completion. Never fails: errors and timeouts come back as
/// `Unavailable`/`Error` health with empty metrics.
pub async fn probe(backend: &dyn BackendProbe) -> BackendHealth {
    let kind = backend.kind();
    let timeout = backend.timeout();
    let result = match tokio::time::timeout(timeout, backend.check()).await {
        Ok(r) => r,
        Err(_) => Err(ProbeError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }),
    };
    health_from_result(kind, result)
}

pub fn health_from_result(
    kind: BackendKind,
    result: Result<ProbeReport, ProbeError>,
) -> BackendHealth {
    match result {
        Ok(report) => {
            tracing::debug!(backend = kind.display_name(), "backend connected");
            BackendHealth {
                service: kind,
                state: BackendState::Connected,
                version: report.version,
                uptime_seconds: report.uptime_seconds,
                metrics: report.metrics,
                message: format!("{} connected", kind.display_name()),
            }
        }
        Err(e) => {
            tracing::warn!(
                backend = kind.display_name(),
                error = %e,
                operation = "probe",
                "backend probe failed"
            );
            BackendHealth {
                service: kind,
                state: e.state(),
                version: None,
                uptime_seconds: None,
                metrics: BTreeMap::new(),
                message: format!("{} {}", kind.display_name(), e),
            }
        }
    }
}

/// `HH:MM:SS`, prefixed with whole days when longer than a day.
pub fn format_uptime(secs: u64) -> String {
    let days = secs / 86_400;
    let rem = secs % 86_400;
    let hms = format!("{:02}:{:02}:{:02}", rem / 3600, (rem % 3600) / 60, rem % 60);
    if days > 0 {
        format!("{}d {}", days, hms)
    } else {
        hms
    }
}
