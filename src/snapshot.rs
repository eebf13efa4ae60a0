// Snapshot assembly: pure composition of one collection cycle.

use crate::models::{BackendHealth, ContainerCounts, ContainerRecord, HostMetrics, Snapshot};

/// Milliseconds since the Unix epoch; 0 if the clock is before 1970.
pub fn now_millis() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, operation = "get_timestamp", "system time error");
            0
        })
}

/// Assemble a snapshot stamped with the current time.
pub fn assemble(
    containers: Vec<ContainerRecord>,
    backends: Vec<BackendHealth>,
    host: Option<HostMetrics>,
) -> Snapshot {
    assemble_at(now_millis(), containers, backends, host)
}

pub fn assemble_at(
    timestamp: u64,
    containers: Vec<ContainerRecord>,
    backends: Vec<BackendHealth>,
    host: Option<HostMetrics>,
) -> Snapshot {
    let counts = ContainerCounts::from_records(&containers);
    Snapshot {
        timestamp,
        containers,
        backends,
        counts,
        host,
    }
}
