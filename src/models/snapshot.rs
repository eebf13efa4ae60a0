// Snapshot model: one collection cycle

use serde::{Deserialize, Serialize};

use super::{BackendHealth, ContainerRecord, HostMetrics};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerCounts {
    pub total: usize,
    pub running: usize,
    pub stopped: usize,
}

impl ContainerCounts {
    pub fn from_records(records: &[ContainerRecord]) -> Self {
        let total = records.len();
        let running = records.iter().filter(|r| r.is_running).count();
        Self {
            total,
            running,
            stopped: total - running,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Unix epoch milliseconds at assembly time.
    pub timestamp: u64,
    pub containers: Vec<ContainerRecord>,
    pub backends: Vec<BackendHealth>,
    pub counts: ContainerCounts,
    /// Absent when host metrics could not be read this cycle.
    #[serde(default)]
    pub host: Option<HostMetrics>,
}
