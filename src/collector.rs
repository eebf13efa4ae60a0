// One collection cycle: inventory, backend probes and host metrics run concurrently,
// then the results are assembled into a snapshot.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::inventory::{self, ContainerInventoryProvider, ParseReport};
use crate::models::{BackendHealth, BackendState, HostMetrics, Snapshot};
use crate::probe::{self, BackendProbe, MySqlProbe, RedisProbe};
use crate::snapshot;
use crate::sysinfo_repo::SysinfoRepo;

pub struct Collector {
    provider: Arc<dyn ContainerInventoryProvider>,
    probes: Vec<Arc<dyn BackendProbe>>,
    sysinfo_repo: Arc<SysinfoRepo>,
}

impl Collector {
    pub fn new(
        provider: Arc<dyn ContainerInventoryProvider>,
        probes: Vec<Arc<dyn BackendProbe>>,
        sysinfo_repo: Arc<SysinfoRepo>,
    ) -> Self {
        Self {
            provider,
            probes,
            sysinfo_repo,
        }
    }

    /// Provider from `[inventory]`, MySQL then Redis probes.
    pub fn from_config(config: &AppConfig) -> Self {
        let probes: Vec<Arc<dyn BackendProbe>> = vec![
            Arc::new(MySqlProbe::new(config.mysql.clone())),
            Arc::new(RedisProbe::new(config.redis.clone())),
        ];
        Self::new(
            inventory::provider_from_config(&config.inventory),
            probes,
            Arc::new(SysinfoRepo::new()),
        )
    }

    /// Fresh snapshot. Never fails; every degraded source is represented in the result.
    #[tracing::instrument(skip(self), fields(operation = "collect_snapshot"))]
    pub async fn collect(&self) -> Snapshot {
        let (report, backends, host) = tokio::join!(
            self.collect_containers(),
            self.collect_backends(),
            self.collect_host()
        );
        let snap = snapshot::assemble(report.records, backends, host);
        tracing::debug!(
            containers = snap.counts.total,
            running = snap.counts.running,
            backends = snap.backends.len(),
            "snapshot assembled"
        );
        snap
    }

    pub async fn collect_containers(&self) -> ParseReport {
        inventory::collect(self.provider.as_ref()).await
    }

    /// All probes run concurrently; results keep the configured order.
    pub async fn collect_backends(&self) -> Vec<BackendHealth> {
        let handles: Vec<_> = self
            .probes
            .iter()
            .map(|p| {
                let p = p.clone();
                (p.kind(), tokio::spawn(async move { probe::probe(p.as_ref()).await }))
            })
            .collect();

        let mut backends = Vec::with_capacity(handles.len());
        for (kind, handle) in handles {
            match handle.await {
                Ok(health) => backends.push(health),
                Err(e) => {
                    tracing::warn!(
                        backend = kind.display_name(),
                        error = %e,
                        operation = "probe",
                        "probe task failed"
                    );
                    backends.push(BackendHealth {
                        service: kind,
                        state: BackendState::Error,
                        version: None,
                        uptime_seconds: None,
                        metrics: BTreeMap::new(),
                        message: format!("{} probe failed: {}", kind.display_name(), e),
                    });
                }
            }
        }
        backends
    }

    pub async fn collect_host(&self) -> Option<HostMetrics> {
        match self.sysinfo_repo.get_host_metrics().await {
            Ok(host) => Some(host),
            Err(e) => {
                tracing::warn!(error = %e, operation = "get_host_metrics", "host metrics unavailable");
                None
            }
        }
    }
}
