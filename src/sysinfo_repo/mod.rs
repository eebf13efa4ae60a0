// Host metrics via sysinfo

mod linux;

use crate::models::{HostMetrics, LoadAverage};
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use sysinfo::{Networks, System};
use tracing::instrument;

/// Interfaces created by container runtimes; never the address a developer wants to see.
const VIRTUAL_IFACE_PREFIXES: &[&str] = &["docker", "br-", "veth", "virbr", "cni", "flannel"];

pub struct SysinfoRepo {
    sys: Arc<Mutex<System>>,
    networks: Arc<Mutex<Networks>>,
    last_cpu_refresh: Arc<Mutex<Option<(Instant, f64)>>>,
}

impl Default for SysinfoRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl SysinfoRepo {
    pub fn new() -> Self {
        let mut sys = System::new();
        sys.refresh_memory();
        sys.refresh_cpu_all();
        Self {
            sys: Arc::new(Mutex::new(sys)),
            networks: Arc::new(Mutex::new(Networks::new_with_refreshed_list())),
            // The refresh above is the first sample; usage reads 0.0 until the next one.
            last_cpu_refresh: Arc::new(Mutex::new(Some((Instant::now(), 0.0)))),
        }
    }

    #[instrument(skip(self), fields(repo = "sysinfo", operation = "get_host_metrics"))]
    pub async fn get_host_metrics(&self) -> anyhow::Result<HostMetrics> {
        let sys = self.sys.clone();
        let networks = self.networks.clone();
        let last_cpu_refresh = self.last_cpu_refresh.clone();
        tokio::task::spawn_blocking(move || {
            let mut sys = sys
                .lock()
                .map_err(|e| anyhow::anyhow!("sysinfo lock poisoned: {}", e))?;

            let now = Instant::now();
            let cpu_usage = match last_cpu_refresh.lock() {
                Ok(mut guard) => match cached_cpu_usage(*guard, now) {
                    Some(usage) => usage,
                    None => {
                        sys.refresh_cpu_all();
                        let usage = sys.global_cpu_usage() as f64;
                        *guard = Some((now, usage));
                        usage
                    }
                },
                Err(_) => {
                    sys.refresh_cpu_all();
                    sys.global_cpu_usage() as f64
                }
            };

            sys.refresh_memory();
            let memory_total = sys.total_memory();
            let memory_used = memory_total.saturating_sub(sys.available_memory());
            let memory_usage_percent = if memory_total > 0 {
                (memory_used as f64 / memory_total as f64) * 100.0
            } else {
                0.0
            };

            let cpu_model = linux::read_cpu_model_linux()
                .or_else(|| {
                    sys.cpus()
                        .first()
                        .map(|c| c.brand().trim().to_string())
                        .filter(|s| !s.is_empty())
                })
                .unwrap_or_else(|| "Unknown".into());

            let load = System::load_average();
            let local_ip = match networks.lock() {
                Ok(mut guard) => {
                    guard.refresh(true);
                    primary_ipv4(
                        guard
                            .list()
                            .iter()
                            .flat_map(|(name, data)| {
                                data.ip_networks().iter().map(move |n| (name.as_str(), n.addr))
                            }),
                    )
                }
                Err(e) => {
                    tracing::warn!(error = %e, "sysinfo networks lock poisoned");
                    None
                }
            };

            Ok(HostMetrics {
                hostname: System::host_name().unwrap_or_default(),
                os_name: linux::read_os_pretty_name_linux()
                    .or_else(System::name)
                    .unwrap_or_else(|| std::env::consts::OS.into()),
                os_version: System::os_version().unwrap_or_default(),
                cpu_model,
                logical_cores: sys.cpus().len() as u32,
                cpu_usage_percent: cpu_usage.clamp(0.0, 100.0),
                memory_total_bytes: memory_total,
                memory_used_bytes: memory_used,
                memory_usage_percent,
                uptime_secs: System::uptime(),
                load_average: LoadAverage {
                    one: load.one,
                    five: load.five,
                    fifteen: load.fifteen,
                },
                local_ip,
            })
        })
        .await
        .map_err(|e| anyhow::anyhow!("sysinfo task join: {}", e))?
    }
}

/// Usage needs two refreshes spaced by the minimum interval; reuse the last value
/// when called again too soon.
fn cached_cpu_usage(last: Option<(Instant, f64)>, now: Instant) -> Option<f64> {
    let (prev_ts, prev_usage) = last?;
    (now.duration_since(prev_ts) < sysinfo::MINIMUM_CPU_UPDATE_INTERVAL).then_some(prev_usage)
}

/// First non-loopback, non-link-local IPv4, preferring physical-looking interfaces.
/// Interfaces are considered in name order so the pick is stable between calls.
fn primary_ipv4<'a>(addrs: impl Iterator<Item = (&'a str, IpAddr)>) -> Option<String> {
    let mut candidates: Vec<(bool, &str, IpAddr)> = addrs
        .filter(|(_, addr)| match addr {
            IpAddr::V4(v4) => !v4.is_loopback() && !v4.is_link_local() && !v4.is_unspecified(),
            IpAddr::V6(_) => false,
        })
        .map(|(name, addr)| {
            let is_virtual = VIRTUAL_IFACE_PREFIXES.iter().any(|p| name.starts_with(p));
            (is_virtual, name, addr)
        })
        .collect();
    candidates.sort();
    candidates.first().map(|(_, _, addr)| addr.to_string())
}
