// Shared test helpers

#![allow(dead_code)]

use devdash::classifier::classify;
use devdash::inventory::{ContainerInventoryProvider, RawListing};
use devdash::models::*;
use devdash::probe::{BackendProbe, ProbeError, ProbeReport};
use std::collections::BTreeMap;
use std::time::Duration;

pub fn record(name: &str, status: &str, is_running: bool) -> ContainerRecord {
    let c = classify(name, "");
    ContainerRecord {
        name: name.to_string(),
        raw_status_text: status.to_string(),
        is_running,
        label: c.label,
        category: c.category,
        uptime_display: if is_running {
            status.to_string()
        } else {
            STOPPED_MARKER.to_string()
        },
        placeholder: false,
    }
}

/// Provider that always returns the same listing.
pub struct FixedProvider(pub RawListing);

#[async_trait::async_trait]
impl ContainerInventoryProvider for FixedProvider {
    async fn list_containers(&self) -> RawListing {
        self.0.clone()
    }
}

/// Probe with a canned outcome.
pub struct FakeProbe {
    pub kind: BackendKind,
    pub connected: bool,
}

#[async_trait::async_trait]
impl BackendProbe for FakeProbe {
    fn kind(&self) -> BackendKind {
        self.kind
    }

    fn timeout(&self) -> Duration {
        Duration::from_millis(500)
    }

    async fn check(&self) -> Result<ProbeReport, ProbeError> {
        if !self.connected {
            return Err(ProbeError::Unreachable("Connection refused".into()));
        }
        let mut metrics = BTreeMap::new();
        metrics.insert("uptime".to_string(), "00:01:00".to_string());
        Ok(ProbeReport {
            version: Some("1.0".into()),
            uptime_seconds: Some(60),
            metrics,
        })
    }
}
