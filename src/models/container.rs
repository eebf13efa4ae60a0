// Container inventory models

use serde::{Deserialize, Serialize};

/// Name of the placeholder record used when the listing parsed to nothing.
pub const NO_CONTAINERS: &str = "no_containers";
/// Name of the placeholder record used when the listing tool failed or is missing.
pub const DOCKER_UNAVAILABLE: &str = "docker_unavailable";
/// Shown as `uptime_display` for containers that are not running.
pub const STOPPED_MARKER: &str = "Stopped";

/// What a container is for; serializes to lowercase JSON (e.g. "database").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerCategory {
    Web,
    Database,
    Cache,
    Runtime,
    Tool,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerRecord {
    pub name: String,
    pub raw_status_text: String,
    pub is_running: bool,
    pub label: String,
    pub category: ContainerCategory,
    pub uptime_display: String,
    /// Set only on the synthetic rows below; a real container may share their names.
    #[serde(default)]
    pub placeholder: bool,
}

impl ContainerRecord {
    /// Stand-in row when there is nothing real to show.
    pub fn no_containers() -> Self {
        Self {
            name: NO_CONTAINERS.to_string(),
            raw_status_text: String::new(),
            is_running: false,
            label: "No containers found".to_string(),
            category: ContainerCategory::Unknown,
            uptime_display: "Run docker compose up to start the containers".to_string(),
            placeholder: true,
        }
    }

    /// Stand-in row when the listing tool is missing or failed. `detail` replaces the
    /// default hint when the tool reported something more specific.
    pub fn docker_unavailable(detail: Option<&str>) -> Self {
        let detail = detail
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or("Docker is not installed or not running");
        Self {
            name: DOCKER_UNAVAILABLE.to_string(),
            raw_status_text: detail.to_string(),
            is_running: false,
            label: "Docker unavailable".to_string(),
            category: ContainerCategory::Unknown,
            uptime_display: detail.to_string(),
            placeholder: true,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.placeholder
    }
}
