// Backend health models

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which backing service a health result describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Relational,
    Cache,
}

impl BackendKind {
    pub fn display_name(self) -> &'static str {
        match self {
            BackendKind::Relational => "MySQL",
            BackendKind::Cache => "Redis",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendState {
    Connected,
    Unavailable,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackendHealth {
    pub service: BackendKind,
    pub state: BackendState,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub uptime_seconds: Option<u64>,
    #[serde(default)]
    pub metrics: BTreeMap<String, String>,
    pub message: String,
}

impl BackendHealth {
    pub fn is_connected(&self) -> bool {
        self.state == BackendState::Connected
    }
}
