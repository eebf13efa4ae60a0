// GET handlers: version, snapshot, containers, backends

use axum::{extract::State, response::IntoResponse};

use super::AppState;
use crate::models::ContainerCounts;

const NAME: &str = env!("CARGO_PKG_NAME");
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// GET /version — service name and version from Cargo.toml at build time.
pub(super) async fn version_handler() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/snapshot — one fresh collection cycle.
pub(super) async fn snapshot_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.collector.collect().await)
}

/// GET /api/containers — inventory only, with counts.
pub(super) async fn containers_handler(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.collector.collect_containers().await;
    let counts = ContainerCounts::from_records(&report.records);
    axum::Json(serde_json::json!({
        "containers": report.records,
        "counts": counts,
    }))
}

/// GET /api/backends — MySQL and Redis health.
pub(super) async fn backends_handler(State(state): State<AppState>) -> impl IntoResponse {
    axum::Json(state.collector.collect_backends().await)
}
