// Domain models

mod backend;
mod container;
mod host;
mod snapshot;

pub use backend::{BackendHealth, BackendKind, BackendState};
pub use container::{
    ContainerCategory, ContainerRecord, DOCKER_UNAVAILABLE, NO_CONTAINERS, STOPPED_MARKER,
};
pub use host::{HostMetrics, LoadAverage};
pub use snapshot::{ContainerCounts, Snapshot};
