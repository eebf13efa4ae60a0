// Container listing via the Docker daemon socket (bollard), rendered to the same
// tab-separated text the CLI provider returns.

use bollard::Docker;
use bollard::models::ContainerSummary;
use bollard::query_parameters::ListContainersOptions;
use std::time::Duration;
use tokio::time::Instant;

use super::{ContainerInventoryProvider, RawListing};

pub struct DockerApiInventoryProvider {
    timeout: Duration,
}

impl DockerApiInventoryProvider {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait::async_trait]
impl ContainerInventoryProvider for DockerApiInventoryProvider {
    #[tracing::instrument(skip(self), fields(provider = "docker_api", operation = "list_containers"))]
    async fn list_containers(&self) -> RawListing {
        let deadline = Instant::now() + self.timeout;
        let docker = match Docker::connect_with_local_defaults() {
            Ok(d) => d,
            Err(e) => {
                tracing::debug!(error = %e, "docker connect failed");
                return RawListing::ToolUnavailable;
            }
        };

        match tokio::time::timeout_at(deadline, docker.version()).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "docker version failed");
                return RawListing::ToolUnavailable;
            }
            Err(_) => return RawListing::ExecutionError(self.timeout_message()),
        }

        let options = ListContainersOptions {
            all: true,
            ..Default::default()
        };
        match tokio::time::timeout_at(deadline, docker.list_containers(Some(options))).await {
            Ok(Ok(containers)) => RawListing::Ok(render_listing(&containers)),
            Ok(Err(e)) => RawListing::ExecutionError(format!("docker list_containers: {}", e)),
            Err(_) => RawListing::ExecutionError(self.timeout_message()),
        }
    }
}

impl DockerApiInventoryProvider {
    fn timeout_message(&self) -> String {
        format!(
            "docker daemon did not answer within {} ms",
            self.timeout.as_millis()
        )
    }
}

/// One `NAME\tSTATUS\tIMAGE` line per container; names lose their leading `/`.
fn render_listing(containers: &[ContainerSummary]) -> String {
    let mut out = String::new();
    for c in containers {
        let name = c
            .names
            .as_ref()
            .and_then(|n| n.first())
            .map(|n| n.trim_start_matches('/').to_string())
            .or_else(|| c.id.clone())
            .unwrap_or_default();
        let status = c.status.as_deref().unwrap_or_default();
        let image = c.image.as_deref().unwrap_or_default();
        out.push_str(&field(&name));
        out.push('\t');
        out.push_str(&field(status));
        out.push('\t');
        out.push_str(&field(image));
        out.push('\n');
    }
    out
}

fn field(s: &str) -> String {
    s.replace(['\t', '\n', '\r'], " ")
}
