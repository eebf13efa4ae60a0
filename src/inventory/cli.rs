// Container listing via the docker CLI (or any tool honoring the same text contract).

use std::process::{Output, Stdio};
use tokio::process::Command;
use tokio::time::Instant;

use super::{ContainerInventoryProvider, RawListing};
use crate::config::InventoryConfig;

#[derive(Debug, thiserror::Error)]
enum InvokeError {
    #[error("`{program}` not found")]
    NotFound { program: String },
    #[error("failed to run `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{program}` timed out after {timeout_ms} ms")]
    Timeout { program: String, timeout_ms: u64 },
}

pub struct CliInventoryProvider {
    config: InventoryConfig,
}

impl CliInventoryProvider {
    pub fn new(config: InventoryConfig) -> Self {
        Self { config }
    }

    /// Run the configured program once. The child is killed if `deadline` passes first.
    async fn run(&self, args: &[String], deadline: Instant) -> Result<Output, InvokeError> {
        let program = &self.config.program;
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| match source.kind() {
                std::io::ErrorKind::NotFound => InvokeError::NotFound {
                    program: program.clone(),
                },
                _ => InvokeError::Io {
                    program: program.clone(),
                    source,
                },
            })?;

        match tokio::time::timeout_at(deadline, child.wait_with_output()).await {
            Ok(Ok(output)) => Ok(output),
            Ok(Err(source)) => Err(InvokeError::Io {
                program: program.clone(),
                source,
            }),
            Err(_) => Err(InvokeError::Timeout {
                program: program.clone(),
                timeout_ms: self.config.timeout_ms,
            }),
        }
    }

    async fn tool_available(&self, deadline: Instant) -> Result<bool, InvokeError> {
        let output = self.run(&self.config.version_args, deadline).await?;
        let text = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        let available = text.contains(&self.config.version_marker);
        if !available {
            tracing::debug!(
                program = %self.config.program,
                version_output = %text.trim(),
                "version probe did not contain marker"
            );
        }
        Ok(available)
    }
}

#[async_trait::async_trait]
impl ContainerInventoryProvider for CliInventoryProvider {
    #[tracing::instrument(skip(self), fields(provider = "cli", operation = "list_containers"))]
    async fn list_containers(&self) -> RawListing {
        let deadline = Instant::now() + self.config.timeout();

        match self.tool_available(deadline).await {
            Ok(true) => {}
            Ok(false) | Err(InvokeError::NotFound { .. }) => return RawListing::ToolUnavailable,
            Err(e) => return RawListing::ExecutionError(e.to_string()),
        }

        match self.run(&self.config.list_args, deadline).await {
            Ok(output) if output.status.success() => {
                RawListing::Ok(String::from_utf8_lossy(&output.stdout).into_owned())
            }
            Ok(output) => {
                let stderr = String::from_utf8_lossy(&output.stderr);
                let stderr = stderr.trim();
                RawListing::ExecutionError(if stderr.is_empty() {
                    format!("{} exited with {}", self.config.program, output.status)
                } else {
                    stderr.to_string()
                })
            }
            Err(InvokeError::NotFound { .. }) => RawListing::ToolUnavailable,
            Err(e) => RawListing::ExecutionError(e.to_string()),
        }
    }
}
