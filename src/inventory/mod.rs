// Container inventory: providers of the raw listing text and the parser that reads it.
//
// Every provider hands back the same text contract, one container per line:
// `NAME \t STATUS [\t IMAGE]`, no header row. The parser is the only place that
// interprets it.

mod cli;
mod docker_api;
pub mod parser;

pub use cli::CliInventoryProvider;
pub use docker_api::DockerApiInventoryProvider;
pub use parser::{ParseOutcome, ParseReport, parse};

use std::sync::Arc;

use crate::config::{InventoryConfig, ProviderKind};
use crate::models::ContainerRecord;

/// Result of one listing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawListing {
    /// The listing tool is missing or does not identify itself as expected.
    ToolUnavailable,
    /// Raw listing text, possibly empty.
    Ok(String),
    /// The tool ran but failed (non-zero exit, timeout, daemon error).
    ExecutionError(String),
}

#[async_trait::async_trait]
pub trait ContainerInventoryProvider: Send + Sync {
    /// Produce one raw listing. Never fails; failures are `RawListing` variants.
    async fn list_containers(&self) -> RawListing;
}

/// Build the provider selected in config.
pub fn provider_from_config(config: &InventoryConfig) -> Arc<dyn ContainerInventoryProvider> {
    match config.provider {
        ProviderKind::Cli => Arc::new(CliInventoryProvider::new(config.clone())),
        ProviderKind::DockerApi => Arc::new(DockerApiInventoryProvider::new(config.timeout())),
    }
}

/// Turn a listing attempt into records: parsed rows, or a single placeholder.
pub fn inventory_records(listing: RawListing) -> ParseReport {
    match listing {
        RawListing::Ok(text) => parse(&text),
        RawListing::ToolUnavailable => ParseReport::placeholder(
            ContainerRecord::docker_unavailable(None),
            ParseOutcome::ToolFailed,
        ),
        RawListing::ExecutionError(message) => ParseReport::placeholder(
            ContainerRecord::docker_unavailable(Some(&message)),
            ParseOutcome::ToolFailed,
        ),
    }
}

/// Fetch and parse one listing, logging degraded outcomes.
#[tracing::instrument(skip(provider), fields(operation = "collect_inventory"))]
pub async fn collect(provider: &dyn ContainerInventoryProvider) -> ParseReport {
    let listing = provider.list_containers().await;
    if let RawListing::ExecutionError(ref message) = listing {
        tracing::warn!(error = %message, "container listing failed");
    }
    let report = inventory_records(listing);
    match report.outcome {
        ParseOutcome::Degraded => tracing::warn!(
            dropped_lines = report.dropped_lines,
            records = report.records.len(),
            "container listing partially parsed"
        ),
        ParseOutcome::ToolFailed => tracing::warn!("container listing tool unavailable"),
        ParseOutcome::NoRecordsFound => tracing::debug!(
            dropped_lines = report.dropped_lines,
            "no containers found"
        ),
        ParseOutcome::Clean => tracing::debug!(records = report.records.len(), "containers listed"),
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DOCKER_UNAVAILABLE;

    #[test]
    fn tool_unavailable_maps_to_placeholder() {
        let report = inventory_records(RawListing::ToolUnavailable);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name, DOCKER_UNAVAILABLE);
        assert!(!report.records[0].is_running);
        assert_eq!(report.outcome, ParseOutcome::ToolFailed);
    }

    #[test]
    fn execution_error_message_is_shown() {
        let report = inventory_records(RawListing::ExecutionError(
            "permission denied while trying to connect".into(),
        ));
        assert_eq!(report.records.len(), 1);
        assert_eq!(
            report.records[0].uptime_display,
            "permission denied while trying to connect"
        );
    }

    #[test]
    fn ok_listing_is_parsed() {
        let report = inventory_records(RawListing::Ok("dev_redis\tUp 3 minutes\n".into()));
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].name, "dev_redis");
        assert!(report.records[0].is_running);
    }
}
