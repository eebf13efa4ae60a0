// Parse the tab-separated container listing into records.
//
// Canonical line format (no header row): NAME \t STATUS [\t IMAGE]

use std::collections::HashSet;

use crate::classifier::classify;
use crate::models::{ContainerRecord, STOPPED_MARKER};

const FIELD_DELIMITER: char = '\t';
/// The listing tool marks running containers with a status starting "Up ...".
const RUNNING_MARKER: &str = "Up";
/// Any occurrence in the listing text means the tool printed a failure instead of a table.
const ERROR_MARKER: &str = "error";

/// How the listing text turned into records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseOutcome {
    /// Every non-blank line became a record.
    Clean,
    /// Some lines were dropped, the rest became records.
    Degraded,
    /// Nothing usable; a single `no_containers` placeholder stands in.
    NoRecordsFound,
    /// The tool is missing or failed; a single `docker_unavailable` placeholder stands in.
    ToolFailed,
}

#[derive(Debug, Clone)]
pub struct ParseReport {
    pub records: Vec<ContainerRecord>,
    /// Non-blank lines that were not turned into a record (too few fields or duplicate name).
    pub dropped_lines: usize,
    pub outcome: ParseOutcome,
}

impl ParseReport {
    pub(crate) fn placeholder(record: ContainerRecord, outcome: ParseOutcome) -> Self {
        Self {
            records: vec![record],
            dropped_lines: 0,
            outcome,
        }
    }
}

/// Parse the listing text. Always yields at least one record: real records, or exactly
/// one placeholder, never a mix.
pub fn parse(raw: &str) -> ParseReport {
    if raw.trim().is_empty() {
        return ParseReport::placeholder(
            ContainerRecord::no_containers(),
            ParseOutcome::NoRecordsFound,
        );
    }
    if raw.contains(ERROR_MARKER) {
        return ParseReport::placeholder(
            ContainerRecord::docker_unavailable(error_line(raw)),
            ParseOutcome::ToolFailed,
        );
    }

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    let mut dropped_lines = 0;

    for line in raw.lines().filter(|l| !l.trim().is_empty()) {
        match parse_line(line) {
            Some(record) if seen.insert(record.name.clone()) => records.push(record),
            _ => dropped_lines += 1,
        }
    }

    if records.is_empty() {
        return ParseReport {
            dropped_lines,
            ..ParseReport::placeholder(
                ContainerRecord::no_containers(),
                ParseOutcome::NoRecordsFound,
            )
        };
    }

    let outcome = if dropped_lines > 0 {
        tracing::debug!(dropped_lines, "container listing partially parsed");
        ParseOutcome::Degraded
    } else {
        ParseOutcome::Clean
    };
    ParseReport {
        records,
        dropped_lines,
        outcome,
    }
}

fn parse_line(line: &str) -> Option<ContainerRecord> {
    let mut fields = line.trim_end_matches('\r').split(FIELD_DELIMITER).map(str::trim);
    let name = fields.next().filter(|n| !n.is_empty())?;
    let status = fields.next()?;
    let image = fields.next().unwrap_or("");

    let is_running = status.contains(RUNNING_MARKER);
    let class = classify(name, image);
    Some(ContainerRecord {
        name: name.to_string(),
        raw_status_text: status.to_string(),
        is_running,
        label: class.label,
        category: class.category,
        uptime_display: if is_running {
            status.to_string()
        } else {
            STOPPED_MARKER.to_string()
        },
        placeholder: false,
    })
}

fn error_line(raw: &str) -> Option<&str> {
    raw.lines().map(str::trim).find(|l| l.contains(ERROR_MARKER))
}
