//! Report output
//!
//! Serializes the run summary plus per-test outcomes into a JSON document
//! and writes it to a configurable sink. Downstream formatting and
//! persistence beyond this file are collaborator concerns.

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{RunSummary, TestOutcome};
use std::io::Write;
use std::path::Path;
use tracing::info;

use crate::error::HarnessResult;

/// Structured report artifact for one harness run
#[derive(Serialize)]
struct Report<'a> {
    generated_at: DateTime<Utc>,
    summary: &'a RunSummary,
    outcomes: &'a [TestOutcome],
}

/// Writes run reports to JSON sinks
pub struct ReportWriter;

impl ReportWriter {
    /// Render the report as a pretty-printed JSON string
    pub fn render(summary: &RunSummary, outcomes: &[TestOutcome]) -> HarnessResult<String> {
        let report = Report {
            generated_at: Utc::now(),
            summary,
            outcomes,
        };
        Ok(serde_json::to_string_pretty(&report)?)
    }

    /// Write the report to a file, creating parent directories as needed
    pub fn write_to(path: &Path, summary: &RunSummary, outcomes: &[TestOutcome]) -> HarnessResult<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = std::fs::File::create(path)?;
        file.write_all(Self::render(summary, outcomes)?.as_bytes())?;
        file.write_all(b"\n")?;
        info!("📄 Wrote report to {}", path.display());
        Ok(())
    }
}
