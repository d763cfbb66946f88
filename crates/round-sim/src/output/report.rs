//! Meeting Reports
//!
//! Append-only JSONL log of what every agent knew when a meeting closed.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use epistemic::{AgentId, KnowledgeReport};

/// Trigger recorded for the report taken after the last event
pub const FINAL_TRIGGER: &str = "end_of_round";

/// `receiver` accepted the broadcast of `speaker`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrustEdge {
    pub receiver: AgentId,
    pub speaker: AgentId,
}

/// One line of the report file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingReport {
    /// 1-based meeting number; the final report continues the count
    pub meeting: u32,
    pub tick: u64,
    /// Event name that called the meeting, or `end_of_round`
    pub trigger: String,
    /// Players still in play
    pub alive: Vec<AgentId>,
    pub report: KnowledgeReport,
    #[serde(default)]
    pub trust: Vec<TrustEdge>,
}

impl MeetingReport {
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}

/// Resource: every report recorded so far
#[derive(Resource, Debug, Default)]
pub struct MeetingLog {
    reports: Vec<MeetingReport>,
}

impl MeetingLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, report: MeetingReport) {
        self.reports.push(report);
    }

    pub fn reports(&self) -> &[MeetingReport] {
        &self.reports
    }

    pub fn last(&self) -> Option<&MeetingReport> {
        self.reports.last()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

/// Resource for writing meeting reports as JSONL
#[derive(Resource)]
pub struct ReportWriter {
    writer: Option<Box<dyn Write + Send + Sync>>,
    report_count: u64,
}

impl ReportWriter {
    /// Create a writer for `path`, creating parent directories and
    /// truncating any previous file
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        Ok(Self::from_writer(BufWriter::new(file)))
    }

    /// Write reports to any sink
    pub fn from_writer(writer: impl Write + Send + Sync + 'static) -> Self {
        Self {
            writer: Some(Box::new(writer)),
            report_count: 0,
        }
    }

    /// Create a writer that discards reports (for testing)
    pub fn null() -> Self {
        Self {
            writer: None,
            report_count: 0,
        }
    }

    pub fn report_count(&self) -> u64 {
        self.report_count
    }

    pub fn write(&mut self, report: &MeetingReport) -> std::io::Result<()> {
        self.report_count += 1;
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(report)?;
            writeln!(writer, "{}", json)?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> std::io::Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for ReportWriter {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            tracing::warn!("failed to flush report writer: {}", e);
        }
    }
}
