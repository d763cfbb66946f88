//! Output
//!
//! Per-meeting knowledge reports and their JSONL writer.

pub mod report;

pub use report::{MeetingLog, MeetingReport, ReportWriter, TrustEdge, FINAL_TRIGGER};
