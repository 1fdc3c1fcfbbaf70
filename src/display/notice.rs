use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::pipeline::ScanSummary;

pub const NOTICE_TITLE: &str = "Scan Complete!";

/// One-time notification surfaced when a scan finishes.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionNotice {
    pub title: String,
    pub description: String,
    pub subject: String,
    pub finding_count: usize,
    pub issued_at: DateTime<Utc>,
}

impl CompletionNotice {
    pub fn new(subject: &str, finding_count: usize) -> Self {
        Self {
            title: NOTICE_TITLE.to_string(),
            description: format!("Found {} security issues in {}", finding_count, subject),
            subject: subject.to_string(),
            finding_count,
            issued_at: Utc::now(),
        }
    }

    pub fn from_summary(summary: &ScanSummary) -> Self {
        Self::new(&summary.subject, summary.total_findings)
    }
}
