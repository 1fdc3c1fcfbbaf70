use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::errors::DefensisError;
use crate::models::{Finding, Phase, ScanPlan};
use crate::pipeline::phase::{default_findings, default_phases, DEFAULT_REVEAL_INTERVAL_MS, DEFAULT_SUBJECT};

pub const DEFAULT_SESSION_DIR: &str = ".defensis";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DefensisConfig {
    pub scan: Option<ScanConfig>,
    pub session: Option<SessionConfig>,
    pub output: Option<OutputConfig>,
}

/// Overrides for the simulated scan. Any field left out falls back to the stock plan.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ScanConfig {
    pub subject: Option<String>,
    pub reveal_interval_ms: Option<u64>,
    pub phases: Option<Vec<Phase>>,
    pub findings: Option<Vec<Finding>>,
}

impl ScanConfig {
    /// Build a validated plan; `subject` takes precedence over the configured one.
    pub fn to_plan(&self, subject: Option<&str>) -> Result<ScanPlan, DefensisError> {
        let subject = subject
            .map(str::to_string)
            .or_else(|| self.subject.clone())
            .unwrap_or_else(|| DEFAULT_SUBJECT.to_string());
        ScanPlan::new(
            subject,
            self.phases.clone().unwrap_or_else(default_phases),
            self.findings.clone().unwrap_or_else(default_findings),
            Duration::from_millis(self.reveal_interval_ms.unwrap_or(DEFAULT_REVEAL_INTERVAL_MS)),
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SessionConfig {
    pub dir: Option<PathBuf>,
}

impl SessionConfig {
    pub fn dir_or_default(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_DIR))
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct OutputConfig {
    pub color: Option<bool>,
    pub json: Option<bool>,
}

impl DefensisConfig {
    pub fn scan_plan(&self, subject: Option<&str>) -> Result<ScanPlan, DefensisError> {
        self.scan.clone().unwrap_or_default().to_plan(subject)
    }

    pub fn session_dir(&self) -> PathBuf {
        self.session.clone().unwrap_or_default().dir_or_default()
    }
}
