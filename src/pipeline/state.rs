use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::models::Finding;

/// Phase label shown once the scan has finished.
pub const COMPLETED_LABEL: &str = "Scan completed!";

/// Index of the last progress sample within a phase; samples run `0..=LAST_SUB_STEP`.
pub(crate) const LAST_SUB_STEP: u32 = 10;

/// Internal cursor of the simulator. Each variant names the next update to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScanStage {
    Idle,
    PhaseWalking { phase: usize, step: u32 },
    /// `next == findings.len()` means every finding is out and completion is due.
    RevealingFindings { next: usize },
    Complete,
    /// Driving stopped early. `label_phase` is the phase whose label was showing.
    Cancelled { label_phase: usize },
}

impl ScanStage {
    pub(crate) fn status(&self) -> ScanStatus {
        match self {
            Self::Idle => ScanStatus::Idle,
            Self::PhaseWalking { .. } => ScanStatus::PhaseWalking,
            Self::RevealingFindings { .. } => ScanStatus::RevealingFindings,
            Self::Complete => ScanStatus::Complete,
            Self::Cancelled { .. } => ScanStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    Idle,
    PhaseWalking,
    RevealingFindings,
    Complete,
    Cancelled,
}

impl ScanStatus {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::PhaseWalking | Self::RevealingFindings)
    }

    /// Nothing more will ever fire.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Cancelled)
    }
}

impl std::fmt::Display for ScanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::PhaseWalking => write!(f, "phase-walking"),
            Self::RevealingFindings => write!(f, "revealing-findings"),
            Self::Complete => write!(f, "complete"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One observable change produced by [`crate::pipeline::ScanSimulator::fire`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanUpdate {
    /// First sample of a phase; the phase label changed.
    PhaseEntered {
        index: usize,
        label: String,
        progress: f64,
    },
    Progress {
        phase: usize,
        progress: f64,
    },
    FindingRevealed {
        index: usize,
        finding: Finding,
    },
    Completed {
        subject: String,
        finding_count: usize,
    },
}

impl ScanUpdate {
    /// Progress carried by this update, if any.
    pub fn progress(&self) -> Option<f64> {
        match self {
            Self::PhaseEntered { progress, .. } | Self::Progress { progress, .. } => Some(*progress),
            Self::Completed { .. } => Some(100.0),
            Self::FindingRevealed { .. } => None,
        }
    }
}

/// Point-in-time view of a simulator for a rendering layer.
#[derive(Debug, Clone, Serialize)]
pub struct ScanSnapshot {
    pub subject: String,
    pub status: ScanStatus,
    pub progress: f64,
    pub display_progress: u8,
    pub current_phase: Option<usize>,
    pub phase_label: Option<String>,
    pub revealed: Vec<Finding>,
    pub finding_count: usize,
    pub is_complete: bool,
    #[serde(rename = "elapsed_ms", serialize_with = "serialize_millis")]
    pub elapsed: Duration,
}

fn serialize_millis<S: serde::Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(d.as_millis() as u64)
}
