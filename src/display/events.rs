use crate::models::Finding;
use crate::pipeline::ScanUpdate;

/// Messages sent from a running scan to whatever is rendering it.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// The simulator left `Idle`
    ScanStarted {
        subject: String,
        phase_count: usize,
        finding_count: usize,
    },
    /// A new phase has begun; its first progress sample is included
    PhaseEntered {
        index: usize,
        label: String,
        progress: f64,
    },
    /// Progress sample within the current phase
    ProgressUpdated {
        phase: usize,
        progress: f64,
    },
    /// A finding moved from pending to revealed
    FindingRevealed {
        index: usize,
        finding: Finding,
    },
    /// Terminal event of a finished run, sent once
    ScanCompleted {
        subject: String,
        finding_count: usize,
    },
    /// The driver was cancelled before completion
    ScanCancelled {
        progress: f64,
    },
}

impl From<ScanUpdate> for ScanEvent {
    fn from(update: ScanUpdate) -> Self {
        match update {
            ScanUpdate::PhaseEntered { index, label, progress } => {
                Self::PhaseEntered { index, label, progress }
            }
            ScanUpdate::Progress { phase, progress } => Self::ProgressUpdated { phase, progress },
            ScanUpdate::FindingRevealed { index, finding } => Self::FindingRevealed { index, finding },
            ScanUpdate::Completed { subject, finding_count } => {
                Self::ScanCompleted { subject, finding_count }
            }
        }
    }
}
