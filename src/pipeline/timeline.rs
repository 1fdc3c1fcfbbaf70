use std::time::Duration;

use crate::errors::DefensisError;
use super::simulator::ScanSimulator;
use super::state::ScanUpdate;

/// An update together with the simulated time at which it becomes visible.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineEntry {
    pub at: Duration,
    pub update: ScanUpdate,
}

/// A whole run laid out in simulated time. Consuming it drives the owned simulator,
/// so entries are produced once and cannot be replayed.
pub struct Timeline {
    simulator: ScanSimulator,
}

impl ScanSimulator {
    pub fn into_timeline(mut self) -> Result<Timeline, DefensisError> {
        self.start()?;
        Ok(Timeline { simulator: self })
    }
}

impl Timeline {
    pub fn simulator(&self) -> &ScanSimulator {
        &self.simulator
    }

    pub fn into_simulator(self) -> ScanSimulator {
        self.simulator
    }
}

impl Iterator for Timeline {
    type Item = TimelineEntry;

    fn next(&mut self) -> Option<TimelineEntry> {
        let update = self.simulator.fire()?;
        Some(TimelineEntry {
            at: self.simulator.elapsed(),
            update,
        })
    }
}
