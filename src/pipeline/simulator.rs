use std::time::Duration;

use tracing::{debug, info};

use crate::errors::DefensisError;
use crate::models::{Finding, ScanPlan};
use super::state::{ScanSnapshot, ScanStage, ScanStatus, ScanUpdate, COMPLETED_LABEL, LAST_SUB_STEP};

/// Deterministic, time-phased imitation of a security scan.
///
/// The simulator never sleeps. A driver asks [`pending_delay`](Self::pending_delay) how long to
/// wait, waits on whatever clock it owns, then calls [`fire`](Self::fire) to apply the next
/// update. Walking phase `i` of `N` emits eleven samples `((i * 100) + s * 10) / N` for
/// `s = 0..=10`; the first is due immediately and each later one after `weight / 10`. Findings
/// are then revealed in list order, one per reveal interval, and the run completes.
#[derive(Debug, Clone)]
pub struct ScanSimulator {
    plan: ScanPlan,
    stage: ScanStage,
    progress: f64,
    findings: Vec<Finding>,
    revealed: Vec<Finding>,
    elapsed: Duration,
}

impl ScanSimulator {
    pub fn new(plan: ScanPlan) -> Self {
        let findings = plan.findings().to_vec();
        Self {
            plan,
            stage: ScanStage::Idle,
            progress: 0.0,
            findings,
            revealed: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    /// Leave `Idle` and begin walking phases.
    ///
    /// Fails with [`DefensisError::InvalidState`] if the simulator is running or already
    /// complete; in-flight state is left untouched.
    pub fn start(&mut self) -> Result<(), DefensisError> {
        if self.stage != ScanStage::Idle {
            return Err(DefensisError::InvalidState(format!(
                "cannot start scan of '{}' while {}",
                self.plan.subject(),
                self.stage.status()
            )));
        }
        info!(
            subject = %self.plan.subject(),
            phases = self.plan.phases().len(),
            findings = self.findings.len(),
            "Scan started"
        );
        self.stage = ScanStage::PhaseWalking { phase: 0, step: 0 };
        Ok(())
    }

    /// Time to wait before the next call to [`fire`](Self::fire), or `None` when there is
    /// nothing left to fire (not started, or complete).
    pub fn pending_delay(&self) -> Option<Duration> {
        match self.stage {
            ScanStage::Idle | ScanStage::Complete | ScanStage::Cancelled { .. } => None,
            ScanStage::PhaseWalking { step: 0, .. } => Some(Duration::ZERO),
            ScanStage::PhaseWalking { phase, .. } => Some(self.plan.phases()[phase].sub_step_delay()),
            ScanStage::RevealingFindings { next } if next < self.findings.len() => {
                Some(self.plan.reveal_interval())
            }
            ScanStage::RevealingFindings { .. } => Some(Duration::ZERO),
        }
    }

    /// Apply the next scheduled update, accounting its delay as elapsed simulated time.
    ///
    /// Returns `None` once the run is complete or if it was never started.
    pub fn fire(&mut self) -> Option<ScanUpdate> {
        let delay = self.pending_delay()?;
        self.elapsed += delay;

        match self.stage {
            ScanStage::Idle | ScanStage::Complete | ScanStage::Cancelled { .. } => None,
            ScanStage::PhaseWalking { phase, step } => Some(self.sample_phase(phase, step)),
            ScanStage::RevealingFindings { next } if next < self.findings.len() => {
                Some(self.reveal_next(next))
            }
            ScanStage::RevealingFindings { .. } => Some(self.complete()),
        }
    }

    /// Stop a running scan for good. Progress and revealed findings stay as they are, and
    /// [`start`](Self::start) keeps refusing.
    ///
    /// Fails with [`DefensisError::InvalidState`] unless the scan is walking phases or
    /// revealing findings.
    pub fn cancel(&mut self) -> Result<(), DefensisError> {
        let label_phase = match self.stage {
            ScanStage::PhaseWalking { phase, .. } => phase,
            ScanStage::RevealingFindings { .. } => self.plan.phases().len() - 1,
            _ => {
                return Err(DefensisError::InvalidState(format!(
                    "cannot cancel scan of '{}' while {}",
                    self.plan.subject(),
                    self.stage.status()
                )))
            }
        };
        self.stage = ScanStage::Cancelled { label_phase };
        Ok(())
    }

    fn sample_phase(&mut self, phase: usize, step: u32) -> ScanUpdate {
        let n = self.plan.phases().len();
        // (N-1)*100 + 100 is N*100, so the last sample of the last phase divides to exactly 100.
        let value = ((phase as f64 * 100.0) + (step as f64 * 10.0)) / n as f64;
        self.progress = self.progress.max(value);

        self.stage = if step < LAST_SUB_STEP {
            ScanStage::PhaseWalking { phase, step: step + 1 }
        } else if phase + 1 < n {
            ScanStage::PhaseWalking { phase: phase + 1, step: 0 }
        } else {
            debug!(elapsed_ms = self.elapsed.as_millis() as u64, "All phases walked");
            ScanStage::RevealingFindings { next: 0 }
        };

        if step == 0 {
            let label = self.plan.phases()[phase].name.clone();
            debug!(phase = phase, label = %label, progress = self.progress, "Phase entered");
            ScanUpdate::PhaseEntered {
                index: phase,
                label,
                progress: self.progress,
            }
        } else {
            ScanUpdate::Progress {
                phase,
                progress: self.progress,
            }
        }
    }

    fn reveal_next(&mut self, index: usize) -> ScanUpdate {
        let finding = &mut self.findings[index];
        finding.reveal();
        let finding = finding.clone();
        debug!(id = %finding.id, severity = %finding.severity, "Finding revealed");

        self.revealed.push(finding.clone());
        self.stage = ScanStage::RevealingFindings { next: index + 1 };
        ScanUpdate::FindingRevealed { index, finding }
    }

    fn complete(&mut self) -> ScanUpdate {
        self.stage = ScanStage::Complete;
        self.progress = 100.0;
        info!(
            subject = %self.plan.subject(),
            findings = self.revealed.len(),
            elapsed_ms = self.elapsed.as_millis() as u64,
            "Scan completed"
        );
        ScanUpdate::Completed {
            subject: self.plan.subject().to_string(),
            finding_count: self.revealed.len(),
        }
    }

    pub fn status(&self) -> ScanStatus {
        self.stage.status()
    }

    pub fn is_complete(&self) -> bool {
        self.stage == ScanStage::Complete
    }

    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// Progress rounded for display, 0 to 100.
    pub fn display_progress(&self) -> u8 {
        self.progress.round().clamp(0.0, 100.0) as u8
    }

    /// Index of the phase being walked. Exactly one while phase-walking, none otherwise.
    pub fn current_phase(&self) -> Option<usize> {
        match self.stage {
            ScanStage::PhaseWalking { phase, .. } => Some(phase),
            _ => None,
        }
    }

    pub fn phase_label(&self) -> Option<&str> {
        match self.stage {
            ScanStage::Idle => None,
            ScanStage::PhaseWalking { phase, .. } => Some(self.plan.phases()[phase].name.as_str()),
            ScanStage::RevealingFindings { .. } => self.plan.phases().last().map(|p| p.name.as_str()),
            ScanStage::Complete => Some(COMPLETED_LABEL),
            ScanStage::Cancelled { label_phase } => Some(self.plan.phases()[label_phase].name.as_str()),
        }
    }

    /// Findings revealed so far, in reveal order.
    pub fn revealed(&self) -> &[Finding] {
        &self.revealed
    }

    /// Findings with their current reveal state, in plan order.
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn subject(&self) -> &str {
        self.plan.subject()
    }

    /// Number of findings the plan will reveal.
    pub fn finding_count(&self) -> usize {
        self.findings.len()
    }

    pub fn plan(&self) -> &ScanPlan {
        &self.plan
    }

    /// Simulated time consumed by fired updates.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn snapshot(&self) -> ScanSnapshot {
        ScanSnapshot {
            subject: self.plan.subject().to_string(),
            status: self.status(),
            progress: self.progress,
            display_progress: self.display_progress(),
            current_phase: self.current_phase(),
            phase_label: self.phase_label().map(str::to_string),
            revealed: self.revealed.clone(),
            finding_count: self.findings.len(),
            is_complete: self.is_complete(),
            elapsed: self.elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FindingCategory, Phase, RevealState, Severity};

    fn run_to_end(sim: &mut ScanSimulator) -> Vec<ScanUpdate> {
        let mut updates = Vec::new();
        while let Some(update) = sim.fire() {
            updates.push(update);
        }
        updates
    }

    fn plan(weights: &[u64], findings: usize) -> ScanPlan {
        let phases = weights
            .iter()
            .enumerate()
            .map(|(i, w)| Phase::new(format!("Phase {}", i), *w))
            .collect();
        let findings = (0..findings)
            .map(|i| Finding {
                id: format!("f{}", i),
                category: FindingCategory::Dependency,
                severity: Severity::Medium,
                title: format!("Finding {}", i),
                description: String::new(),
                location: "Cargo.toml".to_string(),
                line: None,
                reveal_state: RevealState::Pending,
            })
            .collect();
        ScanPlan::new("repo", phases, findings, Duration::from_millis(500)).unwrap()
    }

    #[test]
    fn test_new_simulator_is_idle() {
        let sim = ScanSimulator::new(ScanPlan::default());
        assert_eq!(sim.status(), ScanStatus::Idle);
        assert_eq!(sim.progress(), 0.0);
        assert!(sim.phase_label().is_none());
        assert!(sim.pending_delay().is_none());
    }

    #[test]
    fn test_fire_before_start_does_nothing() {
        let mut sim = ScanSimulator::new(ScanPlan::default());
        assert!(sim.fire().is_none());
        assert_eq!(sim.status(), ScanStatus::Idle);
    }

    #[test]
    fn test_start_twice_is_invalid_state() {
        let mut sim = ScanSimulator::new(ScanPlan::default());
        sim.start().unwrap();
        sim.fire();
        sim.fire();
        let before = sim.progress();
        let err = sim.start().unwrap_err();
        assert!(matches!(err, DefensisError::InvalidState(_)));
        assert_eq!(sim.progress(), before);
        assert_eq!(sim.status(), ScanStatus::PhaseWalking);
    }

    #[test]
    fn test_start_after_complete_is_invalid_state() {
        let mut sim = ScanSimulator::new(plan(&[100], 0));
        sim.start().unwrap();
        run_to_end(&mut sim);
        assert!(sim.is_complete());
        assert!(matches!(sim.start(), Err(DefensisError::InvalidState(_))));
        assert!(sim.is_complete());
    }

    #[test]
    fn test_eleven_samples_per_phase() {
        let mut sim = ScanSimulator::new(plan(&[1000, 1000], 0));
        sim.start().unwrap();
        let updates = run_to_end(&mut sim);
        let samples = updates
            .iter()
            .filter(|u| matches!(u, ScanUpdate::PhaseEntered { .. } | ScanUpdate::Progress { .. }))
            .count();
        assert_eq!(samples, 22);
    }

    #[test]
    fn test_last_phase_sample_is_exactly_100() {
        for n in 1..=9 {
            let mut sim = ScanSimulator::new(plan(&vec![70; n], 0));
            sim.start().unwrap();
            let mut last = 0.0;
            while sim.status() == ScanStatus::PhaseWalking {
                last = sim.fire().and_then(|u| u.progress()).unwrap();
            }
            assert_eq!(last, 100.0, "n = {}", n);
        }
    }

    #[test]
    fn test_progress_at_start_of_third_phase() {
        let mut sim = ScanSimulator::new(ScanPlan::default());
        sim.start().unwrap();
        loop {
            if let Some(ScanUpdate::PhaseEntered { index: 2, progress, .. }) = sim.fire() {
                assert_eq!(progress, 40.0);
                break;
            }
        }
    }

    #[test]
    fn test_exactly_one_current_phase_while_walking() {
        let mut sim = ScanSimulator::new(ScanPlan::default());
        sim.start().unwrap();
        while sim.status() == ScanStatus::PhaseWalking {
            assert!(sim.current_phase().is_some());
            sim.fire();
        }
        assert!(sim.current_phase().is_none());
    }

    #[test]
    fn test_phase_label_through_lifecycle() {
        let mut sim = ScanSimulator::new(ScanPlan::default());
        sim.start().unwrap();
        assert_eq!(sim.phase_label(), Some("Initializing scan..."));
        while sim.status() == ScanStatus::PhaseWalking {
            sim.fire();
        }
        assert_eq!(sim.phase_label(), Some("Generating report..."));
        run_to_end(&mut sim);
        assert_eq!(sim.phase_label(), Some(COMPLETED_LABEL));
    }

    #[test]
    fn test_no_findings_completes_right_after_phases() {
        let mut sim = ScanSimulator::new(plan(&[1000], 0));
        sim.start().unwrap();
        let updates = run_to_end(&mut sim);
        assert!(matches!(
            updates.last(),
            Some(ScanUpdate::Completed { finding_count: 0, .. })
        ));
        assert_eq!(sim.elapsed(), Duration::from_millis(1000));
    }

    #[test]
    fn test_complete_is_terminal() {
        let mut sim = ScanSimulator::new(plan(&[200, 300], 2));
        sim.start().unwrap();
        run_to_end(&mut sim);
        assert!(sim.fire().is_none());
        assert!(sim.is_complete());
        assert_eq!(sim.progress(), 100.0);
        assert_eq!(sim.display_progress(), 100);
        assert!(sim.findings().iter().all(|f| f.is_revealed()));
    }

    #[test]
    fn test_cancel_is_terminal_and_blocks_start() {
        let mut sim = ScanSimulator::new(plan(&[1000, 1000], 1));
        assert!(matches!(sim.cancel(), Err(DefensisError::InvalidState(_))));
        sim.start().unwrap();
        for _ in 0..13 {
            sim.fire();
        }
        let progress = sim.progress();
        sim.cancel().unwrap();

        assert_eq!(sim.status(), ScanStatus::Cancelled);
        assert!(!sim.status().is_running());
        assert!(sim.status().is_terminal());
        assert!(sim.current_phase().is_none());
        assert_eq!(sim.phase_label(), Some("Phase 1"));
        assert!(sim.pending_delay().is_none());
        assert!(sim.fire().is_none());
        assert_eq!(sim.progress(), progress);
        assert!(matches!(sim.start(), Err(DefensisError::InvalidState(_))));
        assert!(sim.cancel().is_err());
    }

    #[test]
    fn test_cancel_while_revealing_keeps_last_phase_label() {
        let mut sim = ScanSimulator::new(plan(&[100, 100], 2));
        sim.start().unwrap();
        while sim.status() == ScanStatus::PhaseWalking {
            sim.fire();
        }
        sim.fire();
        sim.cancel().unwrap();
        assert_eq!(sim.phase_label(), Some("Phase 1"));
        assert_eq!(sim.revealed().len(), 1);
        assert!(!sim.is_complete());
    }

    #[test]
    fn test_display_progress_rounds() {
        let mut sim = ScanSimulator::new(plan(&[300, 300, 300], 0));
        sim.start().unwrap();
        sim.fire();
        sim.fire();
        // 10 / 3
        assert_eq!(sim.display_progress(), 3);
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut sim = ScanSimulator::new(plan(&[100], 1));
        sim.start().unwrap();
        run_to_end(&mut sim);
        let snap = sim.snapshot();
        assert!(snap.is_complete);
        assert_eq!(snap.revealed.len(), 1);
        assert_eq!(snap.finding_count, 1);
        assert_eq!(snap.phase_label.as_deref(), Some(COMPLETED_LABEL));
        assert_eq!(snap.elapsed, Duration::from_millis(600));
    }
}
