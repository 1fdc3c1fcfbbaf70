use std::collections::HashSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::finding::{Finding, RevealState};
use crate::errors::DefensisError;
use crate::pipeline::phase::{default_findings, default_phases, DEFAULT_REVEAL_INTERVAL_MS, DEFAULT_SUBJECT};

/// Number of pauses a phase's weight is split into.
pub const SUB_STEPS: u32 = 10;

/// A named stage of the simulated scan with a relative time weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub name: String,
    pub weight_ms: u64,
}

impl Phase {
    pub fn new(name: impl Into<String>, weight_ms: u64) -> Self {
        Self { name: name.into(), weight_ms }
    }

    pub fn weight(&self) -> Duration {
        Duration::from_millis(self.weight_ms)
    }

    /// Pause taken before each progress sample after the first.
    pub fn sub_step_delay(&self) -> Duration {
        self.weight() / SUB_STEPS
    }
}

/// Immutable input of one simulator instance.
#[derive(Debug, Clone)]
pub struct ScanPlan {
    subject: String,
    phases: Vec<Phase>,
    findings: Vec<Finding>,
    reveal_interval: Duration,
}

impl ScanPlan {
    pub fn new(
        subject: impl Into<String>,
        phases: Vec<Phase>,
        findings: Vec<Finding>,
        reveal_interval: Duration,
    ) -> Result<Self, DefensisError> {
        if phases.is_empty() {
            return Err(DefensisError::Config("Scan plan needs at least one phase".into()));
        }

        let mut seen = HashSet::new();
        for f in &findings {
            if !seen.insert(f.id.as_str()) {
                return Err(DefensisError::Config(format!("Duplicate finding id '{}'", f.id)));
            }
        }

        let findings = findings
            .into_iter()
            .map(|f| Finding { reveal_state: RevealState::Pending, ..f })
            .collect();

        Ok(Self {
            subject: subject.into(),
            phases,
            findings,
            reveal_interval,
        })
    }

    /// The stock five-phase, four-finding plan shown in the dashboard.
    pub fn default_for(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            phases: default_phases(),
            findings: default_findings(),
            reveal_interval: Duration::from_millis(DEFAULT_REVEAL_INTERVAL_MS),
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn reveal_interval(&self) -> Duration {
        self.reveal_interval
    }

    /// Simulated time from start until completion.
    pub fn total_duration(&self) -> Duration {
        let walking: Duration = self.phases.iter().map(|p| p.sub_step_delay() * SUB_STEPS).sum();
        walking + self.reveal_interval * self.findings.len() as u32
    }
}

impl Default for ScanPlan {
    fn default() -> Self {
        Self::default_for(DEFAULT_SUBJECT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FindingCategory, Severity};

    fn finding(id: &str) -> Finding {
        Finding {
            id: id.to_string(),
            category: FindingCategory::Vulnerability,
            severity: Severity::Low,
            title: "Weak password policy".to_string(),
            description: "Password requirements are too lenient".to_string(),
            location: "src/config.py".to_string(),
            line: Some(28),
            reveal_state: RevealState::Revealed,
        }
    }

    #[test]
    fn test_empty_phase_list_rejected() {
        let err = ScanPlan::new("repo", vec![], vec![], Duration::from_millis(500)).unwrap_err();
        assert!(matches!(err, DefensisError::Config(_)));
    }

    #[test]
    fn test_duplicate_finding_ids_rejected() {
        let result = ScanPlan::new(
            "repo",
            vec![Phase::new("Scanning", 1000)],
            vec![finding("1"), finding("1")],
            Duration::from_millis(500),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_findings_normalised_to_pending() {
        let plan = ScanPlan::new(
            "repo",
            vec![Phase::new("Scanning", 1000)],
            vec![finding("1")],
            Duration::from_millis(500),
        )
        .unwrap();
        assert_eq!(plan.findings()[0].reveal_state, RevealState::Pending);
    }

    #[test]
    fn test_sub_step_delay_is_tenth_of_weight() {
        let phase = Phase::new("Scanning source code...", 3000);
        assert_eq!(phase.sub_step_delay(), Duration::from_millis(300));
        assert_eq!(phase.sub_step_delay() * SUB_STEPS, phase.weight());
    }

    #[test]
    fn test_default_plan_total_duration() {
        let plan = ScanPlan::default();
        assert_eq!(plan.subject(), "defensis-web-core");
        assert_eq!(plan.phases().len(), 5);
        assert_eq!(plan.findings().len(), 4);
        assert_eq!(plan.total_duration(), Duration::from_millis(11_000));
    }
}
