use crate::models::{Finding, FindingCategory, Phase, RevealState, Severity};

pub const DEFAULT_SUBJECT: &str = "defensis-web-core";
pub const DEFAULT_REVEAL_INTERVAL_MS: u64 = 500;

pub struct PhaseDefinition {
    pub display_name: &'static str,
    pub weight_ms: u64,
}

pub static PHASES: &[PhaseDefinition] = &[
    PhaseDefinition {
        display_name: "Initializing scan...",
        weight_ms: 1000,
    },
    PhaseDefinition {
        display_name: "Analyzing dependencies...",
        weight_ms: 2000,
    },
    PhaseDefinition {
        display_name: "Scanning source code...",
        weight_ms: 3000,
    },
    PhaseDefinition {
        display_name: "Checking security patterns...",
        weight_ms: 2000,
    },
    PhaseDefinition {
        display_name: "Generating report...",
        weight_ms: 1000,
    },
];

pub fn default_phases() -> Vec<Phase> {
    PHASES
        .iter()
        .map(|p| Phase::new(p.display_name, p.weight_ms))
        .collect()
}

pub fn default_findings() -> Vec<Finding> {
    vec![
        Finding {
            id: "1".to_string(),
            category: FindingCategory::Vulnerability,
            severity: Severity::Critical,
            title: "SQL Injection in user authentication".to_string(),
            description: "Direct SQL query construction without parameterization".to_string(),
            location: "src/auth.py".to_string(),
            line: Some(45),
            reveal_state: RevealState::Pending,
        },
        Finding {
            id: "2".to_string(),
            category: FindingCategory::Dependency,
            severity: Severity::High,
            title: "Vulnerable dependency: lodash@4.17.20".to_string(),
            description: "Known vulnerability in lodash library".to_string(),
            location: "package.json".to_string(),
            line: None,
            reveal_state: RevealState::Pending,
        },
        Finding {
            id: "3".to_string(),
            category: FindingCategory::CodeQuality,
            severity: Severity::Medium,
            title: "Missing CSRF protection".to_string(),
            description: "Forms lack CSRF token validation".to_string(),
            location: "src/forms.py".to_string(),
            line: Some(12),
            reveal_state: RevealState::Pending,
        },
        Finding {
            id: "4".to_string(),
            category: FindingCategory::Vulnerability,
            severity: Severity::Low,
            title: "Weak password policy".to_string(),
            description: "Password requirements are too lenient".to_string(),
            location: "src/config.py".to_string(),
            line: Some(28),
            reveal_state: RevealState::Pending,
        },
    ]
}
