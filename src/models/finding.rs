use serde::{Deserialize, Serialize};

/// Severity level for a simulated finding, ordered from most to least severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    /// Returns a numeric rank where lower values indicate higher severity.
    /// Critical = 0, High = 1, Medium = 2, Low = 3.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Critical => 0,
            Severity::High => 1,
            Severity::Medium => 2,
            Severity::Low => 3,
        }
    }

    /// Upper-case badge text.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Critical => "CRITICAL",
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Critical => write!(f, "critical"),
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// What kind of issue the finding describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    Vulnerability,
    Dependency,
    CodeQuality,
}

impl std::fmt::Display for FindingCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vulnerability => write!(f, "vulnerability"),
            Self::Dependency => write!(f, "dependency"),
            Self::CodeQuality => write!(f, "code_quality"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevealState {
    #[default]
    Pending,
    Revealed,
}

/// A predefined simulated security issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub category: FindingCategory,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    /// File path the issue points at.
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(default)]
    pub reveal_state: RevealState,
}

impl Finding {
    /// Flip the finding from pending to revealed. Returns `false` if it was already revealed.
    pub fn reveal(&mut self) -> bool {
        match self.reveal_state {
            RevealState::Pending => {
                self.reveal_state = RevealState::Revealed;
                true
            }
            RevealState::Revealed => false,
        }
    }

    pub fn is_revealed(&self) -> bool {
        self.reveal_state == RevealState::Revealed
    }

    /// `path` or `path:line` when a line is known.
    pub fn location_display(&self) -> String {
        match self.line {
            Some(line) => format!("{}:{}", self.location, line),
            None => self.location.clone(),
        }
    }
}
