use console::style;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use crate::display::events::ScanEvent;
use crate::models::{Finding, Severity};
use crate::utils::formatting::format_duration;

/// Terminal rendering of a running scan: one percentage bar plus a line per revealed finding.
pub struct ScanProgress {
    bar: ProgressBar,
    subject: String,
    findings_count: usize,
    start_time: std::time::Instant,
}

impl ScanProgress {
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// Renderer that draws nothing; events are still tracked.
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let bar = ProgressBar::with_draw_target(Some(100), target);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("  {bar:30.cyan/dark_gray} {pos:>3}% | {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▓░"),
        );
        bar.set_message("Preparing to scan your repository for security vulnerabilities.");

        Self {
            bar,
            subject: String::new(),
            findings_count: 0,
            start_time: std::time::Instant::now(),
        }
    }

    /// Handle a scan event and update the bar accordingly.
    pub fn handle_event(&mut self, event: &ScanEvent) {
        match event {
            ScanEvent::ScanStarted { subject, .. } => {
                self.subject = subject.clone();
                self.println(&format!(
                    "  {} Security Scan: {}",
                    style("◆").cyan(),
                    style(subject).bold()
                ));
            }
            ScanEvent::PhaseEntered { label, progress, .. } => {
                self.bar.set_message(label.clone());
                self.set_progress(*progress);
            }
            ScanEvent::ProgressUpdated { progress, .. } => {
                self.set_progress(*progress);
            }
            ScanEvent::FindingRevealed { finding, .. } => {
                self.findings_count += 1;
                self.println(&format_finding_line(finding));
            }
            ScanEvent::ScanCompleted { finding_count, subject } => {
                self.bar.set_position(100);
                self.bar.finish_with_message(format!(
                    "Scan complete: {} findings in {} | {}",
                    finding_count,
                    subject,
                    format_duration(self.start_time.elapsed().as_millis() as u64),
                ));
            }
            ScanEvent::ScanCancelled { progress } => {
                self.bar.abandon_with_message(format!("Cancelled at {:.0}%", progress));
            }
        }
    }

    fn set_progress(&self, progress: f64) {
        self.bar.set_position(progress.round() as u64);
    }

    pub fn findings_count(&self) -> usize {
        self.findings_count
    }

    pub fn position(&self) -> u64 {
        self.bar.position()
    }

    /// Print a line above the bar.
    pub fn println(&self, msg: &str) {
        if self.bar.is_hidden() {
            return;
        }
        self.bar.println(msg);
    }
}

impl Default for ScanProgress {
    fn default() -> Self {
        Self::new()
    }
}

fn severity_badge(severity: Severity) -> String {
    let label = format!("[{}]", severity.label());
    match severity {
        Severity::Critical => style(label).red().bold().to_string(),
        Severity::High => style(label).red().to_string(),
        Severity::Medium => style(label).yellow().to_string(),
        Severity::Low => style(label).blue().to_string(),
    }
}

pub fn format_finding_line(finding: &Finding) -> String {
    let mut line = format!(
        "  {} {} {}\n      {}\n      {}",
        style("⚠").yellow(),
        severity_badge(finding.severity),
        style(&finding.title).bold(),
        style(&finding.description).dim(),
        style(&finding.location).dim(),
    );
    if let Some(n) = finding.line {
        line.push_str(&format!("  {}", style(format!("Line {}", n)).dim()));
    }
    line
}
