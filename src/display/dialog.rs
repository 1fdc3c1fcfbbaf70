use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::errors::DefensisError;
use crate::models::ScanPlan;
use crate::pipeline::{Clock, RunOutcome, ScanOrchestrator, ScanSimulator, ScanSnapshot, ScanStatus};
use super::events::ScanEvent;
use super::notice::CompletionNotice;

/// What an open-signal change did to the dialog's scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogTransition {
    /// Closed → open with an idle simulator: a run was spawned.
    Started,
    /// Reopened while the earlier run is still going.
    AlreadyRunning,
    /// Reopened after completion; prior results are kept.
    ShowingResults,
    /// Reopened after the run was cancelled. A cancelled scan never restarts.
    Stopped,
    Closed,
    Unchanged,
}

/// Scan dialog controller. Opening it starts the scan at most once per simulator;
/// closing only hides it, the run keeps going.
pub struct ScanDialog {
    simulator: Arc<RwLock<ScanSimulator>>,
    clock: Arc<dyn Clock>,
    event_tx: Option<mpsc::UnboundedSender<ScanEvent>>,
    cancel_token: Option<CancellationToken>,
    open: bool,
    run: Option<JoinHandle<Result<RunOutcome, DefensisError>>>,
    outcome: Option<RunOutcome>,
    notice: Option<CompletionNotice>,
}

impl ScanDialog {
    pub fn new(plan: ScanPlan, clock: Arc<dyn Clock>) -> Self {
        Self {
            simulator: Arc::new(RwLock::new(ScanSimulator::new(plan))),
            clock,
            event_tx: None,
            cancel_token: None,
            open: false,
            run: None,
            outcome: None,
            notice: None,
        }
    }

    pub fn with_event_channel(mut self, tx: mpsc::UnboundedSender<ScanEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Let an external token stop the run. Closing the dialog still never cancels.
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = Some(token);
        self
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Feed the dialog's `open` signal.
    ///
    /// Only an idle simulator is started. The simulator leaves `Idle` before this returns, so
    /// reopening right away sees it running even if the spawned task has not been polled yet.
    pub async fn set_open(&mut self, open: bool) -> Result<DialogTransition, DefensisError> {
        if open == self.open {
            return Ok(DialogTransition::Unchanged);
        }
        self.open = open;
        if !open {
            debug!("Scan dialog closed");
            return Ok(DialogTransition::Closed);
        }

        let status = self.simulator.read().await.status();
        match status {
            ScanStatus::Idle => {}
            ScanStatus::PhaseWalking | ScanStatus::RevealingFindings => {
                return Ok(DialogTransition::AlreadyRunning)
            }
            ScanStatus::Complete => return Ok(DialogTransition::ShowingResults),
            ScanStatus::Cancelled => return Ok(DialogTransition::Stopped),
        }

        let mut orchestrator = ScanOrchestrator::new(Arc::clone(&self.simulator), Arc::clone(&self.clock));
        // Only one run ever happens, so the sender moves into it and the channel
        // closes when that run ends.
        if let Some(tx) = self.event_tx.take() {
            orchestrator = orchestrator.with_event_channel(tx);
        }
        if let Some(token) = &self.cancel_token {
            orchestrator = orchestrator.with_cancel_token(token.clone());
        }
        orchestrator.start().await?;
        info!(subject = %self.simulator.read().await.subject(), "Scan dialog opened, scan started");
        self.run = Some(tokio::spawn(async move { orchestrator.drive().await }));
        Ok(DialogTransition::Started)
    }

    /// Wait for the spawned run to finish. Returns `None` if no run was ever started.
    /// A failed run is reported once; later calls return `None`.
    pub async fn wait(&mut self) -> Result<Option<RunOutcome>, DefensisError> {
        if let Some(handle) = self.run.take() {
            let outcome = handle
                .await
                .map_err(|e| DefensisError::Internal(format!("Scan task failed: {}", e)))??;
            if let RunOutcome::Completed(summary) = &outcome {
                self.notice = Some(CompletionNotice::from_summary(summary));
            }
            self.outcome = Some(outcome);
        }
        Ok(self.outcome.clone())
    }

    /// The completion notice, handed out once.
    pub fn take_notice(&mut self) -> Option<CompletionNotice> {
        self.notice.take()
    }

    pub async fn snapshot(&self) -> ScanSnapshot {
        self.simulator.read().await.snapshot()
    }
}
