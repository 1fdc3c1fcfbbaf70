use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::display::events::ScanEvent;
use crate::errors::DefensisError;
use crate::models::{ScanPlan, Severity};
use super::clock::Clock;
use super::simulator::ScanSimulator;
use super::state::ScanStatus;

#[derive(Debug, Clone, Serialize)]
pub struct ScanSummary {
    pub subject: String,
    pub total_findings: usize,
    pub finding_counts: HashMap<Severity, usize>,
    pub simulated_duration_ms: u64,
    /// Time spent on the driving clock, which is zero-cost for a virtual clock.
    pub clock_duration_ms: u64,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    Completed(ScanSummary),
    Cancelled { progress: f64, elapsed: Duration },
}

/// Drives a shared [`ScanSimulator`] to completion against a [`Clock`].
pub struct ScanOrchestrator {
    simulator: Arc<RwLock<ScanSimulator>>,
    clock: Arc<dyn Clock>,
    cancel_token: CancellationToken,
    event_tx: Option<mpsc::UnboundedSender<ScanEvent>>,
}

impl ScanOrchestrator {
    pub fn new(simulator: Arc<RwLock<ScanSimulator>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            simulator,
            clock,
            cancel_token: CancellationToken::new(),
            event_tx: None,
        }
    }

    pub fn from_plan(plan: ScanPlan, clock: Arc<dyn Clock>) -> Self {
        Self::new(Arc::new(RwLock::new(ScanSimulator::new(plan))), clock)
    }

    /// Replace the orchestrator's cancel token with an external one.
    /// Without a call to `.cancel()` the run always proceeds to completion.
    pub fn with_cancel_token(mut self, token: CancellationToken) -> Self {
        self.cancel_token = token;
        self
    }

    /// Attach an event channel for streaming scan events to a renderer.
    pub fn with_event_channel(mut self, tx: mpsc::UnboundedSender<ScanEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Shared handle for polling state while the run is in flight.
    pub fn simulator(&self) -> Arc<RwLock<ScanSimulator>> {
        Arc::clone(&self.simulator)
    }

    fn emit(&self, event: ScanEvent) {
        if let Some(ref tx) = self.event_tx {
            let _ = tx.send(event);
        }
    }

    /// Start the simulator and fire every update in order, sleeping on the clock between them.
    ///
    /// Fails with [`DefensisError::InvalidState`] if the simulator is not idle.
    pub async fn run(&self) -> Result<RunOutcome, DefensisError> {
        self.start().await?;
        self.drive().await
    }

    /// Move the simulator out of `Idle` and announce the run, without firing anything.
    ///
    /// Once this returns the simulator reports a running status, so callers can hand
    /// [`drive`](Self::drive) to a background task and still guard on the status.
    pub async fn start(&self) -> Result<(), DefensisError> {
        let mut sim = self.simulator.write().await;
        sim.start()?;
        self.emit(ScanEvent::ScanStarted {
            subject: sim.subject().to_string(),
            phase_count: sim.plan().phases().len(),
            finding_count: sim.finding_count(),
        });
        Ok(())
    }

    /// Fire the remaining updates of a started simulator until it completes or the cancel
    /// token fires. A cancelled run leaves the simulator in its terminal `Cancelled` state.
    pub async fn drive(&self) -> Result<RunOutcome, DefensisError> {
        let started_at = self.clock.elapsed();
        {
            let sim = self.simulator.read().await;
            if sim.status() == ScanStatus::Idle {
                return Err(DefensisError::InvalidState(format!(
                    "scan of '{}' has not been started",
                    sim.subject()
                )));
            }
        }

        loop {
            let delay = match self.simulator.read().await.pending_delay() {
                Some(delay) => delay,
                None => break,
            };

            if !delay.is_zero() {
                tokio::select! {
                    biased;
                    _ = self.cancel_token.cancelled() => {}
                    _ = self.clock.sleep(delay) => {}
                }
            }
            if self.cancel_token.is_cancelled() {
                return self.cancelled().await;
            }

            let update = self.simulator.write().await.fire();
            match update {
                Some(update) => self.emit(update.into()),
                None => break,
            }
        }

        let sim = self.simulator.read().await;
        if !sim.is_complete() {
            return Err(DefensisError::Internal(format!(
                "scan of '{}' stopped in state {}",
                sim.subject(),
                sim.status()
            )));
        }

        let mut finding_counts = HashMap::new();
        for f in sim.revealed() {
            *finding_counts.entry(f.severity).or_insert(0) += 1;
        }

        Ok(RunOutcome::Completed(ScanSummary {
            subject: sim.subject().to_string(),
            total_findings: sim.revealed().len(),
            finding_counts,
            simulated_duration_ms: sim.elapsed().as_millis() as u64,
            clock_duration_ms: self.clock.elapsed().saturating_sub(started_at).as_millis() as u64,
        }))
    }

    async fn cancelled(&self) -> Result<RunOutcome, DefensisError> {
        let mut sim = self.simulator.write().await;
        sim.cancel()?;
        warn!(
            subject = %sim.subject(),
            progress = sim.progress(),
            label = sim.phase_label().unwrap_or_default(),
            "Scan cancelled"
        );
        self.emit(ScanEvent::ScanCancelled { progress: sim.progress() });
        Ok(RunOutcome::Cancelled {
            progress: sim.progress(),
            elapsed: sim.elapsed(),
        })
    }
}

impl ScanSummary {
    pub fn log(&self) {
        info!(
            subject = %self.subject,
            total_findings = self.total_findings,
            simulated_ms = self.simulated_duration_ms,
            "Scan summary"
        );
    }
}
