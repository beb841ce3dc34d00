use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::error::RunError;
use crate::message::InboundMessage;

use super::worker::Worker;

/// Per-invocation cancellation handle. The caller creates a fresh token
/// for each run and keeps a clone to raise the signal; the worker samples
/// it only at iteration boundaries, never mid-send.
#[derive(Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Typed progress callback for manual runs. `on_progress` fires before
/// each send attempt with the 1-based position within the capped batch;
/// `on_complete` fires once with the final summary. Observational only;
/// it cannot influence the run.
pub trait RunObserver: Send + Sync {
    fn on_progress(&self, current: usize, total: usize);
    fn on_complete(&self, summary: &RunSummary);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// No destination configured, an expected idle state, not a failure.
    NotConfigured,
}

/// Result of one forwarding run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Successful sends, each marked in the ledger.
    pub sent: usize,
    /// Failed sends, left unmarked for the next run.
    pub failed: usize,
    /// Unforwarded candidates found, before the batch cap.
    pub total_candidates: usize,
    /// Candidates actually attempted this run.
    pub batch_size: usize,
    pub cancelled: bool,
    pub outcome: RunOutcome,
}

impl RunSummary {
    fn not_configured() -> Self {
        Self {
            sent: 0,
            failed: 0,
            total_candidates: 0,
            batch_size: 0,
            cancelled: false,
            outcome: RunOutcome::NotConfigured,
        }
    }
}

impl Worker {
    /// One end-to-end forwarding run: bootstrap, select, cap, send paced,
    /// marking each success in the ledger immediately so a crash mid-batch
    /// never re-forwards an already-sent message.
    pub(super) fn execute_run(
        &mut self,
        cancel: &CancelToken,
        observer: Option<&dyn RunObserver>,
        now_ms: u64,
    ) -> Result<RunSummary, RunError> {
        let Some(transport) = self.transport.clone() else {
            debug!("destination not configured, skipping run");
            let summary = RunSummary::not_configured();
            if let Some(obs) = observer {
                obs.on_complete(&summary);
            }
            return Ok(summary);
        };

        self.ensure_seeded(now_ms)?;

        let candidates = self.select_candidates(now_ms)?;
        let total_candidates = candidates.len();
        let batch: Vec<InboundMessage> = candidates
            .into_iter()
            .take(self.config.max_batch_size)
            .collect();
        let batch_size = batch.len();
        if total_candidates > batch_size {
            debug!(
                deferred = total_candidates - batch_size,
                "batch cap reached, overflow deferred to next run"
            );
        }

        let mut summary = RunSummary {
            sent: 0,
            failed: 0,
            total_candidates,
            batch_size,
            cancelled: false,
            outcome: RunOutcome::Completed,
        };

        for (i, msg) in batch.iter().enumerate() {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            if let Some(obs) = observer {
                obs.on_progress(i + 1, batch_size);
            }

            let id = msg.id();
            if transport.send(&format_outbound(msg)) {
                self.storage.ledger_insert(&id)?;
                summary.sent += 1;
                debug!(%id, "forwarded");
            } else {
                summary.failed += 1;
                warn!(%id, "send failed, candidate stays unmarked for the next run");
            }

            // Pace between sends to respect destination rate limits.
            if i + 1 < batch_size && !cancel.is_cancelled() && self.config.send_interval_ms > 0 {
                std::thread::sleep(Duration::from_millis(self.config.send_interval_ms));
            }
        }

        if let Some(obs) = observer {
            obs.on_complete(&summary);
        }
        Ok(summary)
    }

    /// Live-push path: dedup-check, send, mark. No age window, no cap.
    /// A failed send leaves the message unmarked; the next scheduled run
    /// re-selects it as long as it is inside the window.
    pub(super) fn deliver_single(&mut self, message: &InboundMessage) {
        let Some(transport) = self.transport.clone() else {
            debug!("destination not configured, dropping live message");
            return;
        };

        let id = message.id();
        match self.storage.ledger_contains(&id) {
            Ok(true) => {
                debug!(%id, "already forwarded, skipping live message");
                return;
            }
            Ok(false) => {}
            Err(e) => {
                error!(%id, error = %e, "ledger check failed, dropping live message");
                return;
            }
        }

        if transport.send(&format_outbound(message)) {
            if let Err(e) = self.storage.ledger_insert(&id) {
                error!(%id, error = %e, "forwarded but could not mark; next run may duplicate");
            } else {
                debug!(%id, "live message forwarded");
            }
        } else {
            warn!(%id, "live send failed, leaving message for the next run");
        }
    }
}

/// Fixed outbound template embedding sender and body.
pub(super) fn format_outbound(msg: &InboundMessage) -> String {
    format!("📱 Sender: {}\n💬 Message: {}", msg.sender, msg.body)
}
