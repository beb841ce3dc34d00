use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crossbeam_channel::Receiver;
use tracing::{error, info};

use crate::config::ForwarderConfig;
use crate::source::MessageSource;
use crate::storage::Storage;
use crate::transport::Transport;

use super::command::EngineCommand;
use super::run::RunOutcome;

pub(super) const MILLIS_PER_HOUR: u64 = 60 * 60 * 1000;

/// Text sent by the `SendTest` command.
const TEST_MESSAGE: &str = "Test message from ponte";

/// Single-threaded engine core. Owns the collaborators and processes
/// commands sequentially, which is exactly what makes the
/// at-most-one-concurrent-run invariant and the check-send-mark sequence
/// hold without any further locking.
pub(super) struct Worker {
    pub(super) config: ForwarderConfig,
    pub(super) storage: Arc<dyn Storage>,
    pub(super) source: Arc<dyn MessageSource>,
    pub(super) transport: Option<Arc<dyn Transport>>,
    inbound: Receiver<EngineCommand>,
    /// Mirrored into the `Forwarder` handle for the already-running gate.
    busy: Arc<AtomicBool>,
    running: bool,
}

impl Worker {
    pub(super) fn new(
        config: ForwarderConfig,
        storage: Arc<dyn Storage>,
        source: Arc<dyn MessageSource>,
        transport: Option<Arc<dyn Transport>>,
        inbound: Receiver<EngineCommand>,
        busy: Arc<AtomicBool>,
    ) -> Self {
        Self {
            config,
            storage,
            source,
            transport,
            inbound,
            busy,
            running: true,
        }
    }

    /// Run the worker loop. Blocks the current thread until a `Shutdown`
    /// command is received or the inbound channel is disconnected.
    pub(super) fn run(&mut self) {
        info!("forwarder worker started");

        while self.running {
            match self.inbound.recv() {
                Ok(cmd) => self.handle_command(cmd),
                Err(_) => {
                    info!("command channel disconnected, stopping worker");
                    self.running = false;
                }
            }
        }

        info!("forwarder worker stopped");
    }

    pub(super) fn handle_command(&mut self, cmd: EngineCommand) {
        match cmd {
            EngineCommand::RunScheduled { cancel } => {
                let now = now_ms();
                self.busy.store(true, Ordering::SeqCst);
                let result = self.execute_run(&cancel, None, now);
                self.busy.store(false, Ordering::SeqCst);

                match result {
                    Ok(summary) => {
                        if summary.outcome == RunOutcome::Completed {
                            info!(
                                sent = summary.sent,
                                failed = summary.failed,
                                candidates = summary.total_candidates,
                                cancelled = summary.cancelled,
                                "scheduled run finished"
                            );
                            self.sweep_ledger(now);
                        }
                    }
                    Err(e) => error!(error = %e, "scheduled run aborted"),
                }
            }
            EngineCommand::RunManual {
                cancel,
                observer,
                reply,
            } => {
                self.busy.store(true, Ordering::SeqCst);
                let result = self.execute_run(&cancel, observer.as_deref(), now_ms());
                self.busy.store(false, Ordering::SeqCst);

                if let Err(ref e) = result {
                    error!(error = %e, "manual run aborted");
                }
                let _ = reply.send(result);
            }
            EngineCommand::DeliverNow { message } => self.deliver_single(&message),
            EngineCommand::SendTest { reply } => {
                let ok = self
                    .transport
                    .as_ref()
                    .is_some_and(|transport| transport.send(TEST_MESSAGE));
                let _ = reply.send(ok);
            }
            EngineCommand::Shutdown => {
                info!("shutdown command received");
                self.running = false;
            }
        }
    }
}

pub(super) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
