mod bootstrap;
mod command;
mod retention;
mod run;
mod select;
mod worker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use tracing::info;

use crate::config::ForwarderConfig;
use crate::error::{EngineError, RunError};
use crate::message::InboundMessage;
use crate::source::MessageSource;
use crate::storage::Storage;
use crate::transport::Transport;

pub use command::EngineCommand;
pub use run::{CancelToken, RunObserver, RunOutcome, RunSummary};

use worker::Worker;

/// The forwarding engine handle. Owns the worker thread and the inbound
/// command channel; triggers (periodic timer, manual action, live push)
/// send commands through it, and the single-threaded worker processes
/// them sequentially.
pub struct Forwarder {
    command_tx: crossbeam_channel::Sender<EngineCommand>,
    worker_thread: Option<thread::JoinHandle<()>>,
    busy: Arc<AtomicBool>,
}

impl Forwarder {
    /// Create a new engine, spawning the worker on a dedicated OS thread.
    /// `transport` is `None` when no destination is configured; runs then
    /// complete immediately without touching the source or the ledger.
    pub fn new(
        config: ForwarderConfig,
        storage: Arc<dyn Storage>,
        source: Arc<dyn MessageSource>,
        transport: Option<Arc<dyn Transport>>,
    ) -> Result<Self, EngineError> {
        let (tx, rx) = crossbeam_channel::bounded::<EngineCommand>(config.command_channel_capacity);
        let busy = Arc::new(AtomicBool::new(false));
        let worker_busy = Arc::clone(&busy);

        let handle = thread::Builder::new()
            .name("ponte-worker".to_string())
            .spawn(move || {
                let mut worker = Worker::new(config, storage, source, transport, rx, worker_busy);
                worker.run();
            })
            .map_err(|e| EngineError::WorkerSpawn(e.to_string()))?;

        info!("forwarder started");

        Ok(Self {
            command_tx: tx,
            worker_thread: Some(handle),
            busy,
        })
    }

    /// True while a forwarding run is executing on the worker.
    pub fn is_running(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Fire-and-forget periodic trigger. No observer; the worker logs the
    /// summary and follows a completed run with the ledger retention sweep.
    pub fn run_scheduled(&self, cancel: CancelToken) -> Result<(), EngineError> {
        self.send_command(EngineCommand::RunScheduled { cancel })
    }

    /// User-triggered run with optional progress reporting. Rejected with
    /// `RunInProgress` while another run is executing; triggers that race
    /// past the gate simply serialize on the command channel.
    pub fn run_manual(
        &self,
        cancel: CancelToken,
        observer: Option<Arc<dyn RunObserver>>,
    ) -> Result<tokio::sync::oneshot::Receiver<Result<RunSummary, RunError>>, EngineError> {
        if self.is_running() {
            return Err(EngineError::RunInProgress);
        }
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.send_command(EngineCommand::RunManual {
            cancel,
            observer,
            reply: reply_tx,
        })?;
        Ok(reply_rx)
    }

    /// Immediate-delivery path for a live message push: dedup-check, send,
    /// mark, with no age window and no batch cap. Runs on the same worker thread
    /// as scheduled runs, so it can never race them on the ledger.
    pub fn deliver_now(&self, message: InboundMessage) -> Result<(), EngineError> {
        self.send_command(EngineCommand::DeliverNow { message })
    }

    /// Send a fixed test line through the transport. Resolves to `false`
    /// when no destination is configured.
    pub fn send_test(&self) -> Result<tokio::sync::oneshot::Receiver<bool>, EngineError> {
        let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();
        self.send_command(EngineCommand::SendTest { reply: reply_tx })?;
        Ok(reply_rx)
    }

    fn send_command(&self, cmd: EngineCommand) -> Result<(), EngineError> {
        self.command_tx.try_send(cmd).map_err(|e| match e {
            crossbeam_channel::TrySendError::Full(_) => EngineError::ChannelFull,
            crossbeam_channel::TrySendError::Disconnected(_) => EngineError::ChannelDisconnected,
        })
    }

    /// Graceful shutdown: send the shutdown command and wait for the
    /// worker thread to finish draining.
    pub fn shutdown(mut self) -> Result<(), EngineError> {
        info!("initiating forwarder shutdown");

        let _ = self.command_tx.send(EngineCommand::Shutdown);

        if let Some(handle) = self.worker_thread.take() {
            handle.join().map_err(|_| EngineError::WorkerPanicked)?;
        }

        info!("forwarder shutdown complete");
        Ok(())
    }
}

impl Drop for Forwarder {
    fn drop(&mut self) {
        // If shutdown wasn't called explicitly, stop the worker here
        if self.worker_thread.is_some() {
            let _ = self.command_tx.send(EngineCommand::Shutdown);
            if let Some(handle) = self.worker_thread.take() {
                let _ = handle.join();
            }
        }
    }
}

#[cfg(test)]
mod tests;
