use std::sync::Arc;

use crate::error::RunError;
use crate::message::InboundMessage;

use super::run::{CancelToken, RunObserver, RunSummary};

/// Commands sent from trigger contexts to the single-threaded worker.
///
/// Variants that expect a response carry a `tokio::sync::oneshot::Sender`
/// for the reply; fire-and-forget commands omit it.
pub enum EngineCommand {
    /// Periodic trigger. Silent; the worker logs the summary.
    RunScheduled { cancel: CancelToken },
    /// Manual trigger with progress reporting.
    RunManual {
        cancel: CancelToken,
        observer: Option<Arc<dyn RunObserver>>,
        reply: tokio::sync::oneshot::Sender<Result<RunSummary, RunError>>,
    },
    /// Live-push delivery of a single message, bypassing window and cap.
    DeliverNow { message: InboundMessage },
    /// Send a fixed test line through the transport.
    SendTest {
        reply: tokio::sync::oneshot::Sender<bool>,
    },
    Shutdown,
}
