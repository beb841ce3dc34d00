use super::*;

use std::collections::HashSet;

use crate::error::{SourceError, SourceResult};
use crate::source::MessageSource;
use crate::transport::Transport;

/// Fixed "now" for deterministic window math.
pub(super) const NOW_MS: u64 = 1_700_000_000_000;

pub(super) fn hours_ago(hours: u64) -> u64 {
    NOW_MS - hours * 60 * 60 * 1000
}

pub(super) fn msg(sender: &str, body: &str, received_at_ms: u64) -> InboundMessage {
    InboundMessage {
        sender: sender.to_string(),
        body: body.to_string(),
        received_at_ms,
    }
}

/// Policy used by worker tests: reference defaults, but no pacing delay.
pub(super) fn test_config() -> ForwarderConfig {
    ForwarderConfig {
        send_interval_ms: 0,
        ..Default::default()
    }
}

/// Scripted message source. Contents can grow mid-test; `fail()` makes
/// every subsequent query error, for source-failure paths.
pub(super) struct FakeSource {
    messages: Mutex<Vec<InboundMessage>>,
    failing: AtomicBool,
}

impl FakeSource {
    pub(super) fn new(messages: Vec<InboundMessage>) -> Self {
        Self {
            messages: Mutex::new(messages),
            failing: AtomicBool::new(false),
        }
    }

    pub(super) fn push(&self, msg: InboundMessage) {
        self.messages.lock().unwrap().push(msg);
    }

    pub(super) fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }
}

impl MessageSource for FakeSource {
    fn query_since(&self, since_ms: u64) -> SourceResult<Vec<InboundMessage>> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(SourceError::Io(std::io::Error::other("scripted failure")));
        }
        let mut out: Vec<InboundMessage> = self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.received_at_ms > since_ms)
            .cloned()
            .collect();
        out.sort_by(|a, b| b.received_at_ms.cmp(&a.received_at_ms));
        Ok(out)
    }
}

/// Recording transport. Attempts whose 0-based order index is listed in
/// `fail_on` report failure without recording the text.
pub(super) struct FakeTransport {
    pub(super) sent: Mutex<Vec<String>>,
    fail_on: HashSet<usize>,
    attempts: AtomicUsize,
}

impl FakeTransport {
    pub(super) fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_on: HashSet::new(),
            attempts: AtomicUsize::new(0),
        }
    }

    pub(super) fn failing_on(indices: impl IntoIterator<Item = usize>) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail_on: indices.into_iter().collect(),
            attempts: AtomicUsize::new(0),
        }
    }

    pub(super) fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub(super) fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for FakeTransport {
    fn send(&self, text: &str) -> bool {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_on.contains(&attempt) {
            return false;
        }
        self.sent.lock().unwrap().push(text.to_string());
        true
    }
}

/// Observer recording every callback.
#[derive(Default)]
pub(super) struct RecordingObserver {
    pub(super) progress: Mutex<Vec<(usize, usize)>>,
    pub(super) completed: Mutex<Option<RunSummary>>,
}

impl RunObserver for RecordingObserver {
    fn on_progress(&self, current: usize, total: usize) {
        self.progress.lock().unwrap().push((current, total));
    }

    fn on_complete(&self, summary: &RunSummary) {
        *self.completed.lock().unwrap() = Some(summary.clone());
    }
}

/// A worker wired to fakes over a real RocksDB ledger.
pub(super) struct TestEngine {
    pub(super) worker: Worker,
    pub(super) storage: Arc<RocksDbStorage>,
    pub(super) source: Arc<FakeSource>,
    pub(super) transport: Arc<FakeTransport>,
    /// Keeps the command channel alive for `handle_command` tests.
    pub(super) command_tx: crossbeam_channel::Sender<EngineCommand>,
    _dir: tempfile::TempDir,
}

pub(super) fn test_engine(messages: Vec<InboundMessage>) -> TestEngine {
    test_engine_with(test_config(), messages, Arc::new(FakeTransport::new()))
}

pub(super) fn test_engine_with(
    config: ForwarderConfig,
    messages: Vec<InboundMessage>,
    transport: Arc<FakeTransport>,
) -> TestEngine {
    build_engine(config, messages, Some(transport.clone()), transport)
}

/// Engine with no destination configured. The `transport` field still
/// records; it must never be called.
pub(super) fn test_engine_unconfigured(messages: Vec<InboundMessage>) -> TestEngine {
    build_engine(
        test_config(),
        messages,
        None,
        Arc::new(FakeTransport::new()),
    )
}

fn build_engine(
    config: ForwarderConfig,
    messages: Vec<InboundMessage>,
    wired: Option<Arc<FakeTransport>>,
    transport: Arc<FakeTransport>,
) -> TestEngine {
    let dir = tempfile::tempdir().unwrap();
    let storage = Arc::new(RocksDbStorage::open(dir.path()).unwrap());
    let source = Arc::new(FakeSource::new(messages));
    let (tx, rx) = crossbeam_channel::bounded(config.command_channel_capacity);
    let worker = Worker::new(
        config,
        storage.clone(),
        source.clone(),
        wired.map(|t| t as Arc<dyn Transport>),
        rx,
        Arc::new(AtomicBool::new(false)),
    );
    TestEngine {
        worker,
        storage,
        source,
        transport,
        command_tx: tx,
        _dir: dir,
    }
}

/// Engine seeded over an empty history, then handed `messages` as
/// genuinely-new arrivals. The usual steady-state fixture.
pub(super) fn seeded_engine(messages: Vec<InboundMessage>) -> TestEngine {
    let mut engine = test_engine(Vec::new());
    engine.worker.ensure_seeded(NOW_MS).unwrap();
    for m in messages {
        engine.source.push(m);
    }
    engine
}

pub(super) fn seeded_engine_with(
    config: ForwarderConfig,
    messages: Vec<InboundMessage>,
    transport: Arc<FakeTransport>,
) -> TestEngine {
    let mut engine = test_engine_with(config, Vec::new(), transport);
    engine.worker.ensure_seeded(NOW_MS).unwrap();
    for m in messages {
        engine.source.push(m);
    }
    engine
}

/// Run the engine once with a throwaway token and no observer.
pub(super) fn run_once(engine: &mut TestEngine) -> RunSummary {
    engine
        .worker
        .execute_run(&CancelToken::new(), None, NOW_MS)
        .unwrap()
}
