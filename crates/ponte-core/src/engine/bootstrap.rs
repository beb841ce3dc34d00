use tracing::info;

use crate::error::RunError;
use crate::message::MessageId;

use super::worker::Worker;

impl Worker {
    /// Seed the ledger from pre-existing history the first time the engine
    /// ever runs, so activation never replays old messages. Nothing is
    /// sent. An empty history is a valid terminal state; the flag is set
    /// either way.
    ///
    /// The ids and the flag land in one atomic batch, and the whole
    /// sequence executes on the single worker thread, so a second caller
    /// can only ever observe the flag already set.
    pub(super) fn ensure_seeded(&mut self, now_ms: u64) -> Result<(), RunError> {
        if self.storage.seeded()? {
            return Ok(());
        }

        let since = self.window_start(now_ms);
        let ids: Vec<MessageId> = self
            .source
            .query_since(since)?
            .iter()
            .map(|msg| msg.id())
            .collect();

        self.storage.seed(&ids)?;
        info!(count = ids.len(), "ledger seeded from existing history");
        Ok(())
    }
}
