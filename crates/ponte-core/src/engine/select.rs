use tracing::debug;

use crate::error::RunError;
use crate::message::InboundMessage;

use super::worker::{Worker, MILLIS_PER_HOUR};

impl Worker {
    /// Unforwarded messages inside the age window, newest first (the
    /// source's query order is preserved). The caller caps the result.
    pub(super) fn select_candidates(&self, now_ms: u64) -> Result<Vec<InboundMessage>, RunError> {
        let since = self.window_start(now_ms);

        let mut candidates = Vec::new();
        for msg in self.source.query_since(since)? {
            if !self.storage.ledger_contains(&msg.id())? {
                candidates.push(msg);
            }
        }

        debug!(count = candidates.len(), "selected unforwarded candidates");
        Ok(candidates)
    }

    /// Lower bound of the selection window: `now - max_age_hours`.
    pub(super) fn window_start(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.config.max_age_hours * MILLIS_PER_HOUR)
    }
}
