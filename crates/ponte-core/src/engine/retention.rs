use tracing::{debug, warn};

use crate::message::MessageId;

use super::worker::{Worker, MILLIS_PER_HOUR};

impl Worker {
    /// Age out ledger entries the selection window can no longer reach.
    ///
    /// The cutoff is clamped to the window start, so a retention value
    /// misconfigured below `max_age_hours` can never prune an id the
    /// selector could still re-surface. Ids that do not parse are kept.
    /// Failures only log. Retention is maintenance, not correctness.
    pub(super) fn sweep_ledger(&mut self, now_ms: u64) {
        let retention_hours = self
            .config
            .ledger_retention_hours
            .max(self.config.max_age_hours);
        let cutoff = now_ms.saturating_sub(retention_hours * MILLIS_PER_HOUR);

        let ids = match self.storage.ledger_ids() {
            Ok(ids) => ids,
            Err(e) => {
                warn!(error = %e, "retention sweep: failed to list ledger");
                return;
            }
        };

        let expired: Vec<MessageId> = ids
            .into_iter()
            .filter(|id| id.received_at_ms().is_some_and(|ts| ts < cutoff))
            .collect();
        if expired.is_empty() {
            return;
        }

        match self.storage.ledger_delete_all(&expired) {
            Ok(()) => debug!(count = expired.len(), "retention sweep pruned ledger entries"),
            Err(e) => warn!(error = %e, "retention sweep: failed to prune ledger"),
        }
    }
}
