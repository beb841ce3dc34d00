use crate::error::StorageResult;
use crate::message::MessageId;

/// Persistence for the dedup ledger and the bootstrap flag.
/// Implementations must be thread-safe.
pub trait Storage: Send + Sync {
    // --- Ledger (set of forwarded message ids) ---

    /// True iff the id was previously inserted.
    fn ledger_contains(&self, id: &MessageId) -> StorageResult<bool>;

    /// Insert a single id. Inserting an already-present id is a no-op.
    fn ledger_insert(&self, id: &MessageId) -> StorageResult<()>;

    /// Bulk insert, applied as one atomic batch.
    fn ledger_insert_all(&self, ids: &[MessageId]) -> StorageResult<()>;

    /// Delete the given ids as one atomic batch (retention sweep).
    fn ledger_delete_all(&self, ids: &[MessageId]) -> StorageResult<()>;

    /// All ledger ids, in unspecified order.
    fn ledger_ids(&self) -> StorageResult<Vec<MessageId>>;

    /// Number of ledger entries.
    fn ledger_len(&self) -> StorageResult<usize>;

    // --- Bootstrap flag ---

    /// True iff the ledger has been seeded from pre-existing history.
    fn seeded(&self) -> StorageResult<bool>;

    /// Atomically insert all ids AND set the seeded flag, so a crash
    /// mid-bootstrap never leaves the flag set over a half-seeded ledger.
    fn seed(&self, ids: &[MessageId]) -> StorageResult<()>;
}
