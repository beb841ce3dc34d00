use serde::{Deserialize, Serialize};

/// Identifier of an inbound message: the originating address joined with
/// the receive timestamp in epoch milliseconds, `"{sender}_{millis}"`.
///
/// Two messages from the same sender in the same millisecond collapse into
/// one logical message, an accepted collision given source granularity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MessageId(String);

impl MessageId {
    pub fn new(sender: &str, received_at_ms: u64) -> Self {
        Self(format!("{sender}_{received_at_ms}"))
    }

    /// Reconstruct an id from its serialized form (ledger keys).
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The receive timestamp embedded in the id, if it parses.
    /// Used by the ledger retention sweep to age out old entries.
    pub fn received_at_ms(&self) -> Option<u64> {
        self.0.rsplit('_').next()?.parse().ok()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// An inbound message as produced by the source. Immutable: the engine
/// never mutates it, only derives the id and formats the outbound text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    pub sender: String,
    pub body: String,
    pub received_at_ms: u64,
}

impl InboundMessage {
    pub fn id(&self) -> MessageId {
        MessageId::new(&self.sender, self.received_at_ms)
    }
}
