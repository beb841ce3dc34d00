mod spool;

pub use spool::SpoolSource;

use crate::error::SourceResult;
use crate::message::InboundMessage;

/// The inbound message store. One call returns everything newer than the
/// given timestamp, newest first. No pagination contract.
pub trait MessageSource: Send + Sync {
    fn query_since(&self, since_ms: u64) -> SourceResult<Vec<InboundMessage>>;
}
