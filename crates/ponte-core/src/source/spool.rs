use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use tracing::warn;

use crate::error::SourceResult;
use crate::message::InboundMessage;
use crate::source::MessageSource;

/// A JSONL spool file of inbound messages, one record per line:
/// `{"sender":"...","body":"...","received_at_ms":...}`.
///
/// A missing file reads as an empty history, not an error, since the spool may
/// simply not have been created yet. Unparseable lines are skipped with a
/// warning so one corrupt record cannot wedge every future run.
pub struct SpoolSource {
    path: PathBuf,
}

impl SpoolSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl MessageSource for SpoolSource {
    fn query_since(&self, since_ms: u64) -> SourceResult<Vec<InboundMessage>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut messages = Vec::new();
        for (lineno, line) in BufReader::new(file).lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<InboundMessage>(&line) {
                Ok(msg) => {
                    if msg.received_at_ms > since_ms {
                        messages.push(msg);
                    }
                }
                Err(e) => {
                    warn!(line = lineno + 1, error = %e, "skipping unparseable spool record");
                }
            }
        }

        // Newest first, regardless of file order.
        messages.sort_by(|a, b| b.received_at_ms.cmp(&a.received_at_ms));
        Ok(messages)
    }
}
