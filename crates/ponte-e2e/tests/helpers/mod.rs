#![allow(dead_code)]

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use ponte_core::{ForwarderConfig, InboundMessage, Transport};

pub fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

/// Forwarding policy for e2e runs: reference defaults, no pacing delay.
pub fn e2e_config() -> ForwarderConfig {
    ForwarderConfig {
        send_interval_ms: 0,
        ..Default::default()
    }
}

/// Append one JSONL record to the spool file, creating it on first use.
/// The same shape `ponted` consumes in production.
pub fn append_spool(path: &Path, sender: &str, body: &str, received_at_ms: u64) {
    let record = serde_json::to_string(&InboundMessage {
        sender: sender.to_string(),
        body: body.to_string(),
        received_at_ms,
    })
    .expect("serialize spool record");

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .expect("open spool file");
    writeln!(file, "{record}").expect("append spool record");
}

pub fn spool_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("spool.jsonl")
}

pub fn data_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("data")
}

/// Transport double recording every outbound text.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<String>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn sent_texts(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

impl Transport for RecordingTransport {
    fn send(&self, text: &str) -> bool {
        self.sent.lock().unwrap().push(text.to_string());
        true
    }
}
