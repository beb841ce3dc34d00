use std::path::PathBuf;

use serde::Deserialize;

/// Top-level configuration, deserializable from TOML.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PonteConfig {
    pub forwarder: ForwarderConfig,
    pub telegram: TelegramConfig,
    pub spool: SpoolConfig,
}

/// Forwarding policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForwarderConfig {
    /// Maximum sends per run; overflow candidates wait for the next run.
    pub max_batch_size: usize,
    /// Selection/bootstrap age window in hours.
    pub max_age_hours: u64,
    /// Fixed delay between consecutive sends within a run.
    pub send_interval_ms: u64,
    /// Ledger entries older than this are pruned after a scheduled run.
    /// Clamped to never cut inside the selection window.
    pub ledger_retention_hours: u64,
    /// Cadence of the daemon's periodic trigger.
    pub check_interval_secs: u64,
    pub command_channel_capacity: usize,
}

/// Telegram destination. Both fields empty means "not configured": the
/// engine runs idle and every forwarding run completes without I/O.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: String,
    /// Overridable for tests; the Bot API prefixes `/bot{token}` itself.
    pub api_url: String,
}

/// Inbound spool file location.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SpoolConfig {
    pub path: PathBuf,
}

impl Default for ForwarderConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 20,
            max_age_hours: 48,
            send_interval_ms: 2000,
            ledger_retention_hours: 96,
            check_interval_secs: 3600,
            command_channel_capacity: 64,
        }
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_id: String::new(),
            api_url: "https://api.telegram.org".to_string(),
        }
    }
}

impl Default for SpoolConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("spool.jsonl"),
        }
    }
}

impl TelegramConfig {
    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty() && !self.chat_id.is_empty()
    }
}
