use std::time::Duration;

use tracing::{debug, warn};

use crate::config::TelegramConfig;
use crate::error::TransportInitError;
use crate::transport::Transport;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Telegram Bot API transport: POSTs `sendMessage` with a form-encoded
/// `chat_id` + `text` pair. The client is blocking: sends run on the
/// worker thread, which does blocking I/O by design.
pub struct TelegramTransport {
    client: reqwest::blocking::Client,
    endpoint: String,
    chat_id: String,
}

impl TelegramTransport {
    pub fn new(config: &TelegramConfig) -> Result<Self, TransportInitError> {
        let client = reqwest::blocking::Client::builder()
            .connect_timeout(REQUEST_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TransportInitError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: send_endpoint(&config.api_url, &config.bot_token),
            chat_id: config.chat_id.clone(),
        })
    }
}

impl Transport for TelegramTransport {
    fn send(&self, text: &str) -> bool {
        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("chat_id", self.chat_id.as_str()), ("text", text)])
            .send();

        match response {
            Ok(resp) if resp.status().is_success() => {
                debug!(status = %resp.status(), "telegram send ok");
                true
            }
            Ok(resp) => {
                let status = resp.status();
                let body = resp.text().unwrap_or_else(|_| "<unreadable>".to_string());
                warn!(%status, %body, "telegram send rejected");
                false
            }
            Err(e) => {
                warn!(error = %e, "telegram send failed");
                false
            }
        }
    }
}

/// `{api_url}/bot{token}/sendMessage`, tolerating a trailing slash on the base.
fn send_endpoint(api_url: &str, bot_token: &str) -> String {
    format!("{}/bot{}/sendMessage", api_url.trim_end_matches('/'), bot_token)
}
