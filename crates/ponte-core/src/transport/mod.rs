mod telegram;

pub use telegram::TelegramTransport;

/// The outbound send capability. One attempt per call; any transport-level
/// failure (HTTP status, network error) reads uniformly as `false`.
/// Implementations log their own failure detail.
pub trait Transport: Send + Sync {
    fn send(&self, text: &str) -> bool;
}
