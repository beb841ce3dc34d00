pub mod config;
pub mod engine;
pub mod error;
pub mod message;
pub mod source;
pub mod storage;
pub mod telemetry;
pub mod transport;

pub use config::{ForwarderConfig, PonteConfig, SpoolConfig, TelegramConfig};
pub use engine::{CancelToken, Forwarder, RunObserver, RunOutcome, RunSummary};
pub use error::{EngineError, RunError, SourceError, StorageError};
pub use message::{InboundMessage, MessageId};
pub use source::{MessageSource, SpoolSource};
pub use storage::{RocksDbStorage, Storage};
pub use transport::{TelegramTransport, Transport};
