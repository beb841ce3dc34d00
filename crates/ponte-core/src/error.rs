/// Low-level storage errors (RocksDB). This is the error type for the
/// `Storage` trait; storage operations can only fail with infrastructure
/// errors, never domain errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("rocksdb error: {0}")]
    RocksDb(String),
}

impl From<rocksdb::Error> for StorageError {
    fn from(err: rocksdb::Error) -> Self {
        StorageError::RocksDb(err.into_string())
    }
}

/// Errors reading the inbound message source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("spool read error: {0}")]
    Io(#[from] std::io::Error),
}

/// Fatal errors for a single forwarding run. A failed send is NOT a run
/// error, it leaves the candidate unmarked for the next run. Only the
/// source query and the ledger store are load-bearing enough to abort.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors surfaced by the `Forwarder` handle.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("a forwarding run is already in progress")]
    RunInProgress,

    #[error("command channel is full")]
    ChannelFull,

    #[error("command channel is disconnected")]
    ChannelDisconnected,

    #[error("failed to spawn worker thread: {0}")]
    WorkerSpawn(String),

    #[error("worker thread panicked")]
    WorkerPanicked,
}

/// Failure building the HTTP client behind a transport.
#[derive(Debug, thiserror::Error)]
#[error("failed to build http client: {0}")]
pub struct TransportInitError(pub String);

pub type StorageResult<T> = std::result::Result<T, StorageError>;
pub type SourceResult<T> = std::result::Result<T, SourceError>;
